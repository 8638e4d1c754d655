//! ZMK to Vial keycode database and translation.
//!
//! This module provides access to the embedded ZMK keycode table, the
//! modifier alias table and the character table used to turn macros back
//! into typed text.

use crate::models::action::split_wrapped;
use crate::models::KeyAction;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Database schema from zmk_keycodes.json.
#[derive(Debug, Clone, Deserialize)]
struct KeycodeDatabase {
    #[allow(dead_code)]
    version: String,
    keycodes: HashMap<String, String>,
    modifiers: HashMap<String, String>,
    text: HashMap<String, char>,
    shifted_text: HashMap<String, char>,
}

/// How a single macro key contributes to typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChar {
    /// The key types this character
    Char(char),
    /// The key types nothing (`NONE`)
    Skip,
    /// The key has no textual meaning
    Unmapped,
}

/// ZMK keycode database with translation to Vial keycodes.
///
/// The database is embedded in the binary at compile time. Lookups are
/// O(1); unknown names never fail and fall back to a synthesized `KC_` code.
#[derive(Debug, Clone)]
pub struct KeycodeDb {
    /// ZMK key name -> Vial keycode (may itself be a `MOD(KC_X)` form)
    keycodes: HashMap<String, String>,
    /// ZMK modifier function -> Vial modifier function
    modifiers: HashMap<String, String>,
    /// ZMK key name -> typed character
    text: HashMap<String, char>,
    /// ZMK key name -> character typed with shift held
    shifted_text: HashMap<String, char>,
}

impl KeycodeDb {
    /// Loads the keycode database from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("zmk_keycodes.json");
        let db: KeycodeDatabase = serde_json::from_str(json_data)
            .context("Failed to parse embedded zmk_keycodes.json")?;

        Ok(Self {
            keycodes: db.keycodes,
            modifiers: db.modifiers,
            text: db.text,
            shifted_text: db.shifted_text,
        })
    }

    /// Translates a ZMK key token into a Vial key action.
    ///
    /// Resolution order:
    /// 1. `MOD(INNER)`: modifier alias lookup (unknown names are kept as-is)
    ///    wrapped around the recursive translation of `INNER`
    /// 2. the static keycode table
    /// 3. tokens already spelled `KC_...`
    /// 4. `KC_` + token
    ///
    /// # Examples
    ///
    /// ```
    /// use zmk2vial::keycode_db::KeycodeDb;
    ///
    /// let db = KeycodeDb::load().unwrap();
    /// assert_eq!(db.translate("LG(LS(K))").to_string(), "LGUI(LSFT(KC_K))");
    /// assert_eq!(db.translate("BSPC").to_string(), "KC_BSPACE");
    /// ```
    #[must_use]
    pub fn translate(&self, token: &str) -> KeyAction {
        if let Some((modifier, inner)) = split_wrapped(token) {
            return KeyAction::modified(self.modifier(modifier), self.translate(inner));
        }

        if let Some(keycode) = self.keycodes.get(token) {
            return KeyAction::from_keycode(keycode);
        }

        if token.starts_with("KC_") {
            return KeyAction::from_keycode(token);
        }

        tracing::debug!("Unknown ZMK key '{}', using KC_{}", token, token);
        KeyAction::plain(format!("KC_{token}"))
    }

    /// Resolves a ZMK modifier function name (`LS`, `LEFT_GUI`, ...) to Vial's.
    #[must_use]
    pub fn modifier<'a>(&'a self, name: &'a str) -> &'a str {
        self.modifiers.get(name).map_or(name, String::as_str)
    }

    /// Checks whether a ZMK key name is in the static table.
    #[must_use]
    pub fn is_known(&self, token: &str) -> bool {
        self.keycodes.contains_key(token)
    }

    /// Looks up the character a macro key types.
    ///
    /// A shift wrapper (`LS(X)`, `RS(X)` or any alias of them) yields the
    /// shifted symbol for digits and punctuation, and the upper-case letter
    /// otherwise.
    #[must_use]
    pub fn text_char(&self, key: &str) -> TextChar {
        if let Some((modifier, inner)) = split_wrapped(key) {
            if matches!(self.modifier(modifier), "LSFT" | "RSFT") {
                if let Some(&c) = self.shifted_text.get(inner) {
                    return TextChar::Char(c);
                }
                if let Some(&c) = self.text.get(inner) {
                    return TextChar::Char(c.to_ascii_uppercase());
                }
            }
            return TextChar::Unmapped;
        }

        if let Some(&c) = self.text.get(key) {
            return TextChar::Char(c);
        }

        if key.eq_ignore_ascii_case("none") {
            return TextChar::Skip;
        }

        TextChar::Unmapped
    }

    /// Turns a run of macro keys into typed text.
    ///
    /// Returns `None` when any key has no character, or when the keys type
    /// nothing at all; partial text is never produced.
    #[must_use]
    pub fn keys_to_text(&self, keys: &[&str]) -> Option<String> {
        let mut text = String::new();
        for key in keys {
            match self.text_char(key) {
                TextChar::Char(c) => text.push(c),
                TextChar::Skip => {}
                TextChar::Unmapped => return None,
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
