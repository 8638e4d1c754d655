//! Conversion of ZMK binding lists into key actions.
//!
//! A binding list is a flat run of tokens such as
//! `&kp A &mt LSHIFT S &lt 1 SPACE &trans`. Each `&behavior` token consumes
//! a fixed number of argument tokens that depends on the behavior.

use crate::constants::FALLBACK_TAPPING_TERM_MS;
use crate::keycode_db::KeycodeDb;
use crate::models::{KeyAction, Macro, OrderedMap, TapDanceTable, TimingBehavior};

/// Converts binding tokens, creating tap dances for hold-tap bindings.
#[derive(Debug)]
pub struct BindingConverter<'a> {
    db: &'a KeycodeDb,
    behaviors: &'a OrderedMap<TimingBehavior>,
    macros: &'a OrderedMap<Macro>,
    tap_dances: &'a mut TapDanceTable,
}

impl<'a> BindingConverter<'a> {
    /// Creates a converter over already-extracted behaviors and macros.
    pub fn new(
        db: &'a KeycodeDb,
        behaviors: &'a OrderedMap<TimingBehavior>,
        macros: &'a OrderedMap<Macro>,
        tap_dances: &'a mut TapDanceTable,
    ) -> Self {
        Self {
            db,
            behaviors,
            macros,
            tap_dances,
        }
    }

    /// Converts a whole binding list, left to right.
    ///
    /// Tokens outside an argument position that are not `&behavior`
    /// references are skipped. A behavior missing its arguments at the end of
    /// the list produces nothing.
    pub fn convert(&mut self, tokens: &[&str]) -> Vec<KeyAction> {
        self.convert_up_to(tokens, usize::MAX)
    }

    /// Converts a list that is expected to hold one binding (combos).
    ///
    /// Conversion stops at the first action, so trailing hold-taps never
    /// create tap dances.
    pub fn convert_single(&mut self, tokens: &[&str]) -> KeyAction {
        self.convert_up_to(tokens, 1)
            .pop()
            .unwrap_or(KeyAction::NoOp)
    }

    fn convert_up_to(&mut self, tokens: &[&str], limit: usize) -> Vec<KeyAction> {
        let mut actions = Vec::new();
        let mut i = 0;

        while i < tokens.len() && actions.len() < limit {
            let Some(behavior) = tokens[i].strip_prefix('&') else {
                i += 1;
                continue;
            };

            let (action, consumed) = self.convert_behavior(behavior, &tokens[i + 1..]);
            if let Some(action) = action {
                actions.push(action);
            }
            i += 1 + consumed;
        }

        actions
    }

    /// Converts one behavior; returns the action and how many arguments it used.
    fn convert_behavior(&mut self, behavior: &str, args: &[&str]) -> (Option<KeyAction>, usize) {
        match behavior {
            "none" => (Some(KeyAction::NoOp), 0),
            "trans" => (Some(KeyAction::Transparent), 0),
            "kp" => match args {
                [key, ..] => (Some(self.db.translate(key)), 1),
                [] => (None, 0),
            },
            "mt" | "mt0" | "mti" => match args {
                [hold, tap, ..] => (Some(self.tap_dance(tap, hold, behavior)), 2),
                _ => (None, 0),
            },
            "lt" => match args {
                [layer, key, ..] => {
                    let action = KeyAction::LayerTap {
                        layer: (*layer).to_string(),
                        tap: Box::new(self.db.translate(key)),
                    };
                    (Some(action), 2)
                }
                _ => (None, 0),
            },
            "mo" => match args {
                [layer, ..] => (Some(KeyAction::MomentaryLayer((*layer).to_string())), 1),
                [] => (None, 0),
            },
            "to" => match args {
                [layer, ..] => (Some(KeyAction::ToLayer((*layer).to_string())), 1),
                [] => (None, 0),
            },
            name if self.macros.contains_key(name) => {
                let index = self.macros.index_of(name).unwrap_or_default();
                (Some(KeyAction::MacroRef(index)), 0)
            }
            // Bluetooth profile control has no Vial equivalent
            "bt" => match args {
                ["BT_SEL", _, ..] => (Some(KeyAction::NoOp), 2),
                [_, ..] => (Some(KeyAction::NoOp), 1),
                [] => (Some(KeyAction::NoOp), 0),
            },
            // Custom hold-tap behaviors: &hm LGUI A
            other => match args {
                [hold, tap, ..] if !hold.starts_with('&') && !tap.starts_with('&') => {
                    (Some(self.tap_dance(tap, hold, other)), 2)
                }
                _ => {
                    tracing::debug!("Unsupported behavior '&{}', using KC_NO", other);
                    (Some(KeyAction::NoOp), 0)
                }
            },
        }
    }

    /// Creates (or reuses) the tap dance for a hold-tap binding.
    fn tap_dance(&mut self, tap_key: &str, hold_key: &str, owner: &str) -> KeyAction {
        let tap = self.db.translate(tap_key);
        let hold = self.db.translate(hold_key);
        let tapping_term_ms = self.tapping_term_for(owner);

        KeyAction::TapDanceRef(self.tap_dances.intern(tap, hold, tapping_term_ms))
    }

    /// Tapping term of the owning behavior, else of `mt`, else the fallback.
    fn tapping_term_for(&self, owner: &str) -> u32 {
        self.behaviors
            .get(owner)
            .or_else(|| self.behaviors.get("mt"))
            .map_or(FALLBACK_TAPPING_TERM_MS, |behavior| behavior.tapping_term_ms)
    }
}
