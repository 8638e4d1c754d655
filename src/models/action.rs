//! Key actions produced from ZMK bindings.

use serde::{Serialize, Serializer};
use std::fmt;

/// What a single key does once translated to Vial.
///
/// Every variant renders to exactly one Vial keycode string through
/// [`fmt::Display`]; that string is also the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// No action (`KC_NO`)
    NoOp,
    /// Falls through to the layer below (`KC_TRNS`)
    Transparent,
    /// A basic keycode such as `KC_A`
    Plain(String),
    /// A held modifier wrapped around another action, e.g. `LSFT(KC_A)`
    Modified {
        /// Vial modifier function name (`LSFT`, `LGUI`, ...)
        modifier: String,
        /// The wrapped action
        inner: Box<KeyAction>,
    },
    /// Layer active while held (`MO(n)`)
    MomentaryLayer(String),
    /// Switch to a layer (`TO(n)`)
    ToLayer(String),
    /// Layer on hold, key on tap (`LTn(kc)`)
    LayerTap {
        /// Layer activated on hold
        layer: String,
        /// Action sent on tap
        tap: Box<KeyAction>,
    },
    /// Reference into the tap dance table (`TD(n)`)
    TapDanceRef(usize),
    /// Reference into the macro list (`Mn`)
    MacroRef(usize),
}

impl KeyAction {
    /// Creates a plain keycode action.
    pub fn plain(keycode: impl Into<String>) -> Self {
        Self::Plain(keycode.into())
    }

    /// Wraps `inner` in a modifier.
    pub fn modified(modifier: impl Into<String>, inner: Self) -> Self {
        Self::Modified {
            modifier: modifier.into(),
            inner: Box::new(inner),
        }
    }

    /// Builds an action from a Vial keycode string.
    ///
    /// `KC_NO` and `KC_TRNS` become their dedicated variants and
    /// `MOD(inner)` forms are unwrapped recursively.
    ///
    /// # Examples
    ///
    /// ```
    /// use zmk2vial::models::KeyAction;
    ///
    /// let action = KeyAction::from_keycode("LSFT(KC_9)");
    /// assert_eq!(action, KeyAction::modified("LSFT", KeyAction::plain("KC_9")));
    /// ```
    pub fn from_keycode(keycode: &str) -> Self {
        if let Some((modifier, inner)) = split_wrapped(keycode) {
            return Self::modified(modifier, Self::from_keycode(inner));
        }

        match keycode {
            "KC_NO" => Self::NoOp,
            "KC_TRNS" | "KC_TRANSPARENT" => Self::Transparent,
            other => Self::plain(other),
        }
    }

    /// Follows a chain of modifiers down to the wrapped action.
    #[must_use]
    pub fn innermost(&self) -> &Self {
        match self {
            Self::Modified { inner, .. } => inner.innermost(),
            other => other,
        }
    }

    /// Modifier names from the outermost wrapper inwards.
    #[must_use]
    pub fn modifiers(&self) -> Vec<&str> {
        let mut modifiers = Vec::new();
        let mut current = self;
        while let Self::Modified { modifier, inner } = current {
            modifiers.push(modifier.as_str());
            current = inner;
        }
        modifiers
    }

    /// Checks if this action does nothing.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("KC_NO"),
            Self::Transparent => f.write_str("KC_TRNS"),
            Self::Plain(keycode) => f.write_str(keycode),
            Self::Modified { modifier, inner } => write!(f, "{modifier}({inner})"),
            Self::MomentaryLayer(layer) => write!(f, "MO({layer})"),
            Self::ToLayer(layer) => write!(f, "TO({layer})"),
            // Vial spells layer-tap with the layer fused into the function name
            Self::LayerTap { layer, tap } => write!(f, "LT{layer}({tap})"),
            Self::TapDanceRef(index) => write!(f, "TD({index})"),
            Self::MacroRef(index) => write!(f, "M{index}"),
        }
    }
}

impl Serialize for KeyAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Splits a `WORD(inner)` token into its function name and argument.
///
/// The name must be a non-empty run of word characters and the argument is
/// everything between the first `(` and the final `)`, so nested calls such
/// as `LG(LS(K))` split into `("LG", "LS(K)")`.
pub(crate) fn split_wrapped(token: &str) -> Option<(&str, &str)> {
    let open = token.find('(')?;
    let name = &token[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let inner = token[open + 1..].strip_suffix(')')?;
    if inner.is_empty() {
        return None;
    }

    Some((name, inner))
}
