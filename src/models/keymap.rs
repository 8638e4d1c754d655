//! The keymap model extracted from a ZMK source file.

use crate::constants::{DEFAULT_BEHAVIOR_NAMES, LAYER_KEY_COUNT};
use crate::models::{KeyAction, OrderedMap};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Timing configuration of a ZMK hold-tap behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingBehavior {
    /// Behavior name (node label, or `mt` for the built-in override)
    pub name: String,
    /// `tapping-term-ms`
    pub tapping_term_ms: u32,
    /// `flavor` (e.g. "tap-preferred", "balanced")
    pub flavor: String,
    /// `require-prior-idle-ms`, 0 when unset
    pub require_prior_idle_ms: u32,
}

impl TimingBehavior {
    /// Default `tapping-term-ms` when the property is missing.
    pub const DEFAULT_TAPPING_TERM_MS: u32 = 200;
    /// Default `flavor` when the property is missing.
    pub const DEFAULT_FLAVOR: &'static str = "tap-preferred";

    /// Creates a behavior with ZMK's defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tapping_term_ms: Self::DEFAULT_TAPPING_TERM_MS,
            flavor: Self::DEFAULT_FLAVOR.to_string(),
            require_prior_idle_ms: 0,
        }
    }
}

/// One row of the Vial tap dance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TapDanceEntry {
    /// Sent on a single tap
    pub tap: KeyAction,
    /// Sent while held
    pub hold: KeyAction,
    /// Sent on a double tap
    pub double_tap: KeyAction,
    /// Sent on tap-then-hold
    pub tap_hold: KeyAction,
    /// Tapping term in milliseconds
    pub tapping_term_ms: u32,
}

impl TapDanceEntry {
    /// Creates a tap/hold entry; double tap and tap-hold do nothing.
    #[must_use]
    pub fn new(tap: KeyAction, hold: KeyAction, tapping_term_ms: u32) -> Self {
        Self {
            tap,
            hold,
            double_tap: KeyAction::NoOp,
            tap_hold: KeyAction::NoOp,
            tapping_term_ms,
        }
    }
}

/// Tap dances synthesized from hold-tap bindings, deduplicated by (tap, hold).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TapDanceTable {
    entries: Vec<TapDanceEntry>,
    by_pair: HashMap<(KeyAction, KeyAction), usize>,
}

impl TapDanceTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for a (tap, hold) pair, creating the entry if needed.
    ///
    /// The tapping term only applies when the pair is new; a repeated pair
    /// keeps the entry (and term) of its first occurrence.
    pub fn intern(&mut self, tap: KeyAction, hold: KeyAction, tapping_term_ms: u32) -> usize {
        let key = (tap, hold);
        if let Some(&idx) = self.by_pair.get(&key) {
            return idx;
        }

        let idx = self.entries.len();
        self.entries
            .push(TapDanceEntry::new(key.0.clone(), key.1.clone(), tapping_term_ms));
        self.by_pair.insert(key, idx);
        idx
    }

    /// All entries in index order.
    #[must_use]
    pub fn entries(&self) -> &[TapDanceEntry] {
        &self.entries
    }

    /// Gets an entry by index.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&TapDanceEntry> {
        self.entries.get(idx)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tap dance was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TapDanceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

/// One step of a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroAction {
    /// Types a literal string
    Text(String),
    /// Taps each key in order
    Tap(Vec<KeyAction>),
}

impl MacroAction {
    /// Converts to Vial's macro step form: `["text", s]` or `["tap", k1, k2, ...]`.
    #[must_use]
    pub fn to_vial(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::json!(["text", text]),
            Self::Tap(keys) => {
                let mut step = vec![serde_json::Value::from("tap")];
                step.extend(keys.iter().map(|key| serde_json::Value::from(key.to_string())));
                serde_json::Value::Array(step)
            }
        }
    }
}

impl Serialize for MacroAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_vial().serialize(serializer)
    }
}

/// A ZMK macro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Macro {
    /// Steps in order
    pub actions: Vec<MacroAction>,
}

/// A combo: keys pressed together produce one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combo {
    /// Physical key positions, in source order
    pub key_positions: Vec<u32>,
    /// Resulting action
    pub result: KeyAction,
}

/// One keymap layer with exactly [`LAYER_KEY_COUNT`] slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// Layer name (node name without the `_layer` suffix)
    pub name: String,
    /// Key actions in physical key order
    pub keys: Vec<KeyAction>,
}

impl Layer {
    /// Creates a layer, padding with `NoOp` up to [`LAYER_KEY_COUNT`] keys.
    ///
    /// Keys past the last physical position are dropped.
    pub fn new(name: impl Into<String>, mut keys: Vec<KeyAction>) -> Self {
        let name = name.into();
        if keys.len() > LAYER_KEY_COUNT {
            tracing::warn!(
                "Layer '{}' has {} bindings, keeping the first {}",
                name,
                keys.len(),
                LAYER_KEY_COUNT
            );
            keys.truncate(LAYER_KEY_COUNT);
        }
        keys.resize(LAYER_KEY_COUNT, KeyAction::NoOp);
        Self { name, keys }
    }
}

/// Everything extracted from a ZMK keymap source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Keymap {
    /// Layers in source order
    pub layers: Vec<Layer>,
    /// Hold-tap timing behaviors by name
    pub behaviors: OrderedMap<TimingBehavior>,
    /// Macros by name; the index is the `Mn` number
    pub macros: OrderedMap<Macro>,
    /// Combos in source order
    pub combos: Vec<Combo>,
    /// Tap dances created while converting bindings
    pub tap_dances: TapDanceTable,
}

impl Keymap {
    /// The behavior whose timing drives the global Vial tapping term.
    #[must_use]
    pub fn default_behavior(&self) -> Option<&TimingBehavior> {
        DEFAULT_BEHAVIOR_NAMES
            .iter()
            .find_map(|name| self.behaviors.get(name))
    }
}
