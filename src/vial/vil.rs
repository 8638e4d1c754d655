//! The Vial `.vil` record.
//!
//! Fields the generator rewrites are typed. Everything else Vial stores in
//! the file is kept in [`VilFile::extra`] and written back untouched.

use crate::constants::{
    KC_NO, VIAL_COLS_PER_ROW, VIAL_COMBO_SLOTS, VIAL_DEFAULT_TAPPING_TERM_MS, VIAL_LAYER_COUNT,
    VIAL_MACRO_SLOTS, VIAL_ROWS_PER_LAYER, VIAL_TAP_DANCE_SLOTS,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One cell of the Vial key matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutCell {
    /// A keycode such as `KC_A` or `LT1(KC_SPACE)`
    Key(String),
    /// A matrix position with no physical key (Vial writes `-1`)
    Unused(i64),
}

impl LayoutCell {
    /// The sentinel Vial uses for matrix positions without a key.
    pub const UNUSED: Self = Self::Unused(-1);

    /// Creates a keycode cell.
    pub fn key(keycode: impl Into<String>) -> Self {
        Self::Key(keycode.into())
    }

    /// Returns the keycode, or `None` for an unused position.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(keycode) => Some(keycode),
            Self::Unused(_) => None,
        }
    }
}

/// One layer of the key matrix: rows of cells.
pub type VialLayer = Vec<Vec<LayoutCell>>;

/// A Vial `.vil` layout file.
///
/// Missing fields in a loaded file take the values of
/// [`VilFile::default_template`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VilFile {
    /// File format version
    pub version: u32,
    /// Keyboard unique id
    pub uid: u64,
    /// Key matrix per layer
    pub layout: Vec<VialLayer>,
    /// Encoder assignments per layer
    pub encoder_layout: Vec<Value>,
    /// Selected layout options bitmask
    pub layout_options: i64,
    /// Macro steps per macro slot
    #[serde(rename = "macro")]
    pub macros: Vec<Vec<Value>>,
    /// Vial protocol version
    pub vial_protocol: u32,
    /// VIA protocol version
    pub via_protocol: u32,
    /// Tap dance slots, see [`tap_dance_row`]
    pub tap_dance: Vec<Value>,
    /// Combo slots, see [`combo_row`]
    pub combo: Vec<Value>,
    /// Key override slots
    pub key_override: Vec<Value>,
    /// Alt repeat key slots
    pub alt_repeat_key: Vec<Value>,
    /// QMK settings keyed by setting id, in file order
    pub settings: Map<String, Value>,
    /// Fields this tool does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VilFile {
    /// The record used when no template file is available.
    ///
    /// Ten empty layers, every slot array at its Vial capacity and no
    /// settings.
    #[must_use]
    pub fn default_template() -> Self {
        Self {
            version: 1,
            uid: 15_126_841_831_861_545_787,
            layout: vec![empty_layer(); VIAL_LAYER_COUNT],
            encoder_layout: vec![Value::Array(Vec::new()); VIAL_LAYER_COUNT],
            layout_options: -1,
            macros: vec![Vec::new(); VIAL_MACRO_SLOTS],
            vial_protocol: 5,
            via_protocol: 9,
            tap_dance: vec![empty_tap_dance_row(); VIAL_TAP_DANCE_SLOTS],
            combo: vec![empty_combo_row(); VIAL_COMBO_SLOTS],
            key_override: Vec::new(),
            alt_repeat_key: Vec::new(),
            settings: Map::new(),
            extra: Map::new(),
        }
    }
}

impl Default for VilFile {
    fn default() -> Self {
        Self::default_template()
    }
}

/// A layer with every matrix position set to `KC_NO`.
#[must_use]
pub fn empty_layer() -> VialLayer {
    vec![vec![LayoutCell::key(KC_NO); VIAL_COLS_PER_ROW]; VIAL_ROWS_PER_LAYER]
}

/// A tap dance slot: `[tap, hold, double tap, tap-hold, tapping term]`.
#[must_use]
pub fn tap_dance_row(keys: [String; 4], tapping_term_ms: u32) -> Value {
    let [tap, hold, double_tap, tap_hold] = keys;
    json!([tap, hold, double_tap, tap_hold, tapping_term_ms])
}

/// A tap dance slot that does nothing.
#[must_use]
pub fn empty_tap_dance_row() -> Value {
    tap_dance_row(
        std::array::from_fn(|_| KC_NO.to_string()),
        VIAL_DEFAULT_TAPPING_TERM_MS,
    )
}

/// A combo slot: four trigger keycodes, then the result.
///
/// Trigger keys stay `KC_NO`.
#[must_use]
pub fn combo_row(result: &str) -> Value {
    json!([KC_NO, KC_NO, KC_NO, KC_NO, result])
}

/// A combo slot that does nothing.
#[must_use]
pub fn empty_combo_row() -> Value {
    combo_row(KC_NO)
}
