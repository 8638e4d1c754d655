//! Projection of a [`Keymap`] onto a Vial `.vil` record.
//!
//! The Corne/Chocofi keymap lists its 42 keys row by row across both
//! halves. Vial stores each half as its own rows, and the right half is
//! wired mirrored, so its rows are reversed:
//!
//! ```text
//! ZMK slot order            Vial rows
//!  0..6   | 6..12           0: 0..6        4: rev(6..12)
//! 12..18  | 18..24          1: 12..18      5: rev(18..24)
//! 24..30  | 30..36          2: 24..30      6: rev(30..36)
//!   36..39 | 39..42         3: -1 -1 -1 36..39
//!                           7: -1 -1 -1 rev(39..42)
//! ```

use crate::constants::{
    KC_NO, SETTING_QUICK_TAP_TERM, SETTING_TAPPING_TERM, VIAL_COMBO_SLOTS, VIAL_LAYER_COUNT,
    VIAL_MACRO_SLOTS, VIAL_TAP_DANCE_SLOTS,
};
use crate::models::{KeyAction, Keymap, MacroAction};
use crate::vial::vil::{
    combo_row, empty_combo_row, empty_layer, empty_tap_dance_row, tap_dance_row, LayoutCell,
    VialLayer, VilFile,
};
use serde_json::{Map, Value};
use std::ops::Range;

/// Slots of one half-row.
const HALF_ROW: usize = 6;
/// Unused matrix positions before the thumb keys.
const THUMB_PADDING: usize = 3;

/// Builds a `.vil` record from a keymap and a template.
#[derive(Debug)]
pub struct VialGenerator<'a> {
    keymap: &'a Keymap,
    template: &'a VilFile,
}

impl<'a> VialGenerator<'a> {
    /// Creates a generator.
    pub fn new(keymap: &'a Keymap, template: &'a VilFile) -> Self {
        Self { keymap, template }
    }

    /// Produces the output record.
    ///
    /// Tap dances, macros, combos, layout and settings are rebuilt; every
    /// other template field is copied unchanged.
    #[must_use]
    pub fn generate(&self) -> VilFile {
        VilFile {
            layout: self.layout(),
            macros: self.macros(),
            tap_dance: self.tap_dances(),
            combo: self.combos(),
            settings: self.settings(),
            ..self.template.clone()
        }
    }

    /// Tap dance rows padded to [`VIAL_TAP_DANCE_SLOTS`].
    fn tap_dances(&self) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .keymap
            .tap_dances
            .entries()
            .iter()
            .map(|td| {
                let keys = [&td.tap, &td.hold, &td.double_tap, &td.tap_hold];
                tap_dance_row(keys.map(ToString::to_string), td.tapping_term_ms)
            })
            .collect();

        pad(&mut rows, VIAL_TAP_DANCE_SLOTS, empty_tap_dance_row);
        rows
    }

    /// Macro rows in definition order, padded to [`VIAL_MACRO_SLOTS`].
    fn macros(&self) -> Vec<Vec<Value>> {
        let mut rows: Vec<Vec<Value>> = self
            .keymap
            .macros
            .values()
            .map(|m| m.actions.iter().map(MacroAction::to_vial).collect())
            .collect();

        pad(&mut rows, VIAL_MACRO_SLOTS, Vec::new);
        rows
    }

    /// Combo rows padded to [`VIAL_COMBO_SLOTS`].
    ///
    /// Vial triggers combos by keycode, not position, so only the result
    /// slot carries information.
    fn combos(&self) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .keymap
            .combos
            .iter()
            .map(|combo| combo_row(&combo.result.to_string()))
            .collect();

        pad(&mut rows, VIAL_COMBO_SLOTS, empty_combo_row);
        rows
    }

    /// Exactly [`VIAL_LAYER_COUNT`] layers: keymap layers first, then the
    /// template's layers at the remaining indices.
    fn layout(&self) -> Vec<VialLayer> {
        let layers = &self.keymap.layers;
        if layers.len() > VIAL_LAYER_COUNT {
            tracing::warn!(
                "Keymap has {} layers, Vial holds {}; dropping the rest",
                layers.len(),
                VIAL_LAYER_COUNT
            );
        }

        (0..VIAL_LAYER_COUNT)
            .map(|idx| match layers.get(idx) {
                Some(layer) => project_layer(&layer.keys),
                None => self
                    .template
                    .layout
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(empty_layer),
            })
            .collect()
    }

    /// Template settings with the tapping term and quick tap term applied.
    ///
    /// Existing keys keep their position; new keys are appended.
    fn settings(&self) -> Map<String, Value> {
        let mut settings = self.template.settings.clone();

        if let Some(behavior) = self.keymap.default_behavior() {
            settings.insert(
                SETTING_TAPPING_TERM.to_string(),
                Value::from(behavior.tapping_term_ms),
            );
            if behavior.require_prior_idle_ms > 0 {
                settings.insert(
                    SETTING_QUICK_TAP_TERM.to_string(),
                    Value::from(behavior.require_prior_idle_ms),
                );
            }
        }

        settings
    }
}

/// Projects 42 keymap slots onto the eight Vial rows of one layer.
///
/// Missing slots read as `KC_NO`.
#[must_use]
pub fn project_layer(keys: &[KeyAction]) -> VialLayer {
    let row = |start: usize| slots(keys, start..start + HALF_ROW).collect::<Vec<_>>();
    let mirrored = |start: usize| slots(keys, start..start + HALF_ROW).rev().collect::<Vec<_>>();

    let thumb_start = 6 * HALF_ROW;
    let left_thumbs = thumb_row(slots(keys, thumb_start..thumb_start + 3));
    let right_thumbs = thumb_row(slots(keys, thumb_start + 3..thumb_start + 6).rev());

    vec![
        row(0),
        row(12),
        row(24),
        left_thumbs,
        mirrored(6),
        mirrored(18),
        mirrored(30),
        right_thumbs,
    ]
}

fn slots(
    keys: &[KeyAction],
    range: Range<usize>,
) -> impl DoubleEndedIterator<Item = LayoutCell> + '_ {
    range.map(|idx| {
        keys.get(idx)
            .map_or_else(|| LayoutCell::key(KC_NO), |key| LayoutCell::Key(key.to_string()))
    })
}

fn thumb_row(thumbs: impl Iterator<Item = LayoutCell>) -> Vec<LayoutCell> {
    std::iter::repeat_n(LayoutCell::UNUSED, THUMB_PADDING)
        .chain(thumbs)
        .collect()
}

fn pad<T>(rows: &mut Vec<T>, capacity: usize, fill: impl Fn() -> T) {
    while rows.len() < capacity {
        rows.push(fill());
    }
}
