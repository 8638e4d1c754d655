//! Application-wide constants.
//!
//! This module defines the binary name plus the fixed sizes of the
//! split keyboard and of the Vial `.vil` arrays.

/// The binary name, also the config directory name.
pub const APP_BINARY_NAME: &str = "zmk2vial";

/// Number of physical keys on the 3x6+3 split keyboard (Corne/Chocofi).
pub const LAYER_KEY_COUNT: usize = 42;

/// Number of layers a Vial layout always carries.
pub const VIAL_LAYER_COUNT: usize = 10;

/// Rows per layer in the Vial matrix (four per half).
pub const VIAL_ROWS_PER_LAYER: usize = 8;

/// Columns per Vial matrix row.
pub const VIAL_COLS_PER_ROW: usize = 6;

/// Tap dance slots in a Vial layout.
pub const VIAL_TAP_DANCE_SLOTS: usize = 32;

/// Macro slots in a Vial layout.
pub const VIAL_MACRO_SLOTS: usize = 16;

/// Combo slots in a Vial layout.
pub const VIAL_COMBO_SLOTS: usize = 32;

/// Tapping term written into padding tap dance rows.
pub const VIAL_DEFAULT_TAPPING_TERM_MS: u32 = 200;

/// Tapping term for a tap dance when no hold-tap behavior is declared.
pub const FALLBACK_TAPPING_TERM_MS: u32 = 140;

/// Vial settings key for the global tapping term.
pub const SETTING_TAPPING_TERM: &str = "4";

/// Vial settings key for the quick tap term (ZMK's require-prior-idle).
pub const SETTING_QUICK_TAP_TERM: &str = "10";

/// Hold-tap behaviors whose timing becomes the global Vial tapping term, in priority order.
pub const DEFAULT_BEHAVIOR_NAMES: [&str; 2] = ["mt", "mt0"];

/// The Vial keycode for "no action".
pub const KC_NO: &str = "KC_NO";

/// Template locations tried when no template is given explicitly.
pub const DEFAULT_TEMPLATE_PATHS: [&str; 3] = ["/tmp/vial.vil", "vial.vil", "template.vil"];

/// Output file written by `convert` when no path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "zmk-converted.vil";

/// GitHub repository fetched when no local keymap is given.
pub const DEFAULT_REPO: &str = "timur-hassan/zmk-config-chocofi";

/// Branch of [`DEFAULT_REPO`] to fetch from.
pub const DEFAULT_BRANCH: &str = "master";

/// Keymap file path inside the repository.
pub const DEFAULT_KEYMAP_PATH: &str = "config/corne.keymap";

/// Base URL for raw file downloads from GitHub.
pub const GITHUB_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
