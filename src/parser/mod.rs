//! ZMK keymap parsing.
//!
//! This module turns devicetree-style `.keymap` sources into the [`Keymap`]
//! model: block scanning, binding conversion and the extraction passes for
//! behaviors, macros, combos and layers.
//!
//! [`Keymap`]: crate::models::Keymap

pub mod bindings;
pub mod blocks;
pub mod keymap;

// Re-export commonly used functions
pub use bindings::BindingConverter;
pub use keymap::{parse_keymap_file, parse_keymap_str};
