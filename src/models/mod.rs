//! Data models for ZMK keymaps.
//!
//! This module contains the data structures shared by the ZMK parser and the
//! Vial generator. Models carry no parsing or formatting logic of their own
//! beyond rendering key actions as Vial keycodes.

pub mod action;
pub mod keymap;
pub mod ordered_map;

// Re-export all model types
pub use action::KeyAction;
pub use keymap::{
    Combo, Keymap, Layer, Macro, MacroAction, TapDanceEntry, TapDanceTable, TimingBehavior,
};
pub use ordered_map::OrderedMap;
