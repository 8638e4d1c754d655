//! ZMK to Vial Library
//!
//! This library converts ZMK keymaps (devicetree-style `.keymap` sources)
//! into Vial `.vil` layout files for split 3x6+3 keyboards such as the Corne
//! and Chocofi.
//!
//! The pipeline is one-way: [`source`] retrieves the keymap text,
//! [`parser`] extracts a [`models::Keymap`], and [`vial`] projects it onto a
//! `.vil` template and writes it out.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod keycode_db;
pub mod models;
pub mod parser;
pub mod source;
pub mod vial;
