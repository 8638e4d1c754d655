//! Vial `.vil` generation.
//!
//! This module projects a parsed keymap onto a Vial layout record, finds
//! the template record to start from, and writes the result as compact
//! JSON.

pub mod generator;
pub mod template;
pub mod vil;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

// Re-export commonly used types
pub use generator::{project_layer, VialGenerator};
pub use template::{load_template, read_template, TemplateSource};
pub use vil::{LayoutCell, VilFile};

/// Serializes a record as compact JSON, as Vial writes it.
pub fn to_json(vil: &VilFile) -> Result<String> {
    serde_json::to_string(vil).context("Failed to serialize .vil file")
}

/// Writes a record to `path`.
///
/// Nothing is written if serialization fails.
pub fn write_vil(path: &Path, vil: &VilFile) -> Result<()> {
    let content = to_json(vil)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write .vil file: {}", path.display()))
}
