//! Template `.vil` discovery.
//!
//! A template supplies the fields this tool does not generate (uid,
//! protocol versions, unused layers, settings). A missing or broken
//! candidate is never an error: the next one is tried, and the built-in
//! default is used last.

use crate::vial::vil::VilFile;
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the template in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Read from this file
    File(PathBuf),
    /// [`VilFile::default_template`]
    BuiltIn,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::BuiltIn => write!(f, "built-in default"),
        }
    }
}

/// Reads and parses one `.vil` file.
pub fn read_template(path: &Path) -> Result<VilFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse template: {}", path.display()))
}

/// Finds the first readable template.
///
/// `explicit` is tried first, then each of `search_paths` in order.
pub fn load_template(
    explicit: Option<&Path>,
    search_paths: &[PathBuf],
) -> (VilFile, TemplateSource) {
    let candidates = explicit
        .into_iter()
        .chain(search_paths.iter().map(PathBuf::as_path));

    for path in candidates {
        match read_template(path) {
            Ok(vil) => {
                tracing::info!("Using template: {}", path.display());
                return (vil, TemplateSource::File(path.to_path_buf()));
            }
            Err(e) => tracing::debug!("Skipping template candidate: {:#}", e),
        }
    }

    tracing::info!("No template found, using built-in default structure");
    (VilFile::default_template(), TemplateSource::BuiltIn)
}
