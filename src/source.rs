//! Keymap source retrieval.
//!
//! A keymap is read from a local file or downloaded from a GitHub
//! repository. Either failure is fatal for the run.

use crate::constants::GITHUB_RAW_BASE_URL;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where to read the ZMK keymap from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapSource {
    /// A file on disk
    Local(PathBuf),
    /// A file in a GitHub repository
    Remote {
        /// `owner/name`
        repo: String,
        /// Branch name
        branch: String,
        /// Path of the keymap inside the repository
        path: String,
    },
}

impl KeymapSource {
    /// Fetches the keymap text.
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Local(path) => read_local(path),
            Self::Remote { repo, branch, path } => fetch_remote(repo, branch, path),
        }
    }
}

impl fmt::Display for KeymapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote { repo, branch, path } => write!(f, "{}", raw_url(repo, branch, path)),
        }
    }
}

/// Raw download URL of a file in a GitHub repository.
///
/// # Examples
///
/// ```
/// use zmk2vial::source::raw_url;
///
/// assert_eq!(
///     raw_url("owner/zmk-config", "main", "config/corne.keymap"),
///     "https://raw.githubusercontent.com/owner/zmk-config/main/config/corne.keymap"
/// );
/// ```
#[must_use]
pub fn raw_url(repo: &str, branch: &str, path: &str) -> String {
    format!("{GITHUB_RAW_BASE_URL}/{repo}/{branch}/{path}")
}

/// Reads a keymap from disk.
pub fn read_local(path: &Path) -> Result<String> {
    tracing::info!("Loading local file: {}", path.display());
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keymap file: {}", path.display()))
}

/// Downloads a keymap from GitHub.
///
/// HTTP error statuses (e.g. 404 for a wrong branch) are errors too.
pub fn fetch_remote(repo: &str, branch: &str, path: &str) -> Result<String> {
    let url = raw_url(repo, branch, path);
    tracing::info!("Fetching from: {}", url);

    let response = reqwest::blocking::get(&url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .with_context(|| format!("Failed to fetch keymap from {url}"))?;

    response
        .text()
        .with_context(|| format!("Failed to read response body from {url}"))
}
