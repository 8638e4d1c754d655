//! Shared CLI types: errors, exit codes and keymap source arguments.

use crate::config::Config;
use crate::keycode_db::KeycodeDb;
use crate::models::Keymap;
use crate::parser::parse_keymap_str;
use crate::source::KeymapSource;
use clap::Args;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Invalid arguments or input
    ValidationError = 1,
    /// A file, network or serialization operation failed
    IoError = 2,
}

impl ExitCode {
    /// Numeric code passed to [`std::process::exit`].
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CliError {
    /// Exit code category
    pub kind: ExitCode,
    /// Message shown to the user
    pub message: String,
}

impl CliError {
    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// The exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        self.kind
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Where to read the keymap from.
///
/// Unset options fall back to the `[source]` section of the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Path to a local .keymap file (default: fetch from GitHub)
    #[arg(short, long, value_name = "FILE")]
    pub local: Option<PathBuf>,

    /// GitHub repository to fetch from (owner/name)
    #[arg(short, long, value_name = "REPO")]
    pub repo: Option<String>,

    /// GitHub branch to fetch from
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Keymap path inside the repository
    #[arg(long, value_name = "PATH")]
    pub keymap_path: Option<String>,
}

impl SourceArgs {
    /// Combines the arguments with the configured defaults.
    pub fn resolve(&self, config: &Config) -> CliResult<KeymapSource> {
        if let Some(path) = &self.local {
            return Ok(KeymapSource::Local(path.clone()));
        }

        let mut merged = config.clone();
        if let Some(repo) = &self.repo {
            merged.source.repo.clone_from(repo);
        }
        if let Some(branch) = &self.branch {
            merged.source.branch.clone_from(branch);
        }
        if let Some(path) = &self.keymap_path {
            merged.source.keymap_path.clone_from(path);
        }
        merged
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid source: {e}")))?;

        Ok(KeymapSource::Remote {
            repo: merged.source.repo,
            branch: merged.source.branch,
            path: merged.source.keymap_path,
        })
    }

    /// Loads and parses the keymap.
    pub fn load_keymap(&self, config: &Config, db: &KeycodeDb) -> CliResult<Keymap> {
        let source = self.resolve(config)?;
        let text = source
            .load()
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        Ok(parse_keymap_str(&text, db))
    }
}

/// Loads the embedded keycode database.
pub fn load_keycode_db() -> CliResult<KeycodeDb> {
    KeycodeDb::load().map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))
}
