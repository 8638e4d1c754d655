//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use crate::constants::{
    APP_BINARY_NAME, DEFAULT_BRANCH, DEFAULT_KEYMAP_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_REPO,
    DEFAULT_TEMPLATE_PATHS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable that replaces the config directory.
pub const CONFIG_DIR_ENV: &str = "ZMK2VIAL_CONFIG_DIR";

/// Where remote keymaps are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// GitHub repository as `owner/name`
    pub repo: String,
    /// Branch to fetch from
    pub branch: String,
    /// Keymap path inside the repository
    pub keymap_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            keymap_path: DEFAULT_KEYMAP_PATH.to_string(),
        }
    }
}

/// Template lookup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Candidate `.vil` files, tried in order
    pub search_paths: Vec<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            search_paths: DEFAULT_TEMPLATE_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default `.vil` output file
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/zmk2vial/config.toml`
/// - macOS: `~/Library/Application Support/zmk2vial/config.toml`
/// - Windows: `%APPDATA%\zmk2vial\config.toml`
///
/// Setting `ZMK2VIAL_CONFIG_DIR` uses `$ZMK2VIAL_CONFIG_DIR/config.toml` instead.
///
/// Every section and key is optional; missing values use the defaults.
///
/// ```toml
/// [source]
/// repo = "timur-hassan/zmk-config-chocofi"
/// branch = "master"
/// keymap_path = "config/corne.keymap"
///
/// [template]
/// search_paths = ["/tmp/vial.vil", "vial.vil", "template.vil"]
///
/// [output]
/// path = "zmk-converted.vil"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote keymap location
    pub source: SourceConfig,
    /// Template search
    pub template: TemplateConfig,
    /// Output location
    pub output: OutputConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// [`CONFIG_DIR_ENV`] overrides the platform-specific location.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_BINARY_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Writes configuration to a specific file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `repo` has the form `owner/name`
    /// - `branch` and `keymap_path` are not empty
    pub fn validate(&self) -> Result<()> {
        let repo_ok = self
            .source
            .repo
            .split_once('/')
            .is_some_and(|(owner, name)| {
                !owner.is_empty() && !name.is_empty() && !name.contains('/')
            });
        if !repo_ok {
            anyhow::bail!(
                "Invalid repository '{}': expected the form owner/name",
                self.source.repo
            );
        }

        if self.source.branch.trim().is_empty() {
            anyhow::bail!("Source branch must not be empty");
        }

        if self.source.keymap_path.trim().is_empty() {
            anyhow::bail!("Source keymap path must not be empty");
        }

        Ok(())
    }
}
