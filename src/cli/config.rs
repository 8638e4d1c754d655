//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug, Default)]
pub struct ConfigSetArgs {
    /// Default GitHub repository (owner/name)
    #[arg(long, value_name = "REPO")]
    repo: Option<String>,

    /// Default branch
    #[arg(long, value_name = "BRANCH")]
    branch: Option<String>,

    /// Default keymap path inside the repository
    #[arg(long, value_name = "PATH")]
    keymap_path: Option<String>,

    /// Default output .vil file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Template search path; repeat to list several, in order
    #[arg(long = "template-path", value_name = "FILE")]
    template_paths: Vec<PathBuf>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            let json = serde_json::to_string_pretty(&config).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            print_config(&config);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        let mut config = Config::load().unwrap_or_else(|e| {
            tracing::warn!("Replacing unreadable config file: {:#}", e);
            Config::default()
        });
        self.apply(&mut config)?;

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }

    /// Applies the given options; the result must still be valid.
    fn apply(&self, config: &mut Config) -> CliResult<()> {
        if self.repo.is_none()
            && self.branch.is_none()
            && self.keymap_path.is_none()
            && self.output.is_none()
            && self.template_paths.is_empty()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --repo, --branch, --keymap-path, --output, or --template-path",
            ));
        }

        if let Some(repo) = &self.repo {
            config.source.repo.clone_from(repo);
        }
        if let Some(branch) = &self.branch {
            config.source.branch.clone_from(branch);
        }
        if let Some(path) = &self.keymap_path {
            config.source.keymap_path.clone_from(path);
        }
        if let Some(path) = &self.output {
            config.output.path.clone_from(path);
        }
        if !self.template_paths.is_empty() {
            config.template.search_paths.clone_from(&self.template_paths);
        }

        config
            .validate()
            .map_err(|e| CliError::validation(e.to_string()))
    }
}

fn print_config(config: &Config) {
    println!("Source:");
    println!("  repo:        {}", config.source.repo);
    println!("  branch:      {}", config.source.branch);
    println!("  keymap_path: {}", config.source.keymap_path);
    println!("Template search paths:");
    for path in &config.template.search_paths {
        println!("  {}", path.display());
    }
    println!("Output:");
    println!("  path:        {}", config.output.path.display());
}
