//! Keymap to `.vil` conversion command.

use crate::cli::common::{load_keycode_db, CliError, CliResult, SourceArgs};
use crate::config::Config;
use crate::vial::{load_template, write_vil, VialGenerator};
use clap::Args;
use std::path::PathBuf;

/// Convert a ZMK keymap into a Vial .vil file
#[derive(Debug, Clone, Default, Args)]
pub struct ConvertArgs {
    /// Keymap source
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output .vil file path (default: zmk-converted.vil)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Template .vil file (default: auto-detect or use built-in)
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let db = load_keycode_db()?;
        let keymap = self.source.load_keymap(config, &db)?;

        let (template, template_source) =
            load_template(self.template.as_deref(), &config.template.search_paths);

        let vil = VialGenerator::new(&keymap, &template).generate();

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| config.output.path.clone());
        write_vil(&output, &vil).map_err(|e| CliError::io(format!("{e:#}")))?;

        let layer_names: Vec<&str> = keymap.layers.iter().map(|l| l.name.as_str()).collect();
        println!("Found {} layers: {}", keymap.layers.len(), layer_names.join(", "));
        println!("Found {} custom behaviors", keymap.behaviors.len());
        println!("Found {} macros", keymap.macros.len());
        println!("Found {} combos", keymap.combos.len());
        println!("Created {} tap dances", keymap.tap_dances.len());
        println!("Template: {template_source}");
        println!("Output written to: {}", output.display());
        println!();
        println!("To use: Load the .vil file in Vial via File -> Load saved layout");

        Ok(())
    }
}
