//! Keymap inspection command.

use crate::cli::common::{load_keycode_db, CliError, CliResult, SourceArgs};
use crate::config::Config;
use crate::models::Keymap;
use clap::Args;

/// Keys printed per line in the text listing.
const KEYS_PER_LINE: usize = 12;

/// Show what would be extracted from a ZMK keymap
#[derive(Debug, Clone, Default, Args)]
pub struct InspectArgs {
    /// Keymap source
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let db = load_keycode_db()?;
        let keymap = self.source.load_keymap(config, &db)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&keymap)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            print_keymap(&keymap);
        }

        Ok(())
    }
}

fn print_keymap(keymap: &Keymap) {
    println!("Layers ({}):", keymap.layers.len());
    for (idx, layer) in keymap.layers.iter().enumerate() {
        println!("  {idx}: {} ({} keys)", layer.name, layer.keys.len());
        for chunk in layer.keys.chunks(KEYS_PER_LINE) {
            let keys: Vec<String> = chunk.iter().map(ToString::to_string).collect();
            println!("     {}", keys.join(" "));
        }
    }

    println!("Behaviors ({}):", keymap.behaviors.len());
    for (name, behavior) in keymap.behaviors.iter() {
        println!(
            "  {name}: tapping-term {}ms, flavor {}, prior-idle {}ms",
            behavior.tapping_term_ms, behavior.flavor, behavior.require_prior_idle_ms
        );
    }

    println!("Macros ({}):", keymap.macros.len());
    for (idx, (name, m)) in keymap.macros.iter().enumerate() {
        let steps: Vec<String> = m.actions.iter().map(|a| a.to_vial().to_string()).collect();
        println!("  M{idx} {name}: {}", steps.join(" "));
    }

    println!("Combos ({}):", keymap.combos.len());
    for combo in &keymap.combos {
        let positions: Vec<String> = combo.key_positions.iter().map(u32::to_string).collect();
        println!("  [{}] -> {}", positions.join(" "), combo.result);
    }

    println!("Tap dances ({}):", keymap.tap_dances.len());
    for (idx, td) in keymap.tap_dances.entries().iter().enumerate() {
        println!(
            "  TD({idx}): tap {}, hold {}, term {}ms",
            td.tap, td.hold, td.tapping_term_ms
        );
    }
}
