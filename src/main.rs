//! ZMK to Vial - keymap converter
//!
//! Converts a ZMK keymap, local or fetched from GitHub, into a `.vil` file
//! that Vial can load via File -> Load saved layout.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the default keymap from GitHub and convert it
//! zmk2vial
//!
//! # Convert a local keymap with a template exported from Vial
//! zmk2vial convert --local config/corne.keymap --template vial.vil -o corne.vil
//!
//! # Change the default repository
//! zmk2vial config set --repo owner/zmk-config --branch main
//!
//! # Show what the parser extracts
//! zmk2vial inspect --local config/corne.keymap --json
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zmk2vial::cli::{ConfigArgs, ConvertArgs, InspectArgs, KeycodeArgs};
use zmk2vial::config::Config;

/// ZMK to Vial - convert ZMK keymaps into Vial .vil files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments for the default convert command
    #[command(flatten)]
    convert: ConvertArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a ZMK keymap into a Vial .vil file (default)
    Convert(ConvertArgs),
    /// Show the layers, behaviors, macros, combos and tap dances of a keymap
    Inspect(InspectArgs),
    /// Translate a ZMK key name into its Vial keycode
    Keycode(KeycodeArgs),
    /// Show or change the default source, template and output settings
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring config file: {:#}", e);
        Config::default()
    });

    let result = match &cli.command {
        Some(Commands::Convert(args)) => args.execute(&config),
        Some(Commands::Inspect(args)) => args.execute(&config),
        Some(Commands::Keycode(args)) => args.execute(),
        Some(Commands::Config(args)) => args.execute(),
        None => cli.convert.execute(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code().code());
    }
}
