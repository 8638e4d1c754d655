//! CLI command handlers for zmk2vial.
//!
//! Each subcommand is an argument struct with an `execute` method that
//! returns a [`CliResult`]; `main` maps errors to process exit codes.

pub mod common;
pub mod config;
pub mod convert;
pub mod inspect;
pub mod keycode;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode, SourceArgs};
pub use config::ConfigArgs;
pub use convert::ConvertArgs;
pub use inspect::InspectArgs;
pub use keycode::KeycodeArgs;
