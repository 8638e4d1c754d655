//! Keycode translation command.

use crate::cli::common::{load_keycode_db, CliError, CliResult};
use crate::keycode_db::KeycodeDb;
use crate::models::action::split_wrapped;
use clap::Args;
use serde::Serialize;

/// Translate a ZMK key name into its Vial keycode
#[derive(Debug, Clone, Args)]
pub struct KeycodeArgs {
    /// ZMK key name (e.g. "BSPC", "LG(LS(K))")
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TranslateResult {
    input: String,
    keycode: String,
    known: bool,
}

impl KeycodeArgs {
    /// Execute the keycode command
    pub fn execute(&self) -> CliResult<()> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(CliError::validation("Key name must not be empty"));
        }
        if token.starts_with('&') {
            return Err(CliError::validation(format!(
                "Expected a key name, got a binding: {token} (try the key after &kp)"
            )));
        }

        let db = load_keycode_db()?;
        let result = TranslateResult {
            input: token.to_string(),
            keycode: db.translate(token).to_string(),
            known: is_known(&db, token),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&result)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Input:   {}", result.input);
            println!("Keycode: {}", result.keycode);
            if !result.known {
                println!("Note:    not in the keycode table, passed through as {}", result.keycode);
            }
        }

        Ok(())
    }
}

/// True when every key in the token is a table entry or an explicit `KC_` code.
fn is_known(db: &KeycodeDb, token: &str) -> bool {
    match split_wrapped(token) {
        Some((_, inner)) => is_known(db, inner),
        None => db.is_known(token) || token.starts_with("KC_"),
    }
}
