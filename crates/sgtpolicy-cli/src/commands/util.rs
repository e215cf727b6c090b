//! Shared helpers for command handlers.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// In non-interactive contexts (stdin not a terminal), refuses instead
/// of silently proceeding.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }

    eprint!("{message} [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Read and parse a JSON file for `--file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}
