//! Shared helpers for command handlers.

use std::io::IsTerminal;

use crate::error::CliError;

/// Confirm a destructive action.
///
/// `--yes` skips the prompt; non-interactive sessions without `--yes` fail
/// rather than hang.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }

    if !std::io::stdin().is_terminal() {
        return Err(CliError::ConfirmationRequired {
            action: prompt.to_owned(),
        });
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Validation {
            field: "confirmation".into(),
            reason: e.to_string(),
        })?;

    Ok(confirmed)
}

/// Parse an RFC 3339 timestamp flag.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<chrono::DateTime<chrono::Utc>, CliError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| CliError::Validation {
            field: field.to_owned(),
            reason: format!("expected RFC 3339 timestamp: {e}"),
        })
}

/// Render an optional value as `-` when absent.
pub fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

/// Render an optional timestamp compactly.
pub fn dash_time(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}
