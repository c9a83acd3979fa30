//! Endpoint discovery sweep.
//!
//! Controllers differ in which developer-API surfaces they expose; this
//! issues a cheap `limit=1` GET against each candidate path and reports
//! what answered. Useful when pointing the CLI at an unfamiliar firmware
//! version.

use owo_colors::OwoColorize;

use accessly_core::AccessDirectory;
use accessly_core::api::Error as ApiError;

use crate::cli::{GlobalOpts, ProbeArgs};
use crate::error::CliError;
use crate::output;

/// Candidate resource paths, relative to the versioned API prefix.
const DEFAULT_PROBE_PATHS: &[&str] = &[
    "/users",
    "/visitors",
    "/doors",
    "/door_groups",
    "/devices",
    "/access_policies",
    "/access-policies",
    "/schedules",
    "/holiday_groups",
    "/events",
    "/access-events",
    "/system-logs",
    "/credentials",
    "/nfc-cards",
    "/pin_codes",
    "/info",
    "/status",
];

pub async fn handle(
    directory: &AccessDirectory,
    args: ProbeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut paths: Vec<String> = DEFAULT_PROBE_PATHS
        .iter()
        .map(|&p| p.to_owned())
        .collect();
    if let Some(extra) = args.paths {
        paths.extend(extra);
    }

    let color = output::should_color(&global.color);
    let client = directory.client();
    let mut found: Vec<String> = Vec::new();

    for path in &paths {
        match client
            .get_with_params(path, &[("limit", "1".to_owned())])
            .await
        {
            Ok(payload) => {
                let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
                let mark = if color {
                    "✓".green().to_string()
                } else {
                    "✓".to_owned()
                };
                println!("{mark} {path}  (keys: {})", keys.join(", "));
                found.push(path.clone());
            }
            Err(e) => {
                // 404s are the expected answer for absent surfaces; only
                // show them when asked.
                let interesting = !matches!(e, ApiError::NotFound { .. });
                if args.all || interesting {
                    let mark = if color {
                        "✗".red().to_string()
                    } else {
                        "✗".to_owned()
                    };
                    println!("{mark} {path}  ({})", e.kind());
                }

                // A dead controller fails every probe the same way; stop
                // after the first connection-level failure.
                if matches!(e, ApiError::Connection { .. } | ApiError::Timeout { .. }) {
                    return Err(CliError::ConnectionFailed {
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    if !global.quiet {
        eprintln!("\n{} of {} endpoints answered", found.len(), paths.len());
    }
    Ok(())
}
