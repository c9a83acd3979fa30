//! Resolution of CLI flags + config profiles into a `ClientConfig`.
//!
//! Precedence: explicit flags (and their env vars) over profile values
//! over built-in defaults.

use std::time::Duration;

use secrecy::SecretString;

use accessly_config::{Config, config_path, load_config_or_default, resolve_token};
use accessly_core::{ClientConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The profile name in effect: `--profile`, then the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref host) = global.host {
            profile.host.clone_from(host);
        }
        if let Some(port) = global.port {
            profile.port = port;
        }

        let token = match global.token {
            Some(ref token) => SecretString::from(token.clone()),
            None => resolve_token(&profile, &profile_name)?,
        };

        let mut config = ClientConfig::new(profile.host.clone(), token);
        config.port = profile.port;
        config.tls = if global.verify_tls || profile.verify_tls.unwrap_or(false) {
            TlsMode::System
        } else {
            TlsMode::DangerAcceptInvalid
        };
        config.timeout = Duration::from_secs(profile.timeout.unwrap_or(global.timeout));
        if let Some(max_retries) = profile.max_retries {
            config.max_retries = max_retries;
        }
        return Ok(config);
    }

    // No profile found -- build from CLI flags / env vars alone.
    let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let token = global.token.clone().ok_or_else(|| CliError::NoToken {
        profile: profile_name,
    })?;

    let mut config = ClientConfig::new(host, SecretString::from(token));
    if let Some(port) = global.port {
        config.port = port;
    }
    config.tls = if global.verify_tls {
        TlsMode::System
    } else {
        TlsMode::DangerAcceptInvalid
    };
    config.timeout = Duration::from_secs(global.timeout);
    Ok(config)
}
