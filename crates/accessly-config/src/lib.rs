//! Shared configuration for accessly tools.
//!
//! TOML profiles, credential resolution (env var + keyring + plaintext),
//! and translation to `accessly_api::ClientConfig`. The CLI layers its
//! flag-aware overrides on top of this crate.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use accessly_api::{ClientConfig, DEFAULT_PORT, TlsMode};

/// Keyring service name under which tokens are stored.
pub const KEYRING_SERVICE: &str = "accessly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_insecure")]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: default_insecure(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_insecure() -> bool {
    // Access controllers ship with self-signed certificates.
    true
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller hostname or IP address.
    pub host: String,

    /// API port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// API token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Verify TLS certificates (off by default for self-signed setups).
    pub verify_tls: Option<bool>,

    /// Override request timeout in seconds.
    pub timeout: Option<u64>,

    /// Override the transport retry budget.
    pub max_retries: Option<u32>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "accessly", "accessly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("accessly");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ACCESSLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API token from the credential chain.
///
/// Order: profile's `token_env` env var, system keyring, plaintext field.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken {
        profile: profile_name.into(),
    })
}

/// Store an API token in the system keyring for a profile.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))?;
    entry.set_password(token)?;
    Ok(())
}

// ── ClientConfig construction ───────────────────────────────────────

/// Build a `ClientConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    if profile.host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "profile has no controller host".into(),
        });
    }

    let token = resolve_token(profile, profile_name)?;

    let mut config = ClientConfig::new(profile.host.clone(), token);
    config.port = profile.port;
    config.tls = if profile.verify_tls.unwrap_or(false) {
        TlsMode::System
    } else {
        TlsMode::DangerAcceptInvalid
    };
    if let Some(timeout) = profile.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
    if let Some(max_retries) = profile.max_retries {
        config.max_retries = max_retries;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(token: Option<&str>) -> Profile {
        Profile {
            host: "192.168.1.10".into(),
            port: DEFAULT_PORT,
            token: token.map(ToOwned::to_owned),
            token_env: None,
            verify_tls: None,
            timeout: Some(10),
            max_retries: Some(5),
        }
    }

    #[test]
    fn plaintext_token_resolves() {
        let token = resolve_token(&profile(Some("abc")), "test").expect("token resolves");
        use secrecy::ExposeSecret;
        assert_eq!(token.expose_secret(), "abc");
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = resolve_token(&profile(None), "test").expect_err("no token anywhere");
        assert!(matches!(err, ConfigError::NoToken { .. }));
    }

    #[test]
    fn profile_overrides_flow_into_client_config() {
        let config =
            profile_to_client_config(&profile(Some("abc")), "test").expect("valid profile");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 5);
        assert!(matches!(config.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut p = profile(Some("abc"));
        p.host = String::new();
        assert!(matches!(
            profile_to_client_config(&p, "test"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert("home".into(), profile(Some("abc")));

        let text = toml::to_string_pretty(&cfg).expect("serializes");
        let back: Config = toml::from_str(&text).expect("parses");
        assert!(back.profiles.contains_key("home"));
        assert_eq!(back.default_profile.as_deref(), Some("default"));
    }
}
