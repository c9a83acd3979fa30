//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use accessly_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const RATE_LIMIT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Access controller")]
    #[diagnostic(
        code(accessly::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Detail: {message}"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(accessly::timeout),
        help("Increase --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(accessly::auth_failed),
        help(
            "Verify the API token. Generate one under\n\
             Access > Settings > Advanced > API Token, then run:\n\
             accessly config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(accessly::no_token),
        help(
            "Configure a token with: accessly config init\n\
             Or set the ACCESSLY_TOKEN environment variable."
        )
    )]
    NoToken { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(accessly::not_found))]
    NotFound { message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(accessly::permission),
        help("The token lacks permission for this operation.")
    )]
    Permission { message: String },

    #[error("Rate limited: {message}")]
    #[diagnostic(
        code(accessly::rate_limit),
        help("The controller is throttling requests. Wait and retry.")
    )]
    RateLimited { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(accessly::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    #[error("'{operation}' is not available in the developer API")]
    #[diagnostic(
        code(accessly::unsupported),
        help("The controller's developer API does not expose this surface.")
    )]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(accessly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(accessly::profile_not_found),
        help("List profiles with: accessly config profiles")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(accessly::no_config),
        help(
            "Create one with: accessly config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(accessly::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(accessly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    ConfirmationRequired { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(accessly::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Permission { .. } | Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::RateLimited { .. } => exit_code::RATE_LIMIT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ConfirmationRequired { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ConnectionFailed { message } => CliError::ConnectionFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { message } => CliError::NotFound { message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::PermissionDenied { message } => CliError::Permission { message },
            CoreError::RateLimited { message } => CliError::RateLimited { message },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::Unsupported { operation } => CliError::Unsupported {
                operation: operation.to_owned(),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Payload { message } => CliError::ApiError {
                message: format!("unexpected response payload: {message}"),
                status: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<accessly_config::ConfigError> for CliError {
    fn from(err: accessly_config::ConfigError) -> Self {
        match err {
            accessly_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            accessly_config::ConfigError::NoToken { profile } => CliError::NoToken { profile },
            accessly_config::ConfigError::Figment(e) => CliError::Config(e),
            accessly_config::ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            accessly_config::ConfigError::Keyring(e) => CliError::Validation {
                field: "keyring".into(),
                reason: e.to_string(),
            },
            accessly_config::ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
