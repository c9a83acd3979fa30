// ── Core error types ──
//
// User-facing errors from accessly-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly -- the `From` impl below
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("cannot connect to controller: {message}")]
    ConnectionFailed { message: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code, if the error came from a response.
        status: Option<u16>,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// The upstream developer API does not expose this operation. Raised
    /// locally, without a network round trip.
    #[error("{operation} is not available in the developer API")]
    Unsupported { operation: &'static str },

    // ── Configuration / payload errors ───────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A response decoded fine but did not have the expected shape.
    #[error("unexpected response payload: {message}")]
    Payload { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<accessly_api::Error> for CoreError {
    fn from(err: accessly_api::Error) -> Self {
        match err {
            accessly_api::Error::Authentication { message, .. } => {
                CoreError::AuthenticationFailed { message }
            }
            accessly_api::Error::Validation { message, .. } => {
                CoreError::ValidationFailed { message }
            }
            accessly_api::Error::Permission { message, .. } => {
                CoreError::PermissionDenied { message }
            }
            accessly_api::Error::NotFound { message, .. } => CoreError::NotFound { message },
            accessly_api::Error::RateLimit { message, .. } => CoreError::RateLimited { message },
            accessly_api::Error::Api {
                message, status, ..
            } => CoreError::Api {
                message,
                status: Some(status),
            },
            accessly_api::Error::Connection { message, .. } => {
                CoreError::ConnectionFailed { message }
            }
            accessly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            accessly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            accessly_api::Error::Tls(message) => CoreError::ConnectionFailed {
                message: format!("TLS error: {message}"),
            },
        }
    }
}
