use serde_json::{Map, Value};
use thiserror::Error;

/// Decoded JSON object body, as returned by the Access controller.
pub type JsonMap = Map<String, Value>;

/// Top-level error type for the `accessly-api` crate.
///
/// A closed set of variants covering every failure mode of the request
/// pipeline and the event stream. HTTP-derived variants carry the raw
/// status code and decoded body for diagnostics; `accessly-core` maps
/// these into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token missing/empty (raised locally, before any network attempt)
    /// or rejected by the controller (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        status: Option<u16>,
        body: Option<JsonMap>,
    },

    // ── Classified HTTP responses ───────────────────────────────────
    /// Request payload rejected by the controller (HTTP 400).
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        status: u16,
        body: JsonMap,
    },

    /// Token lacks permission for the operation (HTTP 403).
    #[error("permission denied: {message}")]
    Permission {
        message: String,
        status: u16,
        body: JsonMap,
    },

    /// Requested resource does not exist (HTTP 404).
    #[error("resource not found: {message}")]
    NotFound {
        message: String,
        status: u16,
        body: JsonMap,
    },

    /// Request rate limit exceeded (HTTP 429). Never retried internally --
    /// pacing is the caller's decision.
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        status: u16,
        body: JsonMap,
    },

    /// Any other non-2xx response (5xx and unexpected statuses).
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        status: u16,
        body: JsonMap,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// Transport-level failure that survived the retry budget
    /// (connection refused, DNS failure, dropped connection), or an
    /// event-stream channel that could not be opened.
    #[error("connection failed: {message}")]
    Connection { message: String, attempts: u32 },

    /// An operation exceeded its configured deadline.
    #[error("timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Address construction failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Stable machine-readable kind string for this error.
    ///
    /// Useful for logging and for consumers that branch on the error
    /// family without matching every variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Validation { .. } | Self::InvalidUrl(_) => "validation",
            Self::Permission { .. } => "permission",
            Self::NotFound { .. } => "not_found",
            Self::RateLimit { .. } => "rate_limit",
            Self::Api { .. } => "api_error",
            Self::Connection { .. } | Self::Tls(_) => "connection",
            Self::Timeout { .. } => "timeout",
        }
    }

    /// The HTTP status code that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::Validation { status, .. }
            | Self::Permission { status, .. }
            | Self::NotFound { status, .. }
            | Self::RateLimit { status, .. }
            | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The decoded response body that produced this error, if any.
    pub fn body(&self) -> Option<&JsonMap> {
        match self {
            Self::Authentication { body, .. } => body.as_ref(),
            Self::Validation { body, .. }
            | Self::Permission { body, .. }
            | Self::NotFound { body, .. }
            | Self::RateLimit { body, .. }
            | Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if re-authenticating with a fresh token might
    /// resolve this error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
