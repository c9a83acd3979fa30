use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Bearer-token credentials for the Access controller.
///
/// Holds the opaque API token and an optional expiry timestamp. The token
/// is set at construction (or by an explicit [`rotate`](Self::rotate) from
/// a re-authentication flow) and is read-only everywhere else -- rotation
/// takes `&mut self`, so callers coordinate it externally instead of this
/// type carrying a lock.
#[derive(Debug, Clone)]
pub struct TokenCredentials {
    token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenCredentials {
    /// Create credentials from an API token.
    ///
    /// Tokens are generated at: Access > Settings > Advanced > API Token.
    pub fn new(token: SecretString, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// The `Authorization` header value for authenticated calls.
    ///
    /// An absent token is a hard authentication failure -- no request or
    /// stream handshake may be attempted with empty credentials.
    pub fn bearer_header(&self) -> Result<String, Error> {
        let token = self.token.expose_secret();
        if token.is_empty() {
            return Err(Error::Authentication {
                message: "API token not provided".into(),
                status: None,
                body: None,
            });
        }
        Ok(format!("Bearer {token}"))
    }

    /// Whether the token's expiry timestamp (if known) has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// The recorded expiry timestamp, if any.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Replace the token after re-authentication.
    ///
    /// The only mutation point. Callers must not rotate concurrently with
    /// an in-flight request that depends on the old token.
    pub fn rotate(&mut self, token: SecretString, expires_at: Option<DateTime<Utc>>) {
        self.token = token;
        self.expires_at = expires_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_formats_token() {
        let creds = TokenCredentials::new(SecretString::from("abc123".to_string()), None);
        assert_eq!(creds.bearer_header().unwrap(), "Bearer abc123");
    }

    #[test]
    fn empty_token_is_an_authentication_error() {
        let creds = TokenCredentials::new(SecretString::from(String::new()), None);
        let err = creds.bearer_header().unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
        assert_eq!(err.kind(), "authentication");
    }

    #[test]
    fn expiry_is_checked_against_now() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let future = Utc::now() + chrono::Duration::hours(1);

        let expired = TokenCredentials::new(SecretString::from("t".to_string()), Some(past));
        let valid = TokenCredentials::new(SecretString::from("t".to_string()), Some(future));
        let unknown = TokenCredentials::new(SecretString::from("t".to_string()), None);

        assert!(expired.is_expired());
        assert!(!valid.is_expired());
        assert!(!unknown.is_expired());
    }

    #[test]
    fn rotate_replaces_token() {
        let mut creds = TokenCredentials::new(SecretString::from("old".to_string()), None);
        creds.rotate(SecretString::from("new".to_string()), None);
        assert_eq!(creds.bearer_header().unwrap(), "Bearer new");
    }
}
