// Request executor for the Access developer API.
//
// Owns the retry/backoff loop. The two failure classes are handled
// differently and never mix:
//
//   1. transport failures (refused, DNS, timeout, dropped connection)
//      are retried with exponential backoff up to the configured budget;
//   2. any received HTTP response -- regardless of status -- goes straight
//      through the classifier and back to the caller, exactly once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenCredentials;
use crate::classify::{classify, decode_body};
use crate::error::{Error, JsonMap};
use crate::transport::{TlsMode, TransportConfig};

/// Default API port for Access controllers.
pub const DEFAULT_PORT: u16 = 12445;

// ── ClientConfig ─────────────────────────────────────────────────────

/// Connection configuration for one client instance.
///
/// Every knob is an explicit constructor-level parameter -- nothing is read
/// from ambient process state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller hostname or IP address.
    pub host: String,
    /// Bearer API token.
    pub token: SecretString,
    /// API port. Default: 12445.
    pub port: u16,
    /// TLS verification mode. Default: accept self-signed certificates.
    pub tls: TlsMode,
    /// Per-request timeout. Default: 30s.
    pub timeout: Duration,
    /// Retry budget for transport-level failures (`max_retries + 1` total
    /// attempts). Default: 3.
    pub max_retries: u32,
    /// Base delay for exponential request backoff (`retry_delay * 2^i`
    /// before attempt `i + 1`). Default: 1s.
    pub retry_delay: Duration,
    /// Flat delay between event-stream reconnection attempts. Default: 5s.
    pub reconnect_delay: Duration,
    /// Consecutive failed reconnections before the event stream gives up.
    /// Default: 10.
    pub max_reconnect_attempts: u32,
}

impl ClientConfig {
    /// Config for `host` with the documented defaults.
    pub fn new(host: impl Into<String>, token: SecretString) -> Self {
        Self {
            host: host.into(),
            token,
            port: DEFAULT_PORT,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_attempts: 10,
        }
    }

    /// Base address every request path is appended to.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host.trim_end_matches('/');
        Ok(Url::parse(&format!(
            "https://{host}:{}/api/v1/developer",
            self.port
        ))?)
    }

    /// Address of the companion event-stream channel.
    pub fn stream_url(&self) -> Result<Url, Error> {
        let host = self.host.trim_end_matches('/');
        Ok(Url::parse(&format!(
            "wss://{host}:{}/api/v1/events/ws",
            self.port
        ))?)
    }
}

// ── ApiClient ────────────────────────────────────────────────────────

/// Async client for the Access developer API.
///
/// Issues authenticated JSON requests against
/// `https://{host}:{port}/api/v1/developer` and classifies every received
/// response through [`classify`]. Cheap to share behind an `Arc`; retry
/// sleeps suspend only the calling task.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: TokenCredentials,
    max_retries: u32,
    retry_delay: Duration,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
        };

        Ok(Self {
            http: transport.build_client()?,
            base_url: config.base_url()?,
            credentials: TokenCredentials::new(config.token.clone(), None),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    /// Wrap an existing `reqwest::Client` (tests, custom transports).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: TokenCredentials,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            max_retries,
            retry_delay,
        }
    }

    /// The credentials backing this client.
    pub fn credentials(&self) -> &TokenCredentials {
        &self.credentials
    }

    /// Replace the bearer token (re-authentication override).
    ///
    /// Takes `&mut self`: callers coordinate rotation with in-flight
    /// requests externally.
    pub fn authenticate(&mut self, token: SecretString, expires_at: Option<DateTime<Utc>>) {
        self.credentials.rotate(token, expires_at);
    }

    /// Join a request path onto the base address.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{base}/{}",
            path.trim_start_matches('/')
        ))?)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Issue one logical request and classify the outcome.
    ///
    /// Transport failures are retried with exponential backoff: attempt `i`
    /// failing sleeps `retry_delay * 2^i` before attempt `i + 1`, for
    /// `max_retries + 1` attempts total. A response -- any response -- ends
    /// the loop immediately. Exhaustion surfaces a single
    /// [`Error::Connection`] carrying the attempt count.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: Option<&[(&str, String)]>,
    ) -> Result<JsonMap, Error> {
        let auth = self.credentials.bearer_header()?;
        let url = self.url(path)?;

        for attempt in 0..=self.max_retries {
            debug!(%method, %url, attempt, "sending request");

            let transport_err = match self.send_once(&method, &url, &auth, body, query).await {
                Ok((status, text)) => return classify(status, decode_body(&text)),
                Err(e) => e,
            };

            if attempt == self.max_retries {
                let attempts = self.max_retries + 1;
                return Err(Error::Connection {
                    message: format!("request failed after {attempts} attempts: {transport_err}"),
                    attempts,
                });
            }

            let delay = self.retry_delay * 2_u32.saturating_pow(attempt);
            warn!(
                error = %transport_err,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "transport error, retrying"
            );
            tokio::time::sleep(delay).await;
        }

        unreachable!("retry loop returns on the final attempt")
    }

    /// One attempt: send the request and read the body.
    ///
    /// Any `reqwest::Error` out of here -- including a failed body read --
    /// is a transport-level failure eligible for retry.
    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        auth: &str,
        body: Option<&Value>,
        query: Option<&[(&str, String)]>,
    ) -> Result<(u16, String), reqwest::Error> {
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(AUTHORIZATION, auth);

        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok((status, text))
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub async fn get(&self, path: &str) -> Result<JsonMap, Error> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn get_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<JsonMap, Error> {
        self.request(Method::GET, path, None, Some(params)).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<JsonMap, Error> {
        self.request(Method::POST, path, Some(body), None).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<JsonMap, Error> {
        self.request(Method::PUT, path, Some(body), None).await
    }

    pub async fn delete(&self, path: &str) -> Result<JsonMap, Error> {
        self.request(Method::DELETE, path, None, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_includes_versioned_prefix() {
        let config = ClientConfig::new("192.168.1.10", SecretString::from("tok".to_string()));
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://192.168.1.10:12445/api/v1/developer"
        );
    }

    #[test]
    fn stream_url_is_derived_from_the_same_host() {
        let mut config =
            ClientConfig::new("door.example.com", SecretString::from("tok".to_string()));
        config.port = 8443;
        assert_eq!(
            config.stream_url().unwrap().as_str(),
            "wss://door.example.com:8443/api/v1/events/ws"
        );
    }

    #[test]
    fn trailing_host_slash_is_stripped() {
        let config = ClientConfig::new("10.0.0.5/", SecretString::from("tok".to_string()));
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://10.0.0.5:12445/api/v1/developer"
        );
    }

    #[test]
    fn request_paths_join_onto_the_prefix() {
        let config = ClientConfig::new("10.0.0.5", SecretString::from("tok".to_string()));
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.url("/users/u1").unwrap().as_str(),
            "https://10.0.0.5:12445/api/v1/developer/users/u1"
        );
        assert_eq!(
            client.url("doors").unwrap().as_str(),
            "https://10.0.0.5:12445/api/v1/developer/doors"
        );
    }
}
