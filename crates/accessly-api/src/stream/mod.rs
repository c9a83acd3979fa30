//! Event-stream session with bounded auto-reconnect.
//!
//! Opens the controller's WebSocket channel with the bearer token, decodes
//! `{"type": ..., "data": ...}` envelopes, and routes them through an
//! [`EventDispatcher`]. On channel loss the session reconnects with a flat
//! delay (intentionally not exponential -- request retries back off, stream
//! reconnects pace evenly) until a configured attempt limit, then parks in
//! [`ConnectionState::Failed`].
//!
//! # Example
//!
//! ```rust,ignore
//! use accessly_api::stream::{EventStream, StreamConfig, event_types};
//!
//! let stream = EventStream::new(StreamConfig::try_from(&config)?);
//! stream.register(event_types::ACCESS_EVENT, |payload| {
//!     println!("access event: {payload}");
//!     Ok(())
//! });
//! stream.connect().await?;
//! // ... the receive loop runs in the background ...
//! stream.disconnect().await;
//! ```

mod dispatch;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use std::time::Duration;

use futures_util::StreamExt;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::TokenCredentials;
use crate::client::ClientConfig;
use crate::error::Error;
use crate::transport::TlsMode;

pub use dispatch::{EventDispatcher, EventEnvelope, EventHandler, event_types};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

// ── ConnectionState ──────────────────────────────────────────────────

/// Lifecycle state of the stream session.
///
/// Owned exclusively by the session; observable through
/// [`EventStream::state`] / [`EventStream::state_watch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session activity. Initial state, and where `disconnect()` lands.
    #[default]
    Idle,
    /// A channel open is in flight.
    Connecting,
    /// The receive loop is consuming frames.
    Connected,
    /// The channel was lost; a reconnect is pending or in flight.
    Reconnecting,
    /// The reconnect budget is exhausted. Terminal until a fresh
    /// `connect()` call.
    Failed,
}

// ── StreamConfig ─────────────────────────────────────────────────────

/// Configuration for one stream session.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Full stream address (`wss://host:port/api/v1/events/ws`).
    pub url: Url,
    /// Bearer token attached to the connection handshake.
    pub token: SecretString,
    /// TLS verification mode for the handshake.
    pub tls: TlsMode,
    /// Deadline for a single channel open.
    pub connect_timeout: Duration,
    /// Flat delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// Consecutive failed reconnections before giving up.
    pub max_reconnect_attempts: u32,
}

impl TryFrom<&ClientConfig> for StreamConfig {
    type Error = Error;

    fn try_from(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            url: config.stream_url()?,
            token: config.token.clone(),
            tls: config.tls.clone(),
            connect_timeout: config.timeout,
            reconnect_delay: config.reconnect_delay,
            max_reconnect_attempts: config.max_reconnect_attempts,
        })
    }
}

// ── StreamListener ───────────────────────────────────────────────────

/// Optional lifecycle hooks for a stream session.
///
/// Every slot defaults to a no-op, so implementors override only what they
/// care about. Errors arrive here -- never at the task that called
/// `connect()`, which has long since returned.
pub trait StreamListener: Send + Sync {
    /// The channel was (re)opened.
    fn on_connect(&self) {}
    /// The session was explicitly disconnected.
    fn on_disconnect(&self) {}
    /// A stream error occurred: failed reconnect, read failure, or a
    /// handler that returned an error.
    fn on_error(&self, _error: &Error) {}
}

struct NoopListener;

impl StreamListener for NoopListener {}

// ── EventStream ──────────────────────────────────────────────────────

/// A long-lived event-stream session.
///
/// `connect()` performs the initial channel open in the foreground and
/// spawns the receive loop as a background task; exactly one loop runs per
/// session. Reconnection is strictly serialized inside that task and
/// counted by an explicit bounded loop.
pub struct EventStream {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<ConnectionState>,
    cancel: StdMutex<CancellationToken>,
    task: StdMutex<Option<JoinHandle<()>>>,
}

struct Shared {
    config: StreamConfig,
    credentials: TokenCredentials,
    dispatcher: RwLock<EventDispatcher>,
    listener: RwLock<Arc<dyn StreamListener>>,
    state_tx: watch::Sender<ConnectionState>,
    running: AtomicBool,
}

impl Shared {
    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }

    fn listener(&self) -> Arc<dyn StreamListener> {
        Arc::clone(&self.listener.read().expect("listener lock poisoned"))
    }
}

impl EventStream {
    /// Create a session. Does not connect.
    pub fn new(config: StreamConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let credentials = TokenCredentials::new(config.token.clone(), None);

        Self {
            shared: Arc::new(Shared {
                config,
                credentials,
                dispatcher: RwLock::new(EventDispatcher::new()),
                listener: RwLock::new(Arc::new(NoopListener)),
                state_tx,
                running: AtomicBool::new(false),
            }),
            state_rx,
            cancel: StdMutex::new(CancellationToken::new()),
            task: StdMutex::new(None),
        }
    }

    /// Install lifecycle hooks. May be called before or after `connect()`.
    pub fn set_listener(&self, listener: Arc<dyn StreamListener>) {
        *self.shared.listener.write().expect("listener lock poisoned") = listener;
    }

    /// Register `handler` for `event_type`, replacing any prior handler.
    ///
    /// Registration is valid before or during an active session.
    pub fn register<F>(&self, event_type: impl Into<String>, handler: F)
    where
        F: Fn(&Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.shared
            .dispatcher
            .write()
            .expect("dispatcher lock poisoned")
            .register(event_type, handler);
    }

    /// Current session state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// A watch receiver for observing state transitions.
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Whether the receive loop currently holds an open channel.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Open the channel and start the background receive loop.
    ///
    /// Returns once the channel is open; frames are consumed by the spawned
    /// task from then on. All later errors -- read failures, reconnect
    /// exhaustion, handler failures -- go to the registered listener, not to
    /// this caller. A second `connect()` on a running session is a warning
    /// no-op.
    pub async fn connect(&self) -> Result<(), Error> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("event stream is already running");
            return Ok(());
        }

        let cancel = CancellationToken::new();
        *self.cancel.lock().expect("cancel lock poisoned") = cancel.clone();

        self.shared.set_state(ConnectionState::Connecting);

        match open_channel(&self.shared).await {
            Ok(socket) => {
                tracing::info!(url = %self.shared.config.url, "event stream connected");
                self.shared.set_state(ConnectionState::Connected);
                self.shared.listener().on_connect();

                let shared = Arc::clone(&self.shared);
                let handle = tokio::spawn(run_session(socket, shared, cancel));
                *self.task.lock().expect("task lock poisoned") = Some(handle);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "event stream connection failed");
                self.shared.running.store(false, Ordering::SeqCst);
                self.shared.set_state(ConnectionState::Idle);
                self.shared.listener().on_error(&e);
                Err(e)
            }
        }
    }

    /// Stop the session from any state.
    ///
    /// Cancels an in-progress reconnect, waits for the receive task to
    /// finish, and releases the channel. Always fires `on_disconnect`.
    pub async fn disconnect(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        self.cancel.lock().expect("cancel lock poisoned").cancel();

        let task = self.task.lock().expect("task lock poisoned").take();
        if let Some(task) = task {
            let _ = task.await;
        }

        self.shared.set_state(ConnectionState::Idle);
        tracing::info!("event stream disconnected");
        self.shared.listener().on_disconnect();
    }
}

// ── Channel open ─────────────────────────────────────────────────────

/// Open one channel: bearer-token handshake, bounded by the configured
/// connect timeout.
async fn open_channel(shared: &Shared) -> Result<WsStream, Error> {
    let auth = shared.credentials.bearer_header()?;

    let uri: tungstenite::http::Uri = shared.config.url.as_str().parse().map_err(
        |e: tungstenite::http::uri::InvalidUri| Error::Connection {
            message: format!("invalid stream address: {e}"),
            attempts: 1,
        },
    )?;

    let request = ClientRequestBuilder::new(uri).with_header("Authorization", auth);
    let connector = shared.config.tls.stream_connector()?;

    let connect =
        tokio_tungstenite::connect_async_tls_with_config(request, None, false, connector);

    let (socket, _response) = tokio::time::timeout(shared.config.connect_timeout, connect)
        .await
        .map_err(|_| Error::Timeout {
            timeout_secs: shared.config.connect_timeout.as_secs(),
        })?
        .map_err(|e| Error::Connection {
            message: format!("event stream connection failed: {e}"),
            attempts: 1,
        })?;

    Ok(socket)
}

// ── Background session loop ──────────────────────────────────────────

/// Outer session loop: consume frames until the channel drops, then run the
/// bounded reconnect sequence. Exactly one reconnect is in flight at a time,
/// driven by this loop -- deliberately iterative, never recursive.
async fn run_session(mut socket: WsStream, shared: Arc<Shared>, cancel: CancellationToken) {
    'session: loop {
        read_frames(socket, &shared, &cancel).await;

        if cancel.is_cancelled() {
            break 'session;
        }

        // Channel lost while still desired-running.
        shared.set_state(ConnectionState::Reconnecting);
        let max = shared.config.max_reconnect_attempts;
        let mut attempt: u32 = 0;

        socket = loop {
            if attempt >= max {
                tracing::error!(max_attempts = max, "reconnection limit reached, giving up");
                shared.running.store(false, Ordering::SeqCst);
                shared.set_state(ConnectionState::Failed);
                break 'session;
            }
            attempt += 1;
            tracing::info!(attempt, max_attempts = max, "attempting reconnection");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'session,
                () = tokio::time::sleep(shared.config.reconnect_delay) => {}
            }

            shared.set_state(ConnectionState::Connecting);
            match open_channel(&shared).await {
                Ok(ws) => break ws,
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "reconnection attempt failed");
                    shared.listener().on_error(&e);
                    shared.set_state(ConnectionState::Reconnecting);
                }
            }
        };

        tracing::info!("event stream reconnected");
        shared.set_state(ConnectionState::Connected);
        shared.listener().on_connect();
    }

    tracing::debug!("event stream session loop exiting");
}

/// Consume frames from one channel until it closes, errors, or the session
/// is cancelled. Malformed frames are logged and skipped -- the loop never
/// dies on bad input.
async fn read_frames(socket: WsStream, shared: &Shared, cancel: &CancellationToken) {
    let (_write, mut read) = socket.split();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        handle_frame(text.as_str(), shared);
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite replies with pongs automatically
                        tracing::trace!("event stream ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        match frame {
                            Some(cf) => tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                "event stream closed by server"
                            ),
                            None => tracing::info!("event stream closed by server"),
                        }
                        return;
                    }
                    Some(Err(e)) => {
                        let err = Error::Connection {
                            message: format!("event stream read failed: {e}"),
                            attempts: 1,
                        };
                        tracing::warn!(error = %err, "event stream error");
                        shared.listener().on_error(&err);
                        return;
                    }
                    None => {
                        tracing::info!("event stream ended");
                        return;
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

// ── Frame handling ───────────────────────────────────────────────────

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Wire shape of one inbound frame.
#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(rename = "type")]
    event_type: Option<String>,
    #[serde(default = "empty_payload")]
    data: Value,
}

/// Decode one text frame and route it through the dispatcher.
///
/// Unrecognized types are dropped at debug severity; a handler returning an
/// error is isolated and reported to the listener without disturbing the
/// receive loop.
fn handle_frame(text: &str, shared: &Shared) {
    let wire: WireEnvelope = match serde_json::from_str(text) {
        Ok(wire) => wire,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse event frame");
            return;
        }
    };

    let Some(event_type) = wire.event_type else {
        tracing::debug!("event frame has no type, dropping");
        return;
    };

    let envelope = EventEnvelope {
        event_type,
        data: wire.data,
    };

    let outcome = shared
        .dispatcher
        .read()
        .expect("dispatcher lock poisoned")
        .dispatch(&envelope);

    match outcome {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            tracing::error!(
                error = %e,
                event_type = %envelope.event_type,
                "event handler failed"
            );
            shared.listener().on_error(&e);
        }
        None => {
            tracing::debug!(event_type = %envelope.event_type, "unhandled event type");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_envelope_decodes_type_and_data() {
        let wire: WireEnvelope =
            serde_json::from_str(r#"{"type":"access_event","data":{"id":"e1"}}"#)
                .expect("valid envelope");
        assert_eq!(wire.event_type.as_deref(), Some("access_event"));
        assert_eq!(wire.data, json!({"id": "e1"}));
    }

    #[test]
    fn wire_envelope_defaults_missing_data_to_empty_object() {
        let wire: WireEnvelope =
            serde_json::from_str(r#"{"type":"system_alert"}"#).expect("valid envelope");
        assert_eq!(wire.data, json!({}));
    }

    #[test]
    fn wire_envelope_tolerates_missing_type() {
        let wire: WireEnvelope =
            serde_json::from_str(r#"{"data":{"id":"e1"}}"#).expect("valid envelope");
        assert!(wire.event_type.is_none());
    }

    #[test]
    fn stream_config_derives_from_client_config() {
        let config = ClientConfig::new(
            "192.168.1.10",
            secrecy::SecretString::from("tok".to_string()),
        );
        let stream = StreamConfig::try_from(&config).expect("valid config");

        assert_eq!(
            stream.url.as_str(),
            "wss://192.168.1.10:12445/api/v1/events/ws"
        );
        assert_eq!(stream.reconnect_delay, Duration::from_secs(5));
        assert_eq!(stream.max_reconnect_attempts, 10);
    }

    #[test]
    fn initial_state_is_idle() {
        let config = ClientConfig::new("h", secrecy::SecretString::from("tok".to_string()));
        let stream = EventStream::new(StreamConfig::try_from(&config).expect("valid config"));
        assert_eq!(stream.state(), ConnectionState::Idle);
        assert!(!stream.is_connected());
    }
}
