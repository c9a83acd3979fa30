// accessly-api: async client core for the UniFi Access developer API
// (authenticated request pipeline + event-stream session)

pub mod auth;
pub mod classify;
pub mod client;
pub mod error;
pub mod stream;
pub mod transport;

pub use auth::TokenCredentials;
pub use client::{ApiClient, ClientConfig, DEFAULT_PORT};
pub use error::{Error, JsonMap};
pub use stream::{ConnectionState, EventStream, StreamConfig, StreamListener};
pub use transport::{TlsMode, TransportConfig};
