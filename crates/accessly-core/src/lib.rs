// accessly-core: domain records, vendor-JSON mapping, and the typed
// service facade over the accessly-api transport core.

pub mod convert;
pub mod directory;
pub mod error;
pub mod model;

pub use directory::{
    AccessDirectory, CreateAccessPolicyRequest, CreateUserRequest, CreateVisitorRequest,
    UpdateVisitorRequest,
};
pub use error::CoreError;

// Re-export the transport core so consumers need only one dependency.
pub use accessly_api as api;
pub use accessly_api::{ClientConfig, ConnectionState, EventStream, StreamListener, TlsMode};
