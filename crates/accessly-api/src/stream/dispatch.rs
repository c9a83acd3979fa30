// Event dispatch.
//
// Pure routing table from message-type string to registered handler.
// Invoked by the stream session's receive loop; never initiates I/O.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Error;

/// Well-known message types emitted by the Access event channel.
///
/// The dispatcher itself is type-agnostic; these constants exist so
/// consumers don't scatter string literals.
pub mod event_types {
    /// A door access attempt (granted or denied).
    pub const ACCESS_EVENT: &str = "access_event";
    /// A door lock/unlock state change.
    pub const DOOR_STATUS: &str = "door_status";
    /// A device online/offline state change.
    pub const DEVICE_STATUS: &str = "device_status";
    /// A system alert or notification.
    pub const SYSTEM_ALERT: &str = "system_alert";
}

/// One decoded inbound frame: message type plus payload.
///
/// Produced by the receive loop, consumed immediately by
/// [`EventDispatcher::dispatch`], then discarded -- no buffering or replay.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    /// The `type` field of the frame.
    pub event_type: String,
    /// The `data` field of the frame.
    pub data: Value,
}

/// Handler invoked with the payload of a matching envelope.
///
/// Handlers report failure through their `Result`; a failing handler is
/// isolated by the session and routed to the error listener.
pub type EventHandler = Arc<dyn Fn(&Value) -> Result<(), Error> + Send + Sync>;

/// Routing table: message type -> at most one handler.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, EventHandler>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event_type`, replacing any prior handler
    /// for that type. Last registration wins.
    pub fn register<F>(&mut self, event_type: impl Into<String>, handler: F)
    where
        F: Fn(&Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.handlers.insert(event_type.into(), Arc::new(handler));
    }

    /// Whether a handler is registered for `event_type`.
    pub fn has_handler(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Route an envelope to its handler.
    ///
    /// Returns `None` when no handler is registered (the envelope is
    /// dropped), otherwise the handler's own result.
    pub fn dispatch(&self, envelope: &EventEnvelope) -> Option<Result<(), Error>> {
        let handler = self.handlers.get(&envelope.event_type)?;
        Some(handler(&envelope.data))
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registered", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    fn envelope(event_type: &str, data: Value) -> EventEnvelope {
        EventEnvelope {
            event_type: event_type.into(),
            data,
        }
    }

    #[test]
    fn dispatch_invokes_matching_handler_with_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let sink = Arc::clone(&seen);
        dispatcher.register(event_types::ACCESS_EVENT, move |payload| {
            sink.lock().expect("lock").push(payload.clone());
            Ok(())
        });

        let result = dispatcher.dispatch(&envelope("access_event", json!({"id": "e1"})));
        assert!(matches!(result, Some(Ok(()))));

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.as_slice(), &[json!({"id": "e1"})]);
    }

    #[test]
    fn unregistered_type_is_dropped() {
        let dispatcher = EventDispatcher::new();
        let result = dispatcher.dispatch(&envelope("door_status", json!({})));
        assert!(result.is_none());
    }

    #[test]
    fn re_registration_replaces_the_prior_handler() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = EventDispatcher::new();

        let counter = Arc::clone(&first);
        dispatcher.register("access_event", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let counter = Arc::clone(&second);
        dispatcher.register("access_event", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        dispatcher.dispatch(&envelope("access_event", json!({})));
        dispatcher.dispatch(&envelope("access_event", json!({})));

        assert_eq!(first.load(Ordering::SeqCst), 0, "replaced handler must never run");
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn handler_failure_is_returned_not_propagated() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register("system_alert", |_| {
            Err(Error::Api {
                message: "handler exploded".into(),
                status: 0,
                body: crate::error::JsonMap::new(),
            })
        });

        let result = dispatcher.dispatch(&envelope("system_alert", json!({})));
        assert!(matches!(result, Some(Err(_))));
    }

    #[test]
    fn handlers_are_independent_per_type() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = EventDispatcher::new();

        let counter = Arc::clone(&hits);
        dispatcher.register("door_status", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        dispatcher.dispatch(&envelope("access_event", json!({})));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        dispatcher.dispatch(&envelope("door_status", json!({})));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
