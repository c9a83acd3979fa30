//! Live event streaming.
//!
//! `events watch` connects the stream session, registers a handler per
//! selected type, and prints envelopes until interrupted. The session's
//! reconnect loop does the heavy lifting; this handler only decides when
//! to stop.

use std::sync::Arc;

use serde_json::Value;

use accessly_core::api::Error as ApiError;
use accessly_core::api::stream::event_types;
use accessly_core::{AccessDirectory, ConnectionState, CoreError, StreamListener, convert};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;

struct WatchListener {
    quiet: bool,
}

impl StreamListener for WatchListener {
    fn on_connect(&self) {
        if !self.quiet {
            eprintln!("connected to event stream (ctrl-c to stop)");
        }
    }

    fn on_disconnect(&self) {
        if !self.quiet {
            eprintln!("event stream closed");
        }
    }

    fn on_error(&self, error: &ApiError) {
        eprintln!("stream error: {error}");
    }
}

/// Access events get a structured line; everything else prints raw.
fn print_event(event_type: &str, payload: &Value) {
    if event_type == event_types::ACCESS_EVENT {
        if let Ok(event) = convert::parse_access_event(payload) {
            println!(
                "[{}] {} door={} result={} credential={}",
                event.timestamp.format("%H:%M:%S"),
                event.event_type,
                event.door_id,
                event.result,
                event
                    .credential_id
                    .as_deref()
                    .unwrap_or("-")
            );
            return;
        }
    }
    println!("{event_type}: {payload}");
}

pub async fn handle(
    directory: &AccessDirectory,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let EventsCommand::Watch { types } = args.command;

    let stream = directory.event_stream()?;

    let selected = types.unwrap_or_else(|| {
        vec![
            event_types::ACCESS_EVENT.to_owned(),
            event_types::DOOR_STATUS.to_owned(),
            event_types::DEVICE_STATUS.to_owned(),
            event_types::SYSTEM_ALERT.to_owned(),
        ]
    });

    for event_type in selected {
        let label = event_type.clone();
        stream.register(event_type, move |payload| {
            print_event(&label, payload);
            Ok(())
        });
    }

    stream.set_listener(Arc::new(WatchListener {
        quiet: global.quiet,
    }));

    stream.connect().await.map_err(CoreError::from)?;

    let mut state_rx = stream.state_watch();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            stream.disconnect().await;
            Ok(())
        }
        () = async {
            loop {
                if state_rx.changed().await.is_err() {
                    break;
                }
                if *state_rx.borrow() == ConnectionState::Failed {
                    break;
                }
            }
        } => Err(CliError::ConnectionFailed {
            message: "event stream gave up after repeated reconnection failures".into(),
        }),
    }
}
