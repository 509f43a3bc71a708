//! Hand-off point between the engine and notification delivery.
//!
//! Services never deliver anything themselves. They emit [`EngineEvent`]s
//! into a dispatcher supplied by the host application.

use parking_lot::Mutex;
use tracing::info;

use crate::types::EngineEvent;

pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, event: &EngineEvent);
}

/// Drops every event
#[derive(Debug, Default)]
pub struct NoopDispatcher;

impl NotificationDispatcher for NoopDispatcher {
    fn dispatch(&self, _event: &EngineEvent) {}
}

/// Writes every event to the tracing subscriber
#[derive(Debug, Default)]
pub struct LoggingDispatcher;

impl NotificationDispatcher for LoggingDispatcher {
    fn dispatch(&self, event: &EngineEvent) {
        info!(
            signal = event.event_type_name(),
            event_id = event.event_id(),
            invitation_id = event.invitation_id(),
            "engine event"
        );
    }
}

/// Keeps events in memory, for tests and for hosts that drain in batches
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: &EngineEvent) {
        self.events.lock().push(event.clone());
    }
}
