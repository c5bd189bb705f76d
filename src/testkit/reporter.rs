//! Reporter that keeps every event for assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::port::{Event, Reporter};

/// Thread-safe event collector. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Names of nodes that reported success, in order.
    pub fn succeeded(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::NodeSucceeded { node } => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names of nodes that reported failure, in order.
    pub fn failed(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::NodeFailed { node, .. } => Some(node.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        self.events.lock().push(event);
    }
}
