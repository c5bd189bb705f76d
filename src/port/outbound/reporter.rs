//! Reporter port for deployment progress.
//!
//! The controller describes what it is doing as a sequence of [`Event`]s.
//! How those events are presented (coloured terminal lines, JSON, log
//! records) is up to the implementation handed to the controller.

use crate::domain::Phase;

/// Progress events emitted by the lifecycle controller, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The resolved deploy order, emitted once at construction.
    DeployOrder {
        /// Node names, dependencies first.
        nodes: Vec<String>,
    },
    /// A phase began.
    PhaseStarted(Phase),
    /// A node operation is about to run.
    NodeStarted {
        /// The node being processed.
        node: String,
    },
    /// The node operation completed.
    NodeSucceeded {
        /// The node that was processed.
        node: String,
    },
    /// The node operation failed and aborted the phase.
    NodeFailed {
        /// The node that failed.
        node: String,
        /// Rendered error message.
        error: String,
    },
    /// Output listing begins. Not emitted when there are no outputs.
    OutputsStarted,
    /// A resolved output.
    Output {
        /// Output name.
        name: String,
        /// Resolved value.
        value: String,
    },
}

/// Receiver of progress events.
///
/// Implementations must be thread-safe (`Send + Sync`) and should return
/// quickly.
pub trait Reporter: Send + Sync {
    /// Handle an event.
    fn report(&self, event: Event);
}

/// A no-op reporter for testing or when output is disabled.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: Event) {}
}

/// A reporter that records events via tracing.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: Event) {
        use tracing::{error, info};
        match event {
            Event::DeployOrder { nodes } => {
                info!(order = %nodes.join(" -> "), "Deploy order");
            }
            Event::PhaseStarted(phase) => {
                info!(%phase, "Phase started");
            }
            Event::NodeStarted { node } => {
                info!(node = %node, "Node started");
            }
            Event::NodeSucceeded { node } => {
                info!(node = %node, "Node succeeded");
            }
            Event::NodeFailed { node, error } => {
                error!(node = %node, error = %error, "Node failed");
            }
            Event::OutputsStarted => {}
            Event::Output { name, value } => {
                info!(name = %name, value = %value, "Output");
            }
        }
    }
}
