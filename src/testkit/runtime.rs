//! In-memory runtime that records every manager call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::Runtime;
use crate::domain::{Container, Node, Software, Volume};
use crate::error::RuntimeError;
use crate::port::{
    AttributeResolver, ContainerManager, NetworkManager, SoftwareManager, VolumeManager,
};

#[derive(Default)]
struct State {
    calls: Vec<String>,
    failures: HashSet<(String, String)>,
    attributes: HashMap<(String, String), String>,
}

/// Records calls as `"<port>.<operation>(<name>)"`, e.g. `"container.start(web)"`.
///
/// Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingRuntime {
    state: Arc<Mutex<State>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` (e.g. `"container.create"`) fail for `name`.
    ///
    /// The failing call is still recorded.
    pub fn failing(self, operation: &str, name: &str) -> Self {
        self.state
            .lock()
            .failures
            .insert((operation.to_string(), name.to_string()));
        self
    }

    /// Serve `value` for `attribute` of `node`.
    pub fn with_attribute(self, node: &str, attribute: &str, value: &str) -> Self {
        self.state.lock().attributes.insert(
            (node.to_string(), attribute.to_string()),
            value.to_string(),
        );
        self
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Bundle this recorder as every runtime port.
    pub fn runtime(&self) -> Runtime {
        let shared = Arc::new(self.clone());
        Runtime {
            containers: shared.clone(),
            volumes: shared.clone(),
            software: shared.clone(),
            network: shared.clone(),
            attributes: shared,
        }
    }

    fn record(&self, operation: &str, name: &str) -> Result<(), RuntimeError> {
        let mut state = self.state.lock();
        state.calls.push(format!("{operation}({name})"));
        if state
            .failures
            .contains(&(operation.to_string(), name.to_string()))
        {
            return Err(RuntimeError::Other(format!("{operation} failed for {name}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerManager for RecordingRuntime {
    async fn create(&self, container: &Container) -> Result<(), RuntimeError> {
        self.record("container.create", &container.name)
    }

    async fn start(&self, container: &Container) -> Result<(), RuntimeError> {
        self.record("container.start", &container.name)
    }

    async fn stop(&self, container: &Container) -> Result<(), RuntimeError> {
        self.record("container.stop", &container.name)
    }

    async fn delete(&self, container: &Container) -> Result<(), RuntimeError> {
        self.record("container.delete", &container.name)
    }
}

#[async_trait]
impl VolumeManager for RecordingRuntime {
    async fn create(&self, volume: &Volume) -> Result<(), RuntimeError> {
        self.record("volume.create", &volume.name)
    }

    async fn delete(&self, volume: &Volume) -> Result<(), RuntimeError> {
        self.record("volume.delete", &volume.name)
    }
}

#[async_trait]
impl SoftwareManager for RecordingRuntime {
    async fn create(&self, software: &Software) -> Result<(), RuntimeError> {
        self.record("software.create", &software.name)
    }

    async fn configure(&self, software: &Software) -> Result<(), RuntimeError> {
        self.record("software.configure", &software.name)
    }

    async fn start(&self, software: &Software) -> Result<(), RuntimeError> {
        self.record("software.start", &software.name)
    }

    async fn stop(&self, software: &Software) -> Result<(), RuntimeError> {
        self.record("software.stop", &software.name)
    }

    async fn delete(&self, software: &Software) -> Result<(), RuntimeError> {
        self.record("software.delete", &software.name)
    }
}

#[async_trait]
impl NetworkManager for RecordingRuntime {
    async fn create_network(&self, name: &str) -> Result<(), RuntimeError> {
        self.record("network.create", name)
    }

    async fn delete_network(&self, name: &str) -> Result<(), RuntimeError> {
        self.record("network.delete", name)
    }
}

#[async_trait]
impl AttributeResolver for RecordingRuntime {
    async fn resolve(&self, node: &Node, attribute: &str) -> Result<String, RuntimeError> {
        self.state
            .lock()
            .attributes
            .get(&(node.name().to_string(), attribute.to_string()))
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownAttribute {
                node: node.name().to_string(),
                attribute: attribute.to_string(),
            })
    }
}
