//! Runtime ports: one manager per node kind, plus the deployment network
//! and attribute lookup.
//!
//! Every call acts on exactly one node and either completes or returns a
//! [`RuntimeError`]. Callers await each call before issuing the next.

use async_trait::async_trait;

use crate::domain::{Container, Node, Software, Volume};
use crate::error::RuntimeError;

/// Manages container nodes.
#[async_trait]
pub trait ContainerManager: Send + Sync {
    /// Create the container. One-shot containers run to completion here.
    async fn create(&self, container: &Container) -> Result<(), RuntimeError>;

    async fn start(&self, container: &Container) -> Result<(), RuntimeError>;

    async fn stop(&self, container: &Container) -> Result<(), RuntimeError>;

    async fn delete(&self, container: &Container) -> Result<(), RuntimeError>;
}

/// Manages volume nodes.
#[async_trait]
pub trait VolumeManager: Send + Sync {
    async fn create(&self, volume: &Volume) -> Result<(), RuntimeError>;

    async fn delete(&self, volume: &Volume) -> Result<(), RuntimeError>;
}

/// Manages software nodes on their host containers.
#[async_trait]
pub trait SoftwareManager: Send + Sync {
    async fn create(&self, software: &Software) -> Result<(), RuntimeError>;

    async fn configure(&self, software: &Software) -> Result<(), RuntimeError>;

    async fn start(&self, software: &Software) -> Result<(), RuntimeError>;

    async fn stop(&self, software: &Software) -> Result<(), RuntimeError>;

    async fn delete(&self, software: &Software) -> Result<(), RuntimeError>;
}

/// Manages the logical network shared by a deployment's containers.
#[async_trait]
pub trait NetworkManager: Send + Sync {
    async fn create_network(&self, name: &str) -> Result<(), RuntimeError>;

    async fn delete_network(&self, name: &str) -> Result<(), RuntimeError>;
}

/// Reads attribute values of deployed nodes.
#[async_trait]
pub trait AttributeResolver: Send + Sync {
    async fn resolve(&self, node: &Node, attribute: &str) -> Result<String, RuntimeError>;
}
