//! Phase-sequenced lifecycle controller.
//!
//! The [`Orchestrator`] walks a template's deploy order once per phase:
//! forwards for `create` and `start`, in reverse for `stop` and `delete`.
//! Each node is dispatched to the manager for its kind.
//!
//! Failure policy differs by phase:
//!
//! - `create` and `delete` stop at the first failing node, report it, and
//!   return a [`PhaseError`] naming it. Nothing already done is undone.
//!   A failed `delete` leaves the network and workspace in place.
//! - `start` and `stop` do not intercept manager errors; the
//!   [`RuntimeError`] is returned to the caller as is.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::workspace::Workspace;
use crate::domain::{Node, Output, OutputValue, Phase, Template};
use crate::error::{PhaseError, Result, RuntimeError};
use crate::port::{
    AttributeResolver, ContainerManager, Event, NetworkManager, Reporter, SoftwareManager,
    VolumeManager,
};

/// Runtime collaborators the controller dispatches to.
#[derive(Clone)]
pub struct Runtime {
    pub containers: Arc<dyn ContainerManager>,
    pub volumes: Arc<dyn VolumeManager>,
    pub software: Arc<dyn SoftwareManager>,
    pub network: Arc<dyn NetworkManager>,
    pub attributes: Arc<dyn AttributeResolver>,
}

/// Lifecycle controller for one template.
pub struct Orchestrator {
    template: Template,
    workspace: Workspace,
    runtime: Runtime,
    reporter: Arc<dyn Reporter>,
}

impl Orchestrator {
    /// Build a controller, creating the workspace directory if needed.
    ///
    /// Reports the deploy order once.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace directory cannot be created.
    pub fn new(
        template: Template,
        workspace: Workspace,
        runtime: Runtime,
        reporter: Arc<dyn Reporter>,
    ) -> io::Result<Self> {
        workspace.ensure()?;

        reporter.report(Event::DeployOrder {
            nodes: template
                .deploy_order()
                .iter()
                .map(|n| n.name().to_string())
                .collect(),
        });

        Ok(Self {
            template,
            workspace,
            runtime,
            reporter,
        })
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run a single phase.
    pub async fn run(&self, phase: Phase) -> Result<()> {
        match phase {
            Phase::Create => self.create().await?,
            Phase::Start => self.start().await?,
            Phase::Stop => self.stop().await?,
            Phase::Delete => self.delete().await?,
        }
        Ok(())
    }

    /// Create the network, then create every node in deploy order.
    ///
    /// Software nodes are configured right after they are created.
    #[instrument(skip(self), fields(template = %self.template.name()))]
    pub async fn create(&self) -> std::result::Result<(), PhaseError> {
        let network = self.template.name();
        self.runtime
            .network
            .create_network(network)
            .await
            .map_err(|source| PhaseError::Network {
                phase: Phase::Create,
                network: network.to_string(),
                source,
            })?;

        self.reporter.report(Event::PhaseStarted(Phase::Create));
        for node in self.visit_order(Phase::Create) {
            self.guarded(Phase::Create, node, self.create_node(node))
                .await?;
        }

        info!("Create phase complete");
        Ok(())
    }

    /// Start persistent containers and software in deploy order.
    ///
    /// One-shot containers and volumes are skipped.
    #[instrument(skip(self), fields(template = %self.template.name()))]
    pub async fn start(&self) -> std::result::Result<(), RuntimeError> {
        self.reporter.report(Event::PhaseStarted(Phase::Start));
        for node in self.visit_order(Phase::Start) {
            self.node_started(node);
            match node {
                Node::Container(container) if container.persistent => {
                    self.runtime.containers.start(container).await?;
                }
                Node::Container(_) | Node::Volume(_) => {
                    debug!(node = %node, kind = %node.kind(), "Nothing to start");
                }
                Node::Software(software) => self.runtime.software.start(software).await?,
            }
            self.node_succeeded(node);
        }

        info!("Start phase complete");
        Ok(())
    }

    /// Stop containers and software in reverse deploy order.
    #[instrument(skip(self), fields(template = %self.template.name()))]
    pub async fn stop(&self) -> std::result::Result<(), RuntimeError> {
        self.reporter.report(Event::PhaseStarted(Phase::Stop));
        for node in self.visit_order(Phase::Stop) {
            self.node_started(node);
            match node {
                Node::Container(container) => self.runtime.containers.stop(container).await?,
                Node::Software(software) => self.runtime.software.stop(software).await?,
                Node::Volume(_) => {
                    debug!(node = %node, "Nothing to stop");
                }
            }
            self.node_succeeded(node);
        }

        info!("Stop phase complete");
        Ok(())
    }

    /// Delete containers and software in reverse deploy order, then the
    /// network and workspace.
    ///
    /// Volumes are not deleted by this phase.
    #[instrument(skip(self), fields(template = %self.template.name()))]
    pub async fn delete(&self) -> std::result::Result<(), PhaseError> {
        self.reporter.report(Event::PhaseStarted(Phase::Delete));
        for node in self.visit_order(Phase::Delete) {
            self.guarded(Phase::Delete, node, self.delete_node(node))
                .await?;
        }

        let network = self.template.name();
        self.runtime
            .network
            .delete_network(network)
            .await
            .map_err(|source| PhaseError::Network {
                phase: Phase::Delete,
                network: network.to_string(),
                source,
            })?;

        self.workspace
            .remove()
            .map_err(|source| PhaseError::Workspace {
                path: self.workspace.dir().display().to_string(),
                source,
            })?;

        info!("Delete phase complete");
        Ok(())
    }

    /// Resolve and report every declared output. Reports nothing when the
    /// template declares none.
    pub async fn print_outputs(&self) -> std::result::Result<(), RuntimeError> {
        if self.template.outputs().is_empty() {
            return Ok(());
        }

        self.reporter.report(Event::OutputsStarted);
        for output in self.template.outputs() {
            let value = self.resolve_output(output).await?;
            self.reporter.report(Event::Output {
                name: output.name.clone(),
                value,
            });
        }
        Ok(())
    }

    async fn resolve_output(&self, output: &Output) -> std::result::Result<String, RuntimeError> {
        match &output.value {
            OutputValue::Literal(value) => Ok(value.clone()),
            OutputValue::Attribute { node, attribute } => {
                let target =
                    self.template
                        .node(node)
                        .ok_or_else(|| RuntimeError::UnknownNode {
                            node: node.clone(),
                        })?;
                debug!(output = %output.name, node = %node, attribute = %attribute, "Resolving output");
                self.runtime.attributes.resolve(target, attribute).await
            }
        }
    }

    /// Deploy order as `phase` walks it.
    fn visit_order(&self, phase: Phase) -> Vec<&Node> {
        let order = self.template.deploy_order().iter();
        if phase.is_reverse() {
            order.rev().collect()
        } else {
            order.collect()
        }
    }

    async fn create_node(&self, node: &Node) -> std::result::Result<(), RuntimeError> {
        match node {
            Node::Container(container) => self.runtime.containers.create(container).await,
            Node::Volume(volume) => self.runtime.volumes.create(volume).await,
            Node::Software(software) => {
                self.runtime.software.create(software).await?;
                self.runtime.software.configure(software).await
            }
        }
    }

    async fn delete_node(&self, node: &Node) -> std::result::Result<(), RuntimeError> {
        match node {
            Node::Container(container) => self.runtime.containers.delete(container).await,
            Node::Software(software) => self.runtime.software.delete(software).await,
            Node::Volume(_) => {
                debug!(node = %node, "Volumes are left in place on delete");
                Ok(())
            }
        }
    }

    /// Run one node operation of an aborting phase.
    async fn guarded<F>(
        &self,
        phase: Phase,
        node: &Node,
        operation: F,
    ) -> std::result::Result<(), PhaseError>
    where
        F: Future<Output = std::result::Result<(), RuntimeError>>,
    {
        self.node_started(node);
        match operation.await {
            Ok(()) => {
                self.node_succeeded(node);
                Ok(())
            }
            Err(source) => {
                self.reporter.report(Event::NodeFailed {
                    node: node.name().to_string(),
                    error: source.to_string(),
                });
                error!(%phase, node = %node, error = ?source, "Node operation failed, aborting phase");
                Err(PhaseError::Node {
                    phase,
                    node: node.name().to_string(),
                    source,
                })
            }
        }
    }

    fn node_started(&self, node: &Node) {
        debug!(node = %node, kind = %node.kind(), "Processing node");
        self.reporter.report(Event::NodeStarted {
            node: node.name().to_string(),
        });
    }

    fn node_succeeded(&self, node: &Node) {
        self.reporter.report(Event::NodeSucceeded {
            node: node.name().to_string(),
        });
    }
}
