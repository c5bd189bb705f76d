//! Docker runtime adapter.
//!
//! Implements every runtime port by shelling out to the `docker` CLI.
//! Resources are named after the template so several deployments can share
//! one daemon:
//!
//! - network: `<template>`
//! - containers and volumes: `<template>.<node>`
//! - images built from a Dockerfile: `tosker/<template>.<node>`

mod attribute;
mod cli;
mod container;
mod network;
mod software;
mod volume;

use std::sync::Arc;

pub use attribute::DockerAttributes;
pub use cli::DockerCli;
pub use container::DockerContainers;
pub use network::DockerNetwork;
pub use software::DockerSoftware;
pub use volume::DockerVolumes;

use crate::application::{Runtime, Workspace};

/// Maps node names onto Docker resource names for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    template: String,
}

impl Naming {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    #[must_use]
    pub fn network(&self) -> &str {
        &self.template
    }

    /// Container or volume name for `node`.
    #[must_use]
    pub fn resource(&self, node: &str) -> String {
        format!("{}.{}", self.template, node)
    }

    /// Tag for an image built for `node`.
    #[must_use]
    pub fn image(&self, node: &str) -> String {
        format!("tosker/{}.{}", self.template, node).to_lowercase()
    }
}

/// Wire every Docker adapter for one deployment.
pub fn runtime(binary: &str, template_name: &str, workspace: &Workspace) -> Runtime {
    let cli = DockerCli::new(binary);
    let naming = Naming::new(template_name);

    Runtime {
        containers: Arc::new(DockerContainers::new(cli.clone(), naming.clone())),
        volumes: Arc::new(DockerVolumes::new(cli.clone(), naming.clone())),
        software: Arc::new(DockerSoftware::new(
            cli.clone(),
            naming.clone(),
            workspace.dir(),
        )),
        network: Arc::new(DockerNetwork::new(cli.clone())),
        attributes: Arc::new(DockerAttributes::new(cli, naming)),
    }
}
