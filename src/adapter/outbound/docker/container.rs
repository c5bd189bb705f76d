//! Container manager.

use async_trait::async_trait;
use tracing::{debug, info};

use super::cli::{args, DockerCli};
use super::Naming;
use crate::domain::Container;
use crate::error::RuntimeError;
use crate::port::ContainerManager;

/// Manages containers through `docker create`/`docker run`.
///
/// Persistent containers are only created here and started in the start
/// phase. One-shot containers run in the foreground during create and must
/// exit successfully.
pub struct DockerContainers {
    cli: DockerCli,
    naming: Naming,
}

impl DockerContainers {
    pub fn new(cli: DockerCli, naming: Naming) -> Self {
        Self { cli, naming }
    }

    /// Image the container runs: the built tag when a Dockerfile is set.
    fn image(&self, container: &Container) -> String {
        match (&container.dockerfile, &container.image) {
            (Some(_), _) | (None, None) => self.naming.image(&container.name),
            (None, Some(image)) => image.clone(),
        }
    }

    fn build_args(&self, container: &Container) -> Option<Vec<String>> {
        let dockerfile = container.dockerfile.as_ref()?;
        let context = dockerfile
            .parent()
            .map_or_else(|| ".".to_string(), |dir| dir.display().to_string());
        Some(args![
            "build",
            "--tag",
            self.image(container),
            "--file",
            dockerfile.display().to_string(),
            context,
        ])
    }

    fn create_args(&self, container: &Container) -> Vec<String> {
        let mut args = args![
            if container.persistent { "create" } else { "run" },
            "--name",
            self.naming.resource(&container.name),
            "--network",
            self.naming.network(),
            "--network-alias",
            &container.name,
        ];
        for (key, value) in &container.env {
            args.extend(args!["--env", format!("{key}={value}")]);
        }
        for (container_port, host_port) in &container.ports {
            args.extend(args!["--publish", format!("{host_port}:{container_port}")]);
        }
        for mount in &container.volumes {
            args.extend(args![
                "--volume",
                format!("{}:{}", self.naming.resource(&mount.volume), mount.location),
            ]);
        }
        args.push(self.image(container));
        args.extend(container.command.iter().cloned());
        args
    }
}

#[async_trait]
impl ContainerManager for DockerContainers {
    async fn create(&self, container: &Container) -> Result<(), RuntimeError> {
        if let Some(build) = self.build_args(container) {
            self.cli.run(&build).await?;
            debug!(container = %container.name, image = %self.image(container), "Image built");
        }

        self.cli.run(&self.create_args(container)).await?;
        info!(
            container = %container.name,
            persistent = container.persistent,
            "Container created"
        );
        Ok(())
    }

    async fn start(&self, container: &Container) -> Result<(), RuntimeError> {
        let name = self.naming.resource(&container.name);
        self.cli.run(&args!["start", name]).await?;
        info!(container = %container.name, "Container started");
        Ok(())
    }

    async fn stop(&self, container: &Container) -> Result<(), RuntimeError> {
        let name = self.naming.resource(&container.name);
        self.cli.run(&args!["stop", name]).await?;
        info!(container = %container.name, "Container stopped");
        Ok(())
    }

    async fn delete(&self, container: &Container) -> Result<(), RuntimeError> {
        let name = self.naming.resource(&container.name);
        self.cli.run(&args!["rm", "--force", name]).await?;
        if container.dockerfile.is_some() {
            self.cli
                .run(&args!["image", "rm", self.image(container)])
                .await?;
        }
        info!(container = %container.name, "Container removed");
        Ok(())
    }
}
