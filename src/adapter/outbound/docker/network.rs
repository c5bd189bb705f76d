//! Deployment network.

use async_trait::async_trait;
use tracing::{debug, info};

use super::cli::{args, DockerCli};
use crate::error::RuntimeError;
use crate::port::NetworkManager;

/// Creates and removes user-defined bridge networks.
pub struct DockerNetwork {
    cli: DockerCli,
}

impl DockerNetwork {
    pub fn new(cli: DockerCli) -> Self {
        Self { cli }
    }
}

/// The daemon refused to create a network that is already there.
fn already_exists(err: &RuntimeError) -> bool {
    matches!(err, RuntimeError::CommandFailed { stderr, .. } if stderr.contains("already exists"))
}

#[async_trait]
impl NetworkManager for DockerNetwork {
    async fn create_network(&self, name: &str) -> Result<(), RuntimeError> {
        match self.cli.run(&args!["network", "create", name]).await {
            Ok(_) => info!(network = %name, "Network created"),
            Err(e) if already_exists(&e) => {
                debug!(network = %name, "Network already exists, reusing it");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn delete_network(&self, name: &str) -> Result<(), RuntimeError> {
        self.cli.run(&args!["network", "rm", name]).await?;
        info!(network = %name, "Network removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stderr: &str) -> RuntimeError {
        RuntimeError::CommandFailed {
            command: "docker network create hello".into(),
            status: Some(1),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn existing_network_is_recognised() {
        assert!(already_exists(&failed(
            "Error response from daemon: network with name hello already exists"
        )));
        assert!(!already_exists(&failed("Cannot connect to the Docker daemon")));
        assert!(!already_exists(&RuntimeError::Other("already exists".into())));
    }

    #[cfg(unix)]
    fn fake_docker(dir: &std::path::Path, stderr: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("docker");
        std::fs::write(&path, format!("#!/bin/sh\necho '{stderr}' >&2\nexit 1\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn create_reuses_existing_network() {
        let dir = tempfile::tempdir().unwrap();
        let docker = fake_docker(
            dir.path(),
            "Error response from daemon: network with name hello already exists",
        );

        let network = DockerNetwork::new(DockerCli::new(docker));
        assert!(network.create_network("hello").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn create_propagates_other_failures() {
        let dir = tempfile::tempdir().unwrap();
        let docker = fake_docker(dir.path(), "Cannot connect to the Docker daemon");

        let network = DockerNetwork::new(DockerCli::new(docker));
        let err = network.create_network("hello").await.unwrap_err();
        assert!(matches!(err, RuntimeError::CommandFailed { .. }));
    }
}
