//! Volume manager.

use async_trait::async_trait;
use tracing::info;

use super::cli::{args, DockerCli};
use super::Naming;
use crate::domain::Volume;
use crate::error::RuntimeError;
use crate::port::VolumeManager;

/// Manages named Docker volumes.
pub struct DockerVolumes {
    cli: DockerCli,
    naming: Naming,
}

impl DockerVolumes {
    pub fn new(cli: DockerCli, naming: Naming) -> Self {
        Self { cli, naming }
    }

    fn create_args(&self, volume: &Volume) -> Vec<String> {
        let mut args = args!["volume", "create"];
        if let Some(driver) = &volume.driver {
            args.extend(args!["--driver", driver]);
        }
        args.push(self.naming.resource(&volume.name));
        args
    }
}

#[async_trait]
impl VolumeManager for DockerVolumes {
    async fn create(&self, volume: &Volume) -> Result<(), RuntimeError> {
        self.cli.run(&self.create_args(volume)).await?;
        info!(volume = %volume.name, "Volume created");
        Ok(())
    }

    async fn delete(&self, volume: &Volume) -> Result<(), RuntimeError> {
        let name = self.naming.resource(&volume.name);
        self.cli.run(&args!["volume", "rm", name]).await?;
        info!(volume = %volume.name, "Volume removed");
        Ok(())
    }
}
