//! Software manager.
//!
//! Lifecycle scripts are staged under `<workspace>/<software>/`, copied into
//! the host container at `/tmp/tosker/<software>/`, and run there with
//! `docker exec`. Operations without a script are no-ops. Delete removes
//! both copies.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::cli::{args, DockerCli};
use super::Naming;
use crate::domain::{Operation, Software};
use crate::error::RuntimeError;
use crate::port::SoftwareManager;

/// Directory inside host containers that receives staged scripts.
const REMOTE_ROOT: &str = "/tmp/tosker";

/// Manages software components hosted on containers.
pub struct DockerSoftware {
    cli: DockerCli,
    naming: Naming,
    workspace: PathBuf,
}

impl DockerSoftware {
    pub fn new(cli: DockerCli, naming: Naming, workspace: impl Into<PathBuf>) -> Self {
        Self {
            cli,
            naming,
            workspace: workspace.into(),
        }
    }

    fn staging_dir(&self, software: &Software) -> PathBuf {
        self.workspace.join(&software.name)
    }

    fn remote_dir(software: &Software) -> String {
        format!("{REMOTE_ROOT}/{}", software.name)
    }

    fn remote_script(software: &Software, script: &Path) -> String {
        let file = script
            .file_name()
            .map_or_else(|| script.display().to_string(), |f| f.to_string_lossy().into_owned());
        format!("{}/{file}", Self::remote_dir(software))
    }

    /// `docker exec` arguments running the script for `operation`, if any.
    fn exec_args(&self, software: &Software, operation: Operation) -> Option<Vec<String>> {
        let script = software.script(operation)?;
        let mut args = args!["exec"];
        if operation == Operation::Start {
            args.push("--detach".into());
        }
        args.extend(args![
            self.naming.resource(&software.host),
            "sh",
            Self::remote_script(software, script),
        ]);
        Some(args)
    }

    fn cleanup_args(&self, software: &Software) -> Vec<String> {
        args![
            "exec",
            self.naming.resource(&software.host),
            "rm",
            "-rf",
            Self::remote_dir(software),
        ]
    }

    /// Copy every declared script into the staging directory.
    async fn stage(&self, software: &Software) -> Result<PathBuf, RuntimeError> {
        let dir = self.staging_dir(software);
        tokio::fs::create_dir_all(&dir).await?;
        for script in software.interfaces.values() {
            let Some(file) = script.file_name() else {
                return Err(RuntimeError::Other(format!(
                    "script path {} has no file name",
                    script.display()
                )));
            };
            tokio::fs::copy(script, dir.join(file)).await.map_err(|e| {
                RuntimeError::Io(io::Error::new(
                    e.kind(),
                    format!("failed to stage {}: {e}", script.display()),
                ))
            })?;
        }
        Ok(dir)
    }

    /// Start the host container; a running host is left as is.
    async fn ensure_host_running(&self, software: &Software) -> Result<(), RuntimeError> {
        let host = self.naming.resource(&software.host);
        self.cli.run(&args!["start", host]).await?;
        Ok(())
    }

    async fn run_operation(
        &self,
        software: &Software,
        operation: Operation,
    ) -> Result<(), RuntimeError> {
        let Some(args) = self.exec_args(software, operation) else {
            debug!(software = %software.name, %operation, "No script for operation");
            return Ok(());
        };
        self.cli.run(&args).await?;
        info!(software = %software.name, %operation, "Operation completed");
        Ok(())
    }
}

#[async_trait]
impl SoftwareManager for DockerSoftware {
    async fn create(&self, software: &Software) -> Result<(), RuntimeError> {
        let staged = self.stage(software).await?;
        self.ensure_host_running(software).await?;

        let host = self.naming.resource(&software.host);
        self.cli
            .run(&args![
                "exec",
                host.as_str(),
                "mkdir",
                "-p",
                Self::remote_dir(software),
            ])
            .await?;
        self.cli
            .run(&args![
                "cp",
                format!("{}/.", staged.display()),
                format!("{host}:{}", Self::remote_dir(software)),
            ])
            .await?;

        self.run_operation(software, Operation::Create).await
    }

    async fn configure(&self, software: &Software) -> Result<(), RuntimeError> {
        self.run_operation(software, Operation::Configure).await
    }

    async fn start(&self, software: &Software) -> Result<(), RuntimeError> {
        self.run_operation(software, Operation::Start).await
    }

    async fn stop(&self, software: &Software) -> Result<(), RuntimeError> {
        self.run_operation(software, Operation::Stop).await
    }

    async fn delete(&self, software: &Software) -> Result<(), RuntimeError> {
        match self.ensure_host_running(software).await {
            Ok(()) => {
                self.run_operation(software, Operation::Delete).await?;
                self.cli.run(&self.cleanup_args(software)).await?;
            }
            // Without a delete script a missing host only means there is
            // nothing left to clean up remotely.
            Err(e) if software.script(Operation::Delete).is_none() => {
                debug!(software = %software.name, error = %e, "Host unavailable, skipping remote cleanup");
            }
            Err(e) => return Err(e),
        }

        match tokio::fs::remove_dir_all(self.staging_dir(software)).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(software = %software.name, "Software removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Software {
        let mut app = Software::new("app", "server");
        app.interfaces
            .insert(Operation::Create, PathBuf::from("/srv/hello/scripts/install.sh"));
        app.interfaces
            .insert(Operation::Start, PathBuf::from("/srv/hello/scripts/run.sh"));
        app
    }

    fn manager(workspace: &Path) -> DockerSoftware {
        DockerSoftware::new(DockerCli::new("docker"), Naming::new("hello"), workspace)
    }

    #[test]
    fn exec_args_run_script_on_host() {
        let manager = manager(Path::new("/tmp/ws"));

        assert_eq!(
            manager.exec_args(&app(), Operation::Create).unwrap(),
            ["exec", "hello.server", "sh", "/tmp/tosker/app/install.sh"]
        );
    }

    #[test]
    fn start_script_runs_detached() {
        let manager = manager(Path::new("/tmp/ws"));

        assert_eq!(
            manager.exec_args(&app(), Operation::Start).unwrap(),
            ["exec", "--detach", "hello.server", "sh", "/tmp/tosker/app/run.sh"]
        );
    }

    #[test]
    fn cleanup_removes_remote_copy() {
        let manager = manager(Path::new("/tmp/ws"));

        assert_eq!(
            manager.cleanup_args(&app()),
            ["exec", "hello.server", "rm", "-rf", "/tmp/tosker/app"]
        );
    }

    #[test]
    fn missing_script_has_no_command() {
        let manager = manager(Path::new("/tmp/ws"));
        assert!(manager.exec_args(&app(), Operation::Stop).is_none());
    }

    #[tokio::test]
    async fn stage_copies_scripts_into_workspace() {
        let sources = tempfile::tempdir().unwrap();
        let workspace = tempfile::tempdir().unwrap();
        let script = sources.path().join("install.sh");
        std::fs::write(&script, "echo install").unwrap();

        let mut software = Software::new("app", "server");
        software.interfaces.insert(Operation::Create, script);

        let staged = manager(workspace.path()).stage(&software).await.unwrap();

        assert_eq!(staged, workspace.path().join("app"));
        assert_eq!(
            std::fs::read_to_string(staged.join("install.sh")).unwrap(),
            "echo install"
        );
    }

    #[tokio::test]
    async fn stage_fails_for_missing_script() {
        let workspace = tempfile::tempdir().unwrap();
        let mut software = Software::new("app", "server");
        software
            .interfaces
            .insert(Operation::Create, workspace.path().join("nope.sh"));

        let err = manager(workspace.path()).stage(&software).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Io(_)));
    }
}
