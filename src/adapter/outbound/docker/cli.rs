//! `docker` command runner.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::RuntimeError;

/// Runs `docker` subcommands and captures their output.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run `docker <args>` to completion and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Spawn`] when the binary cannot be started and
    /// [`RuntimeError::CommandFailed`] when it exits unsuccessfully.
    #[instrument(level = "debug", skip_all, fields(command = %self.command_line(args)))]
    pub async fn run(&self, args: &[String]) -> Result<String, RuntimeError> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RuntimeError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            return Err(RuntimeError::CommandFailed {
                command: self.command_line(args),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(bytes = stdout.len(), "Command succeeded");
        Ok(stdout)
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.binary.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build an owned argument list from string literals and values.
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$(::std::string::String::from($arg)),*]
    };
}

pub(crate) use args;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let cli = DockerCli::new("tosker-test-no-such-binary");
        let err = cli.run(&args!["version"]).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Spawn { program, .. } if program == "tosker-test-no-such-binary"));
    }

    #[tokio::test]
    async fn failing_command_reports_status_and_stderr() {
        let cli = DockerCli::new("sh");
        let err = cli
            .run(&args!["-c", "echo boom >&2; exit 3"])
            .await
            .unwrap_err();

        match err {
            RuntimeError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected CommandFailed, got {other}"),
        }
    }

    #[tokio::test]
    async fn successful_command_returns_trimmed_stdout() {
        let cli = DockerCli::new("sh");
        let out = cli.run(&args!["-c", "echo '  hi  '"]).await.unwrap();
        assert_eq!(out, "hi");
    }
}
