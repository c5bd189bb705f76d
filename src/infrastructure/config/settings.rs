//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct. Every section is optional: a missing
//! file or an empty one yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use tosker::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [workspace]
//! base_dir = "/var/tmp/tosker"
//!
//! [docker]
//! binary = "podman"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::logging::{LoggingConfig, LOG_FORMATS};
use crate::error::{ConfigError, Result};

/// Workspace location.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Parent directory of per-template workspaces.
    ///
    /// Defaults to `tosker` under the system temporary directory.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    std::env::temp_dir().join("tosker")
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

/// Container runtime client.
#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfig {
    /// Docker-compatible CLI to invoke.
    #[serde(default = "default_binary")]
    pub binary: String,
}

fn default_binary() -> String {
    "docker".into()
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Workspace directory settings.
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Runtime client settings.
    #[serde(default)]
    pub docker: DockerConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` when it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.docker.binary.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "docker.binary",
            }
            .into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        if self.workspace.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "workspace.base_dir",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.docker.binary, "docker");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.workspace.base_dir.ends_with("tosker"));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse_toml(
            r#"
[logging]
level = "debug"
format = "json"

[workspace]
base_dir = "/var/tmp/deployments"

[docker]
binary = "podman"
"#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.workspace.base_dir, PathBuf::from("/var/tmp/deployments"));
        assert_eq!(config.docker.binary, "podman");
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = Config::parse_toml("[logging]\nformat = \"xml\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "logging.format",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_empty_binary() {
        let result = Config::parse_toml("[docker]\nbinary = \"\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "docker.binary"
            }))
        ));
    }
}
