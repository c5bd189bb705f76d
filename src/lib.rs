//! Tosker - lifecycle orchestration for TOSCA-style application topologies.
//!
//! A template describes containers, volumes, and software components along
//! with the requirements between them. Tosker resolves a deploy order and
//! drives every node through the `create`, `start`, `stop`, and `delete`
//! phases on a Docker-compatible runtime.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Nodes, phases, templates, and inputs. No I/O.
//! - [`port`] - Traits the controller depends on (runtime managers,
//!   attribute lookup, progress reporting)
//! - [`application`] - Template loading, deploy ordering, and the
//!   [`Orchestrator`](application::Orchestrator) itself
//! - [`adapter`] - The Docker CLI runtime and the command-line interface
//! - [`infrastructure`] - Configuration files and logging setup
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use tosker::adapter::outbound::docker;
//! use tosker::application::{Orchestrator, TemplateLoader, Workspace};
//! use tosker::domain::{Inputs, Phase};
//! use tosker::port::LogReporter;
//!
//! # async fn deploy() -> tosker::error::Result<()> {
//! let template = TemplateLoader::load(Path::new("hello.yaml"), &Inputs::new())?;
//! let workspace = Workspace::new(std::env::temp_dir().join("tosker"), template.name());
//! let runtime = docker::runtime("docker", template.name(), &workspace);
//!
//! let orchestrator = Orchestrator::new(template, workspace, runtime, Arc::new(LogReporter))?;
//! orchestrator.run(Phase::Create).await?;
//! orchestrator.run(Phase::Start).await?;
//! orchestrator.print_outputs().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
