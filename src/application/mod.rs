//! Application layer: template resolution and the lifecycle controller.

pub mod orchestrator;
pub mod template;
pub mod workspace;

pub use orchestrator::{Orchestrator, Runtime};
pub use template::TemplateLoader;
pub use workspace::Workspace;
