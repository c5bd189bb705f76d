//! Template resolution.
//!
//! Turns a TOSCA-style YAML document into a [`Template`](crate::domain::Template):
//! inputs substituted, node types mapped onto [`Node`](crate::domain::Node)
//! variants, and nodes sorted so that dependencies come first.

mod document;
mod loader;
mod order;

pub use loader::TemplateLoader;
pub use order::deploy_order;
