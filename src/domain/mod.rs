//! Runtime-agnostic deployment model.
//!
//! A [`Template`] is the resolved form of a topology: its name, the nodes in
//! deploy order, and the outputs declared on it. Every type here is
//! immutable once built by the template loader.

pub mod node;
pub mod phase;
pub mod template;

pub use node::{Container, Node, NodeKind, Operation, Software, Volume, VolumeMount};
pub use phase::Phase;
pub use template::{Inputs, Output, OutputValue, Template};
