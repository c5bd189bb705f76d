use thiserror::Error;

use crate::domain::phase::Phase;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while resolving a template into a deploy order.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("template has no name and none could be derived from {path}")]
    MissingName { path: String },

    #[error("template declares no node templates")]
    Empty,

    #[error("node '{node}' has unsupported type '{type_name}'")]
    UnknownNodeType { node: String, type_name: String },

    #[error("invalid property '{property}' on node '{node}': {reason}")]
    InvalidProperty {
        node: String,
        property: String,
        reason: String,
    },

    #[error("invalid requirement on node '{node}': {reason}")]
    InvalidRequirement { node: String, reason: String },

    #[error("software '{node}' must declare exactly one host")]
    MissingHost { node: String },

    #[error("software '{node}' is hosted on '{host}', which is not a container")]
    InvalidHost { node: String, host: String },

    #[error("node '{node}' depends on unknown node '{dependency}'")]
    MissingDependency { node: String, dependency: String },

    #[error("circular dependency detected at node '{node}'")]
    CircularDependency { node: String },

    #[error("no value supplied for input '{name}'")]
    MissingInput { name: String },

    #[error("input '{name}' is not declared by the template")]
    UnknownInput { name: String },

    #[error("invalid {function} call: {reason}")]
    InvalidFunction {
        function: &'static str,
        reason: String,
    },

    #[error("invalid input '{raw}': expected NAME=VALUE")]
    MalformedInput { raw: String },

    #[error("invalid output '{output}': {reason}")]
    InvalidOutput { output: String, reason: String },
}

/// Errors raised by a runtime manager while acting on a single node.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}", exit_label(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("unknown attribute '{attribute}' on node '{node}'")]
    UnknownAttribute { node: String, attribute: String },

    #[error("unknown node '{node}'")]
    UnknownNode { node: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

fn exit_label(status: &Option<i32>) -> String {
    status.map_or_else(|| "signal".to_string(), |code| format!("status {code}"))
}

/// Failure of an aborting phase (create or delete).
///
/// Nodes processed before the failing one are left as they are.
#[derive(Error, Debug)]
pub enum PhaseError {
    #[error("{phase} failed on node '{node}': {source}")]
    Node {
        phase: Phase,
        node: String,
        #[source]
        source: RuntimeError,
    },

    #[error("{phase} failed on network '{network}': {source}")]
    Network {
        phase: Phase,
        network: String,
        #[source]
        source: RuntimeError,
    },

    #[error("failed to remove workspace {path}: {source}")]
    Workspace {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PhaseError {
    /// Name of the node that aborted the phase, if a node did.
    #[must_use]
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::Node { node, .. } => Some(node),
            Self::Network { .. } | Self::Workspace { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
