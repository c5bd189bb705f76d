//! Serde mirror of the template YAML.
//!
//! Node templates are kept as a raw [`Mapping`] so declaration order
//! survives parsing; it is the tie-breaker for the deploy order.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

pub(super) const CONTAINER_TYPE: &str = "tosker.nodes.Container";
pub(super) const VOLUME_TYPE: &str = "tosker.nodes.Volume";
pub(super) const SOFTWARE_TYPE: &str = "tosker.nodes.Software";

/// Interface name whose operations drive software lifecycles.
pub(super) const STANDARD_INTERFACE: &str = "Standard";

#[derive(Debug, Deserialize)]
pub(super) struct Document {
    #[serde(default)]
    pub metadata: Metadata,
    pub topology_template: Topology,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Metadata {
    pub template_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Topology {
    #[serde(default)]
    pub inputs: BTreeMap<String, InputDefinition>,
    #[serde(default)]
    pub node_templates: Mapping,
    #[serde(default)]
    pub outputs: Mapping,
}

#[derive(Debug, Deserialize)]
pub(super) struct InputDefinition {
    pub default: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NodeTemplate {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub properties: Mapping,
    #[serde(default)]
    pub requirements: Vec<Mapping>,
    #[serde(default)]
    pub interfaces: BTreeMap<String, BTreeMap<String, OperationDefinition>>,
}

/// An interface operation: a bare script path or `{ implementation: path }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum OperationDefinition {
    Path(String),
    Detailed { implementation: String },
}

impl OperationDefinition {
    pub fn implementation(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Detailed { implementation } => implementation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OutputDefinition {
    pub value: Value,
}
