//! Resolved templates, their outputs, and invocation inputs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::node::Node;
use crate::error::TemplateError;

/// How an output's value is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    /// A constant declared in the template.
    Literal(String),
    /// `get_attribute: [node, attribute]`, read from the runtime after deployment.
    Attribute { node: String, attribute: String },
}

/// A named value declared by the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub name: String,
    pub value: OutputValue,
}

/// A template resolved into its deploy order.
///
/// Every node's dependencies appear strictly earlier in `deploy_order`.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    base_dir: PathBuf,
    deploy_order: Vec<Node>,
    outputs: Vec<Output>,
}

impl Template {
    /// Build a template from an already ordered node sequence.
    pub fn new(
        name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        deploy_order: Vec<Node>,
        outputs: Vec<Output>,
    ) -> Self {
        Self {
            name: name.into(),
            base_dir: base_dir.into(),
            deploy_order,
            outputs,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the template was loaded from.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn deploy_order(&self) -> &[Node] {
        &self.deploy_order
    }

    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Look up a node by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.deploy_order.iter().find(|n| n.name() == name)
    }
}

/// Input values supplied for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs(BTreeMap<String, String>);

impl Inputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `NAME=VALUE` pairs. Later pairs override earlier ones.
    pub fn parse<I, S>(pairs: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for pair in pairs {
            let raw = pair.as_ref();
            let (name, value) = raw
                .split_once('=')
                .filter(|(name, _)| !name.trim().is_empty())
                .ok_or_else(|| TemplateError::MalformedInput {
                    raw: raw.to_string(),
                })?;
            values.insert(name.trim().to_string(), value.to_string());
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::{Container, Volume};

    #[test]
    fn inputs_parse_name_value_pairs() {
        let inputs = Inputs::parse(["port=8080", "greeting=a=b"]).unwrap();
        assert_eq!(inputs.get("port"), Some("8080"));
        assert_eq!(inputs.get("greeting"), Some("a=b"));
    }

    #[test]
    fn inputs_reject_missing_separator() {
        let err = Inputs::parse(["port"]).unwrap_err();
        assert!(matches!(err, TemplateError::MalformedInput { raw } if raw == "port"));
    }

    #[test]
    fn inputs_reject_empty_name() {
        assert!(Inputs::parse(["=1"]).is_err());
    }

    #[test]
    fn template_finds_nodes_by_name() {
        let template = Template::new(
            "hello",
            ".",
            vec![Volume::new("data").into(), Container::new("web", "nginx").into()],
            vec![],
        );
        assert_eq!(template.node("web").map(Node::name), Some("web"));
        assert!(template.node("db").is_none());
    }
}
