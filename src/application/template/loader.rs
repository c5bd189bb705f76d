//! Template loading and validation.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, instrument};

use super::document::{
    Document, InputDefinition, NodeTemplate, OutputDefinition, CONTAINER_TYPE, SOFTWARE_TYPE,
    STANDARD_INTERFACE, VOLUME_TYPE,
};
use super::order::deploy_order;
use crate::domain::{
    Container, Inputs, Node, Operation, Output, OutputValue, Software, Template, Volume,
    VolumeMount,
};
use crate::error::TemplateError;

/// Loader for TOSCA-style YAML templates.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load and resolve a template file.
    ///
    /// Relative script and Dockerfile paths are resolved against the
    /// template's directory. When the template declares no
    /// `metadata.template_name`, the file stem names it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to resolve
    /// (see [`TemplateLoader::parse`]).
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, inputs: &Inputs) -> Result<Template, TemplateError> {
        let content = fs::read_to_string(path).map_err(|source| TemplateError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = path.file_stem().and_then(|s| s.to_str());

        Self::parse(&content, &base_dir, stem, inputs)
    }

    /// Resolve template YAML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The YAML is malformed or a node template does not match the schema
    /// - An input is unknown, or a declared input has no value
    /// - A node has an unsupported type, property, or requirement
    /// - A requirement targets a missing node, or dependencies form a cycle
    /// - An output is neither a scalar nor a valid `get_attribute`
    pub fn parse(
        content: &str,
        base_dir: &Path,
        fallback_name: Option<&str>,
        inputs: &Inputs,
    ) -> Result<Template, TemplateError> {
        let document: Document = serde_yaml::from_str(content).map_err(TemplateError::Parse)?;

        let name = document
            .metadata
            .template_name
            .or_else(|| fallback_name.map(str::to_string))
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| TemplateError::MissingName {
                path: base_dir.display().to_string(),
            })?;

        let topology = document.topology_template;
        let values = resolve_inputs(&topology.inputs, inputs)?;

        if topology.node_templates.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut raw = Vec::with_capacity(topology.node_templates.len());
        for (key, value) in topology.node_templates {
            let node_name = scalar(&key).ok_or_else(|| TemplateError::InvalidProperty {
                node: format!("{key:?}"),
                property: "name".into(),
                reason: "node names must be scalars".into(),
            })?;
            let template: NodeTemplate =
                serde_yaml::from_value(substitute(value, &values)?).map_err(TemplateError::Parse)?;
            raw.push((node_name, template));
        }

        let kinds: HashMap<&str, &str> = raw
            .iter()
            .map(|(name, template)| (name.as_str(), template.type_name.as_str()))
            .collect();

        let mut nodes = Vec::with_capacity(raw.len());
        for (node_name, template) in &raw {
            nodes.push(build_node(node_name, template, &kinds, base_dir)?);
        }

        let mut outputs = Vec::with_capacity(topology.outputs.len());
        for (key, value) in topology.outputs {
            let output_name = scalar(&key).unwrap_or_else(|| format!("{key:?}"));
            let definition: OutputDefinition =
                serde_yaml::from_value(substitute(value, &values)?).map_err(TemplateError::Parse)?;
            outputs.push(build_output(output_name, definition.value, &kinds)?);
        }

        let deploy_order = deploy_order(nodes)?;
        info!(
            template = %name,
            nodes = deploy_order.len(),
            outputs = outputs.len(),
            "Template resolved"
        );

        Ok(Template::new(name, base_dir, deploy_order, outputs))
    }
}

/// Match supplied inputs against declarations, falling back to defaults.
fn resolve_inputs(
    declared: &BTreeMap<String, InputDefinition>,
    supplied: &Inputs,
) -> Result<HashMap<String, Value>, TemplateError> {
    if let Some(unknown) = supplied.names().find(|name| !declared.contains_key(*name)) {
        return Err(TemplateError::UnknownInput {
            name: unknown.to_string(),
        });
    }

    declared
        .iter()
        .map(|(name, definition)| {
            let value = supplied
                .get(name)
                .map(supplied_value)
                .or_else(|| definition.default.clone())
                .ok_or_else(|| TemplateError::MissingInput { name: name.clone() })?;
            debug!(input = %name, "Input resolved");
            Ok((name.clone(), value))
        })
        .collect()
}

/// Read a command-line input the way YAML would read a plain scalar, so
/// `false` or `8080` reach typed properties as a boolean or a number.
/// Anything else stays a string.
fn supplied_value(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Replace every `{ get_input: name }` in `value`.
fn substitute(value: Value, inputs: &HashMap<String, Value>) -> Result<Value, TemplateError> {
    match value {
        Value::Mapping(map) => {
            if map.len() == 1 {
                if let Some(arg) = map.get("get_input") {
                    let name = arg.as_str().ok_or_else(|| TemplateError::InvalidFunction {
                        function: "get_input",
                        reason: "argument must be an input name".into(),
                    })?;
                    return inputs
                        .get(name)
                        .cloned()
                        .ok_or_else(|| TemplateError::MissingInput {
                            name: name.to_string(),
                        });
                }
            }
            let mut resolved = Mapping::with_capacity(map.len());
            for (key, inner) in map {
                resolved.insert(key, substitute(inner, inputs)?);
            }
            Ok(Value::Mapping(resolved))
        }
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| substitute(item, inputs))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        other => Ok(other),
    }
}

/// Render a YAML scalar as a string.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A requirement after normalising the short and long forms.
struct Requirement {
    name: String,
    target: String,
    location: Option<String>,
}

fn parse_requirement(node: &str, entry: &Mapping) -> Result<Requirement, TemplateError> {
    let invalid = |reason: &str| TemplateError::InvalidRequirement {
        node: node.to_string(),
        reason: reason.to_string(),
    };

    let mut entries = entry.iter();
    let (key, value) = match (entries.next(), entries.next()) {
        (Some(pair), None) => pair,
        _ => return Err(invalid("each requirement must have exactly one name")),
    };
    let name = key
        .as_str()
        .ok_or_else(|| invalid("requirement name must be a string"))?;

    let (target, location) = match value {
        Value::String(target) => (target.clone(), None),
        Value::Mapping(details) => {
            let target = details
                .get("node")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("requirement is missing its target node"))?;
            (target.to_string(), details.get("location").and_then(scalar))
        }
        _ => return Err(invalid("requirement must name a node")),
    };

    Ok(Requirement {
        name: name.to_string(),
        target,
        location,
    })
}

fn build_node(
    name: &str,
    template: &NodeTemplate,
    kinds: &HashMap<&str, &str>,
    base_dir: &Path,
) -> Result<(Node, Vec<String>), TemplateError> {
    let mut requirements = Vec::with_capacity(template.requirements.len());
    for entry in &template.requirements {
        let requirement = parse_requirement(name, entry)?;
        if !kinds.contains_key(requirement.target.as_str()) {
            return Err(TemplateError::MissingDependency {
                node: name.to_string(),
                dependency: requirement.target,
            });
        }
        requirements.push(requirement);
    }

    let dependencies = requirements.iter().map(|r| r.target.clone()).collect();

    let node: Node = match template.type_name.as_str() {
        CONTAINER_TYPE => build_container(name, template, &requirements, kinds, base_dir)?.into(),
        VOLUME_TYPE => build_volume(name, template, &requirements)?.into(),
        SOFTWARE_TYPE => build_software(name, template, &requirements, kinds, base_dir)?.into(),
        other => {
            return Err(TemplateError::UnknownNodeType {
                node: name.to_string(),
                type_name: other.to_string(),
            })
        }
    };

    Ok((node, dependencies))
}

fn invalid_property(node: &str, property: &str, reason: &str) -> TemplateError {
    TemplateError::InvalidProperty {
        node: node.to_string(),
        property: property.to_string(),
        reason: reason.to_string(),
    }
}

fn string_property(
    node: &str,
    properties: &Mapping,
    key: &str,
) -> Result<Option<String>, TemplateError> {
    match properties.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar(value)
            .map(Some)
            .ok_or_else(|| invalid_property(node, key, "expected a scalar")),
    }
}

fn map_property(
    node: &str,
    properties: &Mapping,
    key: &str,
) -> Result<BTreeMap<String, String>, TemplateError> {
    match properties.get(key) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Mapping(entries)) => entries
            .iter()
            .map(|(k, v)| match (scalar(k), scalar(v)) {
                (Some(k), Some(v)) => Ok((k, v)),
                _ => Err(invalid_property(node, key, "entries must be scalars")),
            })
            .collect(),
        Some(_) => Err(invalid_property(node, key, "expected a mapping")),
    }
}

fn reject_requirement(node: &str, requirement: &Requirement) -> TemplateError {
    TemplateError::InvalidRequirement {
        node: node.to_string(),
        reason: format!("'{}' is not supported on this node type", requirement.name),
    }
}

fn build_container(
    name: &str,
    template: &NodeTemplate,
    requirements: &[Requirement],
    kinds: &HashMap<&str, &str>,
    base_dir: &Path,
) -> Result<Container, TemplateError> {
    let properties = &template.properties;

    let image = string_property(name, properties, "image")?;
    let dockerfile = string_property(name, properties, "dockerfile")?.map(|p| base_dir.join(p));
    if image.is_none() && dockerfile.is_none() {
        return Err(invalid_property(
            name,
            "image",
            "either image or dockerfile is required",
        ));
    }

    let command = match properties.get("command") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(line)) => line.split_whitespace().map(str::to_string).collect(),
        Some(Value::Sequence(parts)) => parts
            .iter()
            .map(|part| scalar(part).ok_or_else(|| invalid_property(name, "command", "expected scalars")))
            .collect::<Result<_, _>>()?,
        Some(_) => return Err(invalid_property(name, "command", "expected a string or list")),
    };

    let persistent = match properties.get("persistent") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(invalid_property(name, "persistent", "expected a boolean")),
    };

    let mut volumes = Vec::new();
    for requirement in requirements {
        match requirement.name.as_str() {
            "storage" => {
                if kinds.get(requirement.target.as_str()) != Some(&VOLUME_TYPE) {
                    return Err(TemplateError::InvalidRequirement {
                        node: name.to_string(),
                        reason: format!("storage target '{}' is not a volume", requirement.target),
                    });
                }
                let location =
                    requirement
                        .location
                        .clone()
                        .ok_or_else(|| TemplateError::InvalidRequirement {
                            node: name.to_string(),
                            reason: format!("storage on '{}' needs a location", requirement.target),
                        })?;
                volumes.push(VolumeMount {
                    volume: requirement.target.clone(),
                    location,
                });
            }
            "connection" | "dependency" => {}
            _ => return Err(reject_requirement(name, requirement)),
        }
    }

    Ok(Container {
        name: name.to_string(),
        image,
        dockerfile,
        command,
        env: map_property(name, properties, "env")?,
        ports: map_property(name, properties, "ports")?,
        volumes,
        persistent,
    })
}

fn build_volume(
    name: &str,
    template: &NodeTemplate,
    requirements: &[Requirement],
) -> Result<Volume, TemplateError> {
    if let Some(requirement) = requirements
        .iter()
        .find(|r| !matches!(r.name.as_str(), "connection" | "dependency"))
    {
        return Err(reject_requirement(name, requirement));
    }

    Ok(Volume {
        name: name.to_string(),
        driver: string_property(name, &template.properties, "driver")?,
    })
}

fn build_software(
    name: &str,
    template: &NodeTemplate,
    requirements: &[Requirement],
    kinds: &HashMap<&str, &str>,
    base_dir: &Path,
) -> Result<Software, TemplateError> {
    let mut host = None;
    for requirement in requirements {
        match requirement.name.as_str() {
            "host" if host.is_none() => host = Some(requirement.target.clone()),
            "host" => return Err(TemplateError::MissingHost { node: name.to_string() }),
            "connection" | "dependency" => {}
            _ => return Err(reject_requirement(name, requirement)),
        }
    }
    let host = host.ok_or_else(|| TemplateError::MissingHost {
        node: name.to_string(),
    })?;
    if kinds.get(host.as_str()) != Some(&CONTAINER_TYPE) {
        return Err(TemplateError::InvalidHost {
            node: name.to_string(),
            host,
        });
    }

    let mut interfaces = BTreeMap::new();
    if let Some(standard) = template.interfaces.get(STANDARD_INTERFACE) {
        for (op_name, definition) in standard {
            let operation = Operation::from_name(op_name).ok_or_else(|| {
                invalid_property(
                    name,
                    &format!("interfaces.{STANDARD_INTERFACE}.{op_name}"),
                    "unknown lifecycle operation",
                )
            })?;
            interfaces.insert(operation, base_dir.join(definition.implementation()));
        }
    }

    Ok(Software {
        name: name.to_string(),
        host,
        interfaces,
    })
}

fn build_output(
    name: String,
    value: Value,
    kinds: &HashMap<&str, &str>,
) -> Result<Output, TemplateError> {
    let invalid = |reason: String| TemplateError::InvalidOutput {
        output: name.clone(),
        reason,
    };

    let value = match &value {
        Value::Mapping(map) if map.contains_key("get_attribute") => {
            let args = map
                .get("get_attribute")
                .and_then(Value::as_sequence)
                .map(|args| args.iter().map(scalar).collect::<Option<Vec<_>>>());
            let (node, attribute) = match args {
                Some(Some(args)) if args.len() == 2 => (args[0].clone(), args[1].clone()),
                _ => return Err(invalid("get_attribute expects [node, attribute]".into())),
            };
            if !kinds.contains_key(node.as_str()) {
                return Err(invalid(format!("unknown node '{node}'")));
            }
            OutputValue::Attribute { node, attribute }
        }
        other => OutputValue::Literal(
            scalar(other).ok_or_else(|| invalid("value must be a scalar or get_attribute".into()))?,
        ),
    };

    Ok(Output { name, value })
}
