//! Deployable node types.
//!
//! A [`Node`] is a closed set of kinds. Lifecycle code matches on it
//! exhaustively, so adding a kind is a compile error everywhere a phase
//! needs to decide what to do with it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A container, built from an image or a Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    /// Image reference; `None` when the container is built from `dockerfile`.
    pub image: Option<String>,
    /// Absolute path to a Dockerfile.
    pub dockerfile: Option<PathBuf>,
    pub command: Vec<String>,
    pub env: BTreeMap<String, String>,
    /// Container port to host port.
    pub ports: BTreeMap<String, String>,
    pub volumes: Vec<VolumeMount>,
    /// Long-running service (`true`) or one-shot task run only at create time.
    pub persistent: bool,
}

impl Container {
    /// Create a persistent container running `image` with no extra settings.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: Some(image.into()),
            dockerfile: None,
            command: Vec::new(),
            env: BTreeMap::new(),
            ports: BTreeMap::new(),
            volumes: Vec::new(),
            persistent: true,
        }
    }

    /// Mark the container as a one-shot task.
    #[must_use]
    pub fn one_shot(mut self) -> Self {
        self.persistent = false;
        self
    }
}

/// A volume attached to a container at `location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub volume: String,
    pub location: String,
}

/// A named volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub name: String,
    pub driver: Option<String>,
}

impl Volume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: None,
        }
    }
}

/// Lifecycle operations a software component may implement with a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Create,
    Configure,
    Start,
    Stop,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::Configure,
        Operation::Start,
        Operation::Stop,
        Operation::Delete,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Configure => "configure",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Delete => "delete",
        }
    }

    /// Parse a TOSCA `Standard` interface operation name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A software component installed on a host container by scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Software {
    pub name: String,
    /// Name of the hosting container node.
    pub host: String,
    /// Absolute script path per implemented operation.
    pub interfaces: BTreeMap<Operation, PathBuf>,
}

impl Software {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            interfaces: BTreeMap::new(),
        }
    }

    /// Script implementing `operation`, if any.
    #[must_use]
    pub fn script(&self, operation: Operation) -> Option<&PathBuf> {
        self.interfaces.get(&operation)
    }
}

/// Discriminant of [`Node`], for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Container,
    Volume,
    Software,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Container => "container",
            Self::Volume => "volume",
            Self::Software => "software",
        })
    }
}

/// One deployable unit of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Container(Container),
    Volume(Volume),
    Software(Software),
}

impl Node {
    /// Node name, unique within its template.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Container(c) => &c.name,
            Self::Volume(v) => &v.name,
            Self::Software(s) => &s.name,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Container(_) => NodeKind::Container,
            Self::Volume(_) => NodeKind::Volume,
            Self::Software(_) => NodeKind::Software,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Self::Container(container)
    }
}

impl From<Volume> for Node {
    fn from(volume: Volume) -> Self {
        Self::Volume(volume)
    }
}

impl From<Software> for Node {
    fn from(software: Software) -> Self {
        Self::Software(software)
    }
}
