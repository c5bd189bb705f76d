//! Attribute lookup for deployed nodes.

use async_trait::async_trait;

use super::cli::{args, DockerCli};
use super::Naming;
use crate::domain::Node;
use crate::error::RuntimeError;
use crate::port::AttributeResolver;

/// Resolves attributes from `docker inspect`, falling back to values known
/// from the template.
///
/// | kind      | attributes                          |
/// |-----------|-------------------------------------|
/// | container | `id`, `ip_address`, `image`, `name` |
/// | volume    | `id`, `mountpoint`, `name`          |
/// | software  | `host`, `name`                      |
pub struct DockerAttributes {
    cli: DockerCli,
    naming: Naming,
}

impl DockerAttributes {
    pub fn new(cli: DockerCli, naming: Naming) -> Self {
        Self { cli, naming }
    }

    /// `docker inspect` arguments for runtime attributes.
    fn inspect_args(&self, node: &Node, attribute: &str) -> Option<Vec<String>> {
        let format = match (node, attribute) {
            (Node::Container(_), "id") => "{{.Id}}",
            (Node::Container(_), "ip_address") => {
                "{{range .NetworkSettings.Networks}}{{.IPAddress}}{{end}}"
            }
            (Node::Volume(_), "id") => "{{.Name}}",
            (Node::Volume(_), "mountpoint") => "{{.Mountpoint}}",
            _ => return None,
        };
        let object = match node {
            Node::Volume(_) => "volume",
            Node::Container(_) | Node::Software(_) => "container",
        };
        Some(args![
            object,
            "inspect",
            "--format",
            format,
            self.naming.resource(node.name()),
        ])
    }

    /// Attributes known without asking the runtime.
    fn static_attribute(&self, node: &Node, attribute: &str) -> Option<String> {
        match (node, attribute) {
            (Node::Software(_), "name") => Some(node.name().to_string()),
            (_, "name") => Some(self.naming.resource(node.name())),
            (Node::Container(container), "image") => Some(
                container
                    .image
                    .clone()
                    .filter(|_| container.dockerfile.is_none())
                    .unwrap_or_else(|| self.naming.image(&container.name)),
            ),
            (Node::Software(software), "host") => Some(self.naming.resource(&software.host)),
            _ => None,
        }
    }
}

#[async_trait]
impl AttributeResolver for DockerAttributes {
    async fn resolve(&self, node: &Node, attribute: &str) -> Result<String, RuntimeError> {
        if let Some(value) = self.static_attribute(node, attribute) {
            return Ok(value);
        }
        match self.inspect_args(node, attribute) {
            Some(args) => self.cli.run(&args).await,
            None => Err(RuntimeError::UnknownAttribute {
                node: node.name().to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Container, Software, Volume};

    fn attributes() -> DockerAttributes {
        DockerAttributes::new(DockerCli::new("docker"), Naming::new("hello"))
    }

    #[test]
    fn container_id_comes_from_inspect() {
        let node = Node::from(Container::new("web", "nginx"));
        assert_eq!(
            attributes().inspect_args(&node, "id").unwrap(),
            ["container", "inspect", "--format", "{{.Id}}", "hello.web"]
        );
    }

    #[test]
    fn volume_mountpoint_comes_from_volume_inspect() {
        let node = Node::from(Volume::new("data"));
        let args = attributes().inspect_args(&node, "mountpoint").unwrap();
        assert_eq!(args[0], "volume");
        assert_eq!(args[4], "hello.data");
    }

    #[test]
    fn static_attributes_need_no_runtime() {
        let attributes = attributes();
        let web = Node::from(Container::new("web", "nginx"));
        let app = Node::from(Software::new("app", "web"));

        assert_eq!(attributes.static_attribute(&web, "image").as_deref(), Some("nginx"));
        assert_eq!(attributes.static_attribute(&web, "name").as_deref(), Some("hello.web"));
        assert_eq!(attributes.static_attribute(&app, "host").as_deref(), Some("hello.web"));
    }

    #[tokio::test]
    async fn unknown_attribute_is_an_error() {
        let app = Node::from(Software::new("app", "web"));
        let err = attributes().resolve(&app, "ip_address").await.unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownAttribute { attribute, .. } if attribute == "ip_address"));
    }
}
