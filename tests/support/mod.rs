//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A template exercising every node kind, a `get_input`, and both output
/// forms. Requires the `message` input.
pub const HELLO: &str = r#"
tosca_definitions_version: tosca_simple_yaml_1_0
metadata:
  template_name: hello
topology_template:
  inputs:
    message:
      type: string
    port:
      type: integer
      default: 8080
  node_templates:
    app:
      type: tosker.nodes.Software
      requirements:
        - host: server
      interfaces:
        Standard:
          create: scripts/install.sh
          start: scripts/run.sh
    server:
      type: tosker.nodes.Container
      properties:
        image: "nginx:alpine"
        env:
          MESSAGE: { get_input: message }
        ports:
          80: { get_input: port }
      requirements:
        - storage:
            node: data
            location: /data
    data:
      type: tosker.nodes.Volume
  outputs:
    server_id:
      value: { get_attribute: [ server, id ] }
    greeting:
      value: { get_input: message }
"#;

/// Write `HELLO` and its scripts under `dir`, returning the template path.
pub fn write_hello(dir: &Path) -> PathBuf {
    let scripts = dir.join("scripts");
    fs::create_dir_all(&scripts).expect("create scripts dir");
    fs::write(scripts.join("install.sh"), "echo install\n").expect("write install.sh");
    fs::write(scripts.join("run.sh"), "echo run\n").expect("write run.sh");
    write_template(dir, "hello.yaml", HELLO)
}

/// Write a template file named `name` under `dir`.
pub fn write_template(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write template");
    path
}

/// Write a config file under `dir`.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).expect("write config");
    path
}

/// Install a fake `docker` executable that appends its arguments to
/// `<dir>/docker.log` and exits with `status`. Returns the binary path.
#[cfg(unix)]
pub fn fake_docker(dir: &Path, status: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("docker.log");
    let path = dir.join("docker");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\nexit {status}\n",
        log.display()
    );
    fs::write(&path, script).expect("write fake docker");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake docker");
    path
}

/// Like [`fake_docker`], but only calls whose arguments start with `prefix`
/// fail, printing `nope` on stderr.
#[cfg(unix)]
pub fn fake_docker_failing_on(dir: &Path, prefix: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("docker.log");
    let path = dir.join("docker");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\ncase \"$*\" in\n  '{prefix}'*) echo nope >&2; exit 1 ;;\nesac\nexit 0\n",
        log.display()
    );
    fs::write(&path, script).expect("write fake docker");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake docker");
    path
}

/// Lines the fake `docker` recorded so far.
pub fn docker_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("docker.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
