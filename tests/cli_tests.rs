//! End-to-end runs of the `tosker` binary.

mod support;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn tosker() -> Command {
    let mut cmd = Command::cargo_bin("tosker").expect("tosker binary");
    cmd.env_remove("RUST_LOG").arg("--color").arg("never");
    cmd
}

/// A config whose `[docker] binary` points at `binary` and whose workspace
/// lives under `dir`.
fn config_for(dir: &Path, binary: &Path) -> std::path::PathBuf {
    support::write_config(
        dir,
        &format!(
            "[workspace]\nbase_dir = '{}'\n\n[docker]\nbinary = '{}'\n",
            dir.join("workspaces").display(),
            binary.display()
        ),
    )
}

#[test]
fn help_lists_phases() {
    tosker()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("--input"));
}

#[test]
fn phase_is_required() {
    tosker().arg("hello.yaml").assert().failure();
}

#[test]
fn missing_template_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    tosker()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg(dir.path().join("missing.yaml"))
        .arg("create")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read template"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::write_config(dir.path(), "[logging]\nformat = \"xml\"\n");
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .arg("create")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("logging.format"));
}

#[test]
fn malformed_input_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg(&template)
        .arg("create")
        .args(["--input", "message"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected NAME=VALUE"));
}

#[cfg(unix)]
#[test]
fn create_and_start_drive_docker_and_print_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let docker = support::fake_docker(dir.path(), 0);
    let config = config_for(dir.path(), &docker);
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .args(["create", "start", "--input", "message=hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deploy order:"))
        .stdout(predicate::str::contains("CREATE"))
        .stdout(predicate::str::contains("START"))
        .stdout(predicate::str::contains("OUTPUTS:"))
        .stdout(predicate::str::contains("- greeting: hi"));

    let calls = support::docker_calls(dir.path());
    assert_eq!(calls[0], "network create hello");
    assert_eq!(calls[1], "volume create hello.data");
    assert!(calls[2].starts_with("create --name hello.server --network hello"));
    assert!(calls.contains(&"exec hello.server sh /tmp/tosker/app/install.sh".to_string()));
    assert!(calls.contains(&"exec --detach hello.server sh /tmp/tosker/app/run.sh".to_string()));

    let staged = dir.path().join("workspaces/hello/app/install.sh");
    assert!(staged.is_file(), "scripts are staged in the workspace");
}

#[cfg(unix)]
#[test]
fn stop_prints_no_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let docker = support::fake_docker(dir.path(), 0);
    let config = config_for(dir.path(), &docker);
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .args(["stop", "--input", "message=hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STOP"))
        .stdout(predicate::str::contains("OUTPUTS:").not());

    assert_eq!(
        support::docker_calls(dir.path()),
        ["stop hello.server"],
        "software without a stop script needs no docker call"
    );
}

#[cfg(unix)]
#[test]
fn delete_removes_network_and_workspace_but_not_volumes() {
    let dir = tempfile::tempdir().unwrap();
    let docker = support::fake_docker(dir.path(), 0);
    let config = config_for(dir.path(), &docker);
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .args(["create", "delete", "--input", "message=hi"])
        .assert()
        .success();

    let calls = support::docker_calls(dir.path());
    assert_eq!(calls.last().map(String::as_str), Some("network rm hello"));
    assert!(calls.contains(&"rm --force hello.server".to_string()));
    assert!(!calls.iter().any(|call| call.starts_with("volume rm")));
    assert!(!dir.path().join("workspaces/hello").exists());
}

#[cfg(unix)]
#[test]
fn runtime_failure_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let docker = support::fake_docker(dir.path(), 1);
    let config = config_for(dir.path(), &docker);
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .args(["create", "--input", "message=hi"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("network 'hello'"));

    assert_eq!(support::docker_calls(dir.path()), ["network create hello"]);
}

#[cfg(unix)]
#[test]
fn quiet_failure_names_the_node() {
    let dir = tempfile::tempdir().unwrap();
    let docker = support::fake_docker_failing_on(dir.path(), "volume create");
    let config = config_for(dir.path(), &docker);
    let template = support::write_hello(dir.path());

    tosker()
        .arg("-q")
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .args(["create", "--input", "message=hi"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("data: "))
        .stdout(predicate::str::contains("nope"))
        .stdout(predicate::str::contains("Deploy order:").not())
        .stderr(predicate::str::contains("\u{1b}[").not());

    assert_eq!(
        support::docker_calls(dir.path()),
        ["network create hello", "volume create hello.data"]
    );
}

#[cfg(unix)]
#[test]
fn json_mode_emits_typed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let docker = support::fake_docker(dir.path(), 0);
    let config = config_for(dir.path(), &docker);
    let template = support::write_hello(dir.path());

    tosker()
        .arg("--json")
        .arg("--config")
        .arg(&config)
        .arg(&template)
        .args(["create", "--input", "message=hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"deploy_order""#))
        .stdout(predicate::str::contains(r#""type":"node_succeeded""#));
}
