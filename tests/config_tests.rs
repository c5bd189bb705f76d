//! Configuration file loading.

mod support;

use std::path::PathBuf;

use tosker::error::{ConfigError, Error};
use tosker::infrastructure::config::settings::Config;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.docker.binary, "docker");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn load_reads_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(
        dir.path(),
        concat!(
            "[logging]\n",
            "level = \"debug\"\n",
            "format = \"json\"\n",
            "\n",
            "[workspace]\n",
            "base_dir = \"/var/lib/tosker\"\n",
            "\n",
            "[docker]\n",
            "binary = \"/usr/local/bin/docker\"\n",
        ),
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.logging.format, "json");
    assert_eq!(config.workspace.base_dir, PathBuf::from("/var/lib/tosker"));
    assert_eq!(config.docker.binary, "/usr/local/bin/docker");
}

#[test]
fn load_fails_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn malformed_toml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(dir.path(), "[docker\nbinary = 1\n");
    let result = Config::load_or_default(&path);
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn verbosity_raises_log_level() {
    let config = Config::default();
    assert_eq!(config.logging.clone().with_verbosity(0).level, "warn");
    assert_eq!(config.logging.clone().with_verbosity(1).level, "info");
    assert_eq!(config.logging.with_verbosity(5).level, "trace");
}
