//! Configuration resolution and loading tests
//!
//! Tests that manipulate CUEPLAY_CONFIG are marked #[serial] so they don't
//! race each other on the process environment.

use cueplay_common::config::{load_config, resolve_config_path, ConfigSource, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;

#[test]
#[serial]
fn test_env_var_used_when_no_cli_arg() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/cueplay-env.toml");

    let source = resolve_config_path(None);
    assert_eq!(
        source,
        ConfigSource::Explicit(PathBuf::from("/tmp/cueplay-env.toml"))
    );

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_arg_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/cueplay-env.toml");

    let cli = PathBuf::from("/tmp/cueplay-cli.toml");
    let source = resolve_config_path(Some(&cli));
    assert_eq!(source, ConfigSource::Explicit(cli));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_default_location_without_overrides() {
    env::remove_var(CONFIG_ENV_VAR);

    match resolve_config_path(None) {
        ConfigSource::Default(path) => {
            assert!(path.ends_with("cueplay/config.toml"));
        }
        ConfigSource::None => {}
        other => panic!("Unexpected source: {:?}", other),
    }
}

#[test]
fn test_missing_default_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let source = ConfigSource::Default(dir.path().join("config.toml"));

    let config = load_config(&source).expect("missing default file is not an error");
    assert_eq!(config.ui.port, 5730);
    assert_eq!(config.host.port, 5000);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = ConfigSource::Explicit(dir.path().join("nope.toml"));

    let err = load_config(&source).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_explicit_file_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[ui]
port = 6000
host_url = "http://stage-pc:5000"
clear_selection_on_stop = true

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = load_config(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap();
    assert_eq!(config.ui.port, 6000);
    assert_eq!(config.ui.host_url, "http://stage-pc:5000");
    assert!(config.ui.clear_selection_on_stop);
    assert_eq!(config.ui.request_timeout_ms, 5000);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_file_is_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ui\nport = ").unwrap();

    let err = load_config(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Config parse error"));
}

#[test]
fn test_zero_event_capacity_is_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ui]\nevent_capacity = 0").unwrap();

    let err = load_config(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
    assert!(err.to_string().contains("event_capacity"));
}

#[test]
fn test_zero_tick_is_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[host]\ntick_ms = 0").unwrap();

    let err = load_config(&ConfigSource::Explicit(file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("tick_ms"));
}
