//! Tests for configuration loading and root folder resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests
//! that manipulate EXPLORER_ROOT_FOLDER are marked with #[serial] to ensure
//! they run sequentially, not in parallel.

use explorer_common::config::{
    ensure_root_folder, resolve_root_folder, DashConfig, DEFAULT_PORT,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const ENV_VAR: &str = "EXPLORER_ROOT_FOLDER";

#[test]
#[serial]
fn resolver_with_no_overrides_uses_default() {
    env::remove_var(ENV_VAR);

    let root = resolve_root_folder(None, ENV_VAR);
    assert!(!root.as_os_str().is_empty());
    let path_str = root.to_string_lossy();
    assert!(
        path_str.contains("explorer"),
        "default root should be an explorer-dash data dir, got {}",
        path_str
    );
}

#[test]
#[serial]
fn resolver_env_var_overrides_default() {
    let test_path = "/tmp/explorer-test-env-folder";
    env::set_var(ENV_VAR, test_path);

    let root = resolve_root_folder(None, ENV_VAR);
    assert_eq!(root, PathBuf::from(test_path));

    env::remove_var(ENV_VAR);
}

#[test]
#[serial]
fn resolver_cli_arg_overrides_env_var() {
    env::set_var(ENV_VAR, "/tmp/explorer-test-env-folder");

    let cli = PathBuf::from("/tmp/explorer-test-cli-folder");
    let root = resolve_root_folder(Some(&cli), ENV_VAR);
    assert_eq!(root, cli);

    env::remove_var(ENV_VAR);
}

#[test]
fn ensure_root_folder_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    assert!(!nested.exists());
    ensure_root_folder(&nested).unwrap();
    assert!(nested.is_dir());

    // Re-running on an existing directory is fine
    ensure_root_folder(&nested).unwrap();
}

#[test]
fn missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("config.toml");
    assert!(DashConfig::load_from(&missing).is_err());

    let defaults = DashConfig::default();
    assert_eq!(defaults.port, DEFAULT_PORT);
    assert!(!defaults.production_url.is_empty());
}

#[test]
fn partial_config_file_merges_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
port = 6000
production_url = "http://localhost:9999/production"
production_fallback_url = "http://fallback.example/production"
"#,
    )
    .unwrap();

    let config = DashConfig::load_from(&path).unwrap();
    assert_eq!(config.port, 6000);
    assert_eq!(config.production_url, "http://localhost:9999/production");
    assert_eq!(
        config.production_fallback_url.as_deref(),
        Some("http://fallback.example/production")
    );
    // Untouched keys keep compiled defaults
    assert_eq!(config.process_order.len(), 12);
    assert_eq!(config.fty_target("UCT"), Some(98.0));
}

#[test]
fn malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number").unwrap();

    assert!(DashConfig::load_from(&path).is_err());
}

#[test]
fn fty_targets_override_in_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[fty_targets]
UCT = 99.5
"#,
    )
    .unwrap();

    let config = DashConfig::load_from(&path).unwrap();
    assert_eq!(config.fty_target("UCT"), Some(99.5));
    // The table replaces the default map wholesale
    assert_eq!(config.fty_target("CFC"), None);
}
