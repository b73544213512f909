//! Configuration resolution and graceful degradation
//!
//! Tests that touch PASEOS_CONFIG are marked #[serial] so they do not race
//! on the process environment.

use paseos_common::config::{resolve_config_path, PaseosConfig, StoreBackend, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_path_takes_priority_over_env() {
    let dir = TempDir::new().unwrap();
    let cli = dir.path().join("cli.toml");
    env::set_var(CONFIG_ENV_VAR, dir.path().join("env.toml"));

    assert_eq!(resolve_config_path(Some(&cli)), Some(cli.clone()));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.toml");
    fs::write(&path, "port = 6001\n[logging]\nlevel = \"debug\"\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = PaseosConfig::load(None).unwrap();
    assert_eq!(config.port, 6001);
    assert_eq!(config.logging.level, "debug");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let config = PaseosConfig::load(Some(&missing)).unwrap();
    assert_eq!(config.port, PaseosConfig::default().port);
    assert_eq!(config.store.backend, StoreBackend::Local);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[store\nbackend = ").unwrap();

    assert!(PaseosConfig::load(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_store_section_parsed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("paseos.toml");
    let db = dir.path().join("journeys.db");
    fs::write(
        &path,
        format!(
            "[store]\nbackend = \"local\"\ndatabase_path = {:?}\n",
            db.display().to_string()
        ),
    )
    .unwrap();

    let config = PaseosConfig::load(Some(&path)).unwrap();
    assert_eq!(config.store.database_path, db);
}
