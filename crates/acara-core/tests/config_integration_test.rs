//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct
//! precedence: Environment variables > Config file > Defaults

use acara_core::config::{ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var("ACARA_BOUNDARY");
    env::remove_var("ACARA_RADIUS_KM");
    env::remove_var("ACARA_DIRECT_TAKEDOWN");
    env::remove_var("ACARA_PORT");
}

#[test]
#[serial]
fn test_default_configuration() {
    clear_env();
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.boundary_path.value, None);
    assert_eq!(config.boundary_path.source, ConfigSource::Default);
    assert_eq!(config.proximity_radius_km.value, 2.0);
    assert_eq!(config.proximity_radius_km.source, ConfigSource::Default);
    assert!(!config.direct_takedown.value);
    assert_eq!(config.port.value, 3001);
}

#[test]
#[serial]
fn test_file_overrides_defaults() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
boundary_path = "/data/province.geojson"
proximity_radius_km = 5.0
direct_takedown = true
port = 8080
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.boundary_path.value, Some(PathBuf::from("/data/province.geojson")));
    assert_eq!(config.boundary_path.source, ConfigSource::File);
    assert_eq!(config.proximity_radius_km.value, 5.0);
    assert_eq!(config.proximity_radius_km.source, ConfigSource::File);
    assert!(config.direct_takedown.value);
    assert_eq!(config.port.value, 8080);
    assert_eq!(config.port.source, ConfigSource::File);
}

#[test]
#[serial]
fn test_partial_file_configuration() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
proximity_radius_km = 3.5
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.proximity_radius_km.value, 3.5);
    assert_eq!(config.proximity_radius_km.source, ConfigSource::File);
    assert_eq!(config.port.value, 3001);
    assert_eq!(config.port.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
proximity_radius_km = 5.0
port = 8080
"#
    )
    .unwrap();

    env::set_var("ACARA_RADIUS_KM", "1.5");
    env::set_var("ACARA_DIRECT_TAKEDOWN", "true");

    let config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.proximity_radius_km.value, 1.5);
    assert_eq!(config.proximity_radius_km.source, ConfigSource::Environment);
    assert!(config.direct_takedown.value);
    assert_eq!(config.direct_takedown.source, ConfigSource::Environment);
    // File value survives where the environment is silent.
    assert_eq!(config.port.value, 8080);
    assert_eq!(config.port.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_radius_from_file_is_rejected() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
proximity_radius_km = -2.0
"#
    )
    .unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("ACARA_RADIUS_KM", "close");
    env::set_var("ACARA_PORT", "not-a-port");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.proximity_radius_km.value, 2.0);
    assert_eq!(config.proximity_radius_km.source, ConfigSource::Default);
    assert_eq!(config.port.value, 3001);

    clear_env();
}
