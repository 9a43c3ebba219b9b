//! Integration-level unit tests for the SettingsEngine public API.
//!
//! Exercises default loading, dotted-key updates, persistence, and reset.

use eztag::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use eztag::types::errors::SettingsError;
use eztag::types::settings::AppSettings;
use serde_json::json;
use tempfile::TempDir;

/// Helper: engine backed by a temp directory that outlives the test body.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    SettingsEngine::new(Some(dir.path().join("settings.json")))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, AppSettings::default());
    assert_eq!(settings.github.api_base_url, "https://api.github.com");
    assert_eq!(settings.github.api_version, "2022-11-28");
    assert_eq!(settings.network.request_timeout_secs, 30);
}

/// A change made through `set_value` is visible to a fresh engine on the same file.
#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("auth.server_url", json!("https://auth.example.com"))
            .unwrap();
    }

    let mut engine2 = engine_in_temp(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(loaded.auth.server_url, "https://auth.example.com");
}

#[test]
fn test_unknown_key_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let err = engine.set_value("auth.nope", json!("x")).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
    let err = engine.set_value("missing.section", json!("x")).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

/// A value of the wrong type leaves the in-memory settings untouched.
#[test]
fn test_wrong_type_rejected_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let err = engine
        .set_value("network.request_timeout_secs", json!("soon"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert_eq!(engine.get_settings().network.request_timeout_secs, 30);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("network.request_timeout_secs", json!(5))
        .unwrap();

    engine.reset().unwrap();

    assert_eq!(engine.get_settings(), &AppSettings::default());
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), AppSettings::default());
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
    assert_eq!(engine.get_settings(), &AppSettings::default());
}

/// A file written by an older build with sections or fields missing still loads.
#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"auth": {"server_url": "https://auth.example"}}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.auth.server_url, "https://auth.example");
    assert_eq!(settings.auth.scope, "repo public_repo user");
    assert_eq!(settings.github, AppSettings::default().github);
    assert_eq!(settings.network.request_timeout_secs, 30);
}
