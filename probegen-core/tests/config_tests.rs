//! Integration tests for configuration loading and validation

use probegen_core::config::{load_from_json, load_from_yaml, ConfigError, GeneratorConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test config file
fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_yaml_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(
        &dir,
        "generator.yaml",
        r#"
temperature: 0.2
max_tokens: 512
seed: 99
stop: ["\n\n"]
suppressed_params: [frequency_penalty, presence_penalty]
retry:
  max_wait_ms: 30000
  max_retries: 12
"#,
    );

    let config = load_from_yaml(&path).unwrap();
    assert_eq!(config.temperature, Some(0.2));
    assert_eq!(config.max_tokens, Some(512));
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.stop, Some(vec!["\n\n".to_string()]));
    assert!(config.suppressed_params.contains("presence_penalty"));
    assert_eq!(config.top_p, Some(1.0));
    assert!(config.retry_json);
    assert_eq!(config.retry.backoff_unit_ms, 1000);
    assert_eq!(config.retry.max_wait_ms, 30000);
    assert_eq!(config.retry.max_retries, Some(12));
}

#[test]
fn test_empty_document_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "empty.json", "{}");

    let config = load_from_json(&path).unwrap();
    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn test_env_interpolation() {
    std::env::set_var("PROBEGEN_CONFIG_TEST_TEMPERATURE", "1.3");
    let dir = TempDir::new().unwrap();
    let path = create_test_file(
        &dir,
        "env.yaml",
        "temperature: ${PROBEGEN_CONFIG_TEST_TEMPERATURE}\n",
    );

    let config = load_from_yaml(&path).unwrap();
    assert_eq!(config.temperature, Some(1.3));
}

#[test]
fn test_missing_env_var() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(
        &dir,
        "env.yaml",
        "temperature: ${PROBEGEN_CONFIG_TEST_NEVER_SET}\n",
    );

    let err = load_from_yaml(&path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::EnvVarNotFound { ref var } if var == "PROBEGEN_CONFIG_TEST_NEVER_SET"
    ));
}

#[test]
fn test_unknown_field_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "typo.json", r#"{"temprature": 0.5}"#);

    let err = load_from_json(&path).unwrap_err();
    match err {
        ConfigError::ParseError { message, line, .. } => {
            assert!(message.contains("temprature"));
            assert_eq!(line, Some(1));
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_out_of_range_value_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "range.yaml", "top_p: 1.5\n");

    let err = load_from_yaml(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("top_p"));
}

#[test]
fn test_unknown_suppressed_param_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "suppress.yaml", "suppressed_params: [logit_bias]\n");

    let err = load_from_yaml(&path).unwrap_err();
    assert!(err.to_string().contains("logit_bias"));
}

#[test]
fn test_missing_file() {
    let err = load_from_yaml("/nonexistent/probegen.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::IoError { .. }));
}
