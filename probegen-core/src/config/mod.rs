//! Configuration module for probegen
//!
//! Generator parameters, retry and connection settings, credential handling,
//! and loading from YAML or JSON documents.

mod env;
mod error;
mod schema;
mod secrets;

pub use env::{interpolate_env_vars, read_api_key};
pub use error::{ConfigError, ValidationError, ValidationErrorKind};
pub use schema::{ConnectionConfig, GeneratorConfig, RetrySettings, REQUEST_PARAMS};
pub use secrets::SecretString;

use std::path::Path;
use tracing::debug;

/// Load generator settings from a YAML document.
///
/// `${VAR}` references are substituted before parsing and the result is
/// validated.
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, ConfigError> {
    load(path.as_ref(), |content, path| {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })
    })
}

/// Load generator settings from a JSON document
pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, ConfigError> {
    load(path.as_ref(), |content, path| {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })
    })
}

fn load<F>(path: &Path, parse: F) -> Result<GeneratorConfig, ConfigError>
where
    F: FnOnce(&str, &Path) -> Result<GeneratorConfig, ConfigError>,
{
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let content = interpolate_env_vars(&raw)?;

    let config = parse(&content, path)?;
    config.validate()?;

    debug!("Loaded generator config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
temperature: 0.2
top_p: 0.9
seed: 42
stop: ["\n\n"]
max_tokens: 64
suppressed_params: [frequency_penalty, presence_penalty]
retry_json: false
retry:
  backoff_unit_ms: 10
  max_wait_ms: 500
  max_retries: 8
connection:
  request_timeout_ms: 5000
"#;
        let config: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.suppressed_params.len(), 2);
        assert!(!config.retry_json);
        assert_eq!(config.retry.max_retries, Some(8));
        assert_eq!(config.connection.connect_timeout_ms, 10_000);
    }
}
