//! Environment variable interpolation and credential lookup

use super::error::ConfigError;
use super::secrets::SecretString;
use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Substitute every `${VAR}` reference in a configuration document.
///
/// The first unset variable aborts the substitution.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    if let Some(var) = ENV_VAR_PATTERN
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .find(|name| env::var(name).is_err())
    {
        return Err(ConfigError::EnvVarNotFound { var });
    }

    let substituted = ENV_VAR_PATTERN.replace_all(content, |cap: &Captures<'_>| {
        env::var(&cap[1]).unwrap_or_default()
    });
    Ok(substituted.into_owned())
}

/// Read a provider credential from the named environment variable.
///
/// Unset and empty variables are both reported as missing.
pub fn read_api_key(var: &str) -> Result<SecretString, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::new(value)),
        _ => Err(ConfigError::EnvVarNotFound {
            var: var.to_string(),
        }),
    }
}
