//! Configuration schema structures with serde support

use super::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Request parameters that may be listed in `suppressed_params`
pub const REQUEST_PARAMS: &[&str] = &[
    "model",
    "temperature",
    "max_tokens",
    "n",
    "top_p",
    "frequency_penalty",
    "presence_penalty",
    "stop",
    "seed",
];

/// Parameter bag for one generator instance.
///
/// Every request parameter is optional; `None` means "not configured" and the
/// key is never sent to the provider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: Option<f64>,

    /// Nucleus sampling mass
    #[serde(default = "default_top_p")]
    pub top_p: Option<f64>,

    #[serde(default = "default_penalty")]
    pub frequency_penalty: Option<f64>,

    #[serde(default = "default_penalty")]
    pub presence_penalty: Option<f64>,

    /// Sampling seed, unset by default
    #[serde(default)]
    pub seed: Option<i64>,

    /// Stop sequences
    #[serde(default = "default_stop")]
    pub stop: Option<Vec<String>>,

    /// Maximum tokens per generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,

    /// Parameter keys that are never sent, even when configured
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub suppressed_params: BTreeSet<String>,

    /// Retry when the provider's response cannot be decoded
    #[serde(default = "default_true")]
    pub retry_json: bool,

    /// Context window override; known models get one from the model table
    #[serde(default)]
    pub context_len: Option<usize>,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: default_penalty(),
            presence_penalty: default_penalty(),
            seed: None,
            stop: default_stop(),
            max_tokens: default_max_tokens(),
            suppressed_params: BTreeSet::new(),
            retry_json: true,
            context_len: None,
            retry: RetrySettings::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

/// Backoff settings for transient provider faults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    /// Length of one Fibonacci step in milliseconds
    #[serde(default = "default_backoff_unit")]
    pub backoff_unit_ms: u64,

    /// Ceiling applied to any single wait, in milliseconds
    #[serde(default = "default_max_wait")]
    pub max_wait_ms: u64,

    /// Optional bound on retries. Unset means retry for as long as faults stay transient.
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Fraction (0.0 to 1.0) by which each wait may be randomly shortened
    #[serde(default)]
    pub jitter_factor: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            backoff_unit_ms: default_backoff_unit(),
            max_wait_ms: default_max_wait(),
            max_retries: None,
            jitter_factor: 0.0,
        }
    }
}

impl RetrySettings {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

// Default value functions for serde
fn default_true() -> bool { true }
fn default_temperature() -> Option<f64> { Some(0.7) }
fn default_top_p() -> Option<f64> { Some(1.0) }
fn default_penalty() -> Option<f64> { Some(0.0) }
fn default_stop() -> Option<Vec<String>> { Some(vec!["#".to_string(), ";".to_string()]) }
fn default_max_tokens() -> Option<u32> { Some(150) }
fn default_backoff_unit() -> u64 { 1000 }
fn default_max_wait() -> u64 { 70_000 }
fn default_connect_timeout() -> u64 { 10_000 }
fn default_request_timeout() -> u64 { 60_000 }

impl GeneratorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("temperature", self.temperature, 0.0, 2.0)?;
        check_range("top_p", self.top_p, 0.0, 1.0)?;
        check_range("frequency_penalty", self.frequency_penalty, -2.0, 2.0)?;
        check_range("presence_penalty", self.presence_penalty, -2.0, 2.0)?;

        if self.max_tokens == Some(0) {
            return Err(ValidationError::out_of_range(
                "max_tokens",
                "must be at least 1",
            ));
        }

        if let Some(stop) = &self.stop {
            if let Some(i) = stop.iter().position(|s| s.is_empty()) {
                return Err(ValidationError::invalid_value(
                    format!("stop[{}]", i),
                    "non-empty stop sequence",
                    "empty string",
                ));
            }
        }

        for key in &self.suppressed_params {
            if !REQUEST_PARAMS.contains(&key.as_str()) {
                return Err(ValidationError::invalid_value(
                    "suppressed_params",
                    format!("one of {}", REQUEST_PARAMS.join(", ")),
                    key.clone(),
                ));
            }
        }

        if self.context_len == Some(0) {
            return Err(ValidationError::out_of_range(
                "context_len",
                "must be at least 1",
            ));
        }

        self.retry.validate()?;
        self.connection.validate()?;
        Ok(())
    }
}

impl RetrySettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.backoff_unit_ms == 0 {
            return Err(ValidationError::out_of_range(
                "retry.backoff_unit_ms",
                "must be greater than 0",
            ));
        }

        if self.max_wait_ms < self.backoff_unit_ms {
            return Err(ValidationError::out_of_range(
                "retry.max_wait_ms",
                "must not be smaller than retry.backoff_unit_ms",
            ));
        }

        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(ValidationError::out_of_range(
                "retry.jitter_factor",
                "must be within [0, 1]",
            )
            .with_context(format!("got {}", self.jitter_factor)));
        }

        Ok(())
    }
}

impl ConnectionConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.connect_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                "connection.connect_timeout_ms",
                "must be greater than 0",
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                "connection.request_timeout_ms",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn check_range(field: &str, value: Option<f64>, min: f64, max: f64) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(ValidationError::out_of_range(
            field,
            format!("must be within [{}, {}]", min, max),
        )
        .with_context(format!("got {}", v))),
        _ => Ok(()),
    }
}
