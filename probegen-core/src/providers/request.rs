//! Request assembly
//!
//! Merges the fixed generator parameters with the per-call generation count,
//! drops anything absent or suppressed, and attaches the prompt under the key
//! the endpoint variant expects.

use crate::config::GeneratorConfig;
use crate::http::{CreateParams, EndpointVariant};
use crate::protocol::{ChatMessage, Prompt};
use serde_json::{json, Value};
use thiserror::Error;

/// A prompt whose shape the endpoint variant cannot carry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {expected} for {variant} model {model}, but got {actual}")]
pub struct ShapeMismatch {
    pub variant: EndpointVariant,
    pub model: String,
    pub expected: &'static str,
    pub actual: &'static str,
}

/// Builds the parameter map for one create call
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    variant: EndpointVariant,
    model: &'a str,
    config: &'a GeneratorConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(variant: EndpointVariant, model: &'a str, config: &'a GeneratorConfig) -> Self {
        Self {
            variant,
            model,
            config,
        }
    }

    /// Assemble parameters for `generations` outputs of `prompt`
    pub fn build(&self, prompt: &Prompt, generations: usize) -> Result<CreateParams, ShapeMismatch> {
        let mut params = self.base_params(generations);

        let prompt_value = match (self.variant, prompt) {
            (EndpointVariant::Completion, Prompt::Text(text)) => Value::String(text.clone()),
            (EndpointVariant::Completion, Prompt::Conversation(_)) => {
                return Err(self.mismatch("a string", prompt));
            }
            (EndpointVariant::Chat, Prompt::Text(text)) => {
                json!([ChatMessage::user(text.as_str())])
            }
            (EndpointVariant::Chat, Prompt::Conversation(messages)) => json!(messages),
        };

        params.insert(self.variant.prompt_key().to_string(), prompt_value);
        Ok(params)
    }

    /// Configured parameters plus `n`, without absent or suppressed keys
    pub fn base_params(&self, generations: usize) -> CreateParams {
        let config = self.config;
        let candidates: [(&str, Option<Value>); 9] = [
            ("model", Some(json!(self.model))),
            ("temperature", config.temperature.map(|v| json!(v))),
            ("max_tokens", config.max_tokens.map(|v| json!(v))),
            ("n", Some(json!(generations))),
            ("top_p", config.top_p.map(|v| json!(v))),
            ("frequency_penalty", config.frequency_penalty.map(|v| json!(v))),
            ("presence_penalty", config.presence_penalty.map(|v| json!(v))),
            ("stop", config.stop.as_ref().map(|v| json!(v))),
            ("seed", config.seed.map(|v| json!(v))),
        ];

        candidates
            .into_iter()
            .filter(|(key, _)| !config.suppressed_params.contains(*key))
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect()
    }

    fn mismatch(&self, expected: &'static str, prompt: &Prompt) -> ShapeMismatch {
        ShapeMismatch {
            variant: self.variant,
            model: self.model.to_string(),
            expected,
            actual: prompt.shape(),
        }
    }
}
