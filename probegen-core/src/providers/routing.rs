//! Model routing: deciding which endpoint variant a model name needs
//!
//! The decision is made once when a generator is built and stored on it;
//! nothing on the call path looks at the model name again.

use crate::http::EndpointVariant;
use crate::providers::error::GeneratorError;
use crate::providers::family::ProviderFamily;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Models served by the chat completions endpoint.
///
/// `gpt-4-0613` is absent on purpose: it resolves through the dated
/// snapshot rule to the completion endpoint.
pub const CHAT_MODELS: &[&str] = &[
    "gpt-4",
    "gpt-4-turbo",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4-turbo-preview",
    "gpt-3.5-turbo",
    "gpt-4-32k",
    "gpt-4-0125-preview",
    "gpt-4-1106-preview",
    "gpt-4-vision-preview",
    "gpt-4-1106-vision-preview",
    "gpt-4-32k-0613",
    "gpt-3.5-turbo-0125",
    "gpt-3.5-turbo-1106",
    "gpt-3.5-turbo-16k",
    "gpt-3.5-turbo-0613",
    "gpt-3.5-turbo-16k-0613",
];

/// Models served by the legacy completions endpoint
pub const COMPLETION_MODELS: &[&str] = &[
    "gpt-3.5-turbo-instruct",
    "davinci-002",
    "babbage-002",
    "davinci-instruct-beta",
];

/// Context window sizes of known models
const CONTEXT_LENGTHS: &[(&str, usize)] = &[
    ("gpt-3.5-turbo-0125", 16385),
    ("gpt-3.5-turbo", 16385),
    ("gpt-3.5-turbo-1106", 16385),
    ("gpt-3.5-turbo-instruct", 4096),
    ("gpt-3.5-turbo-16k", 16385),
    ("gpt-3.5-turbo-0613", 4096),
    ("gpt-3.5-turbo-16k-0613", 16385),
    ("babbage-002", 16384),
    ("davinci-002", 16384),
    ("gpt-4-turbo", 128000),
    ("gpt-4-turbo-2024-04-09", 128000),
    ("gpt-4-turbo-preview", 128000),
    ("gpt-4-0125-preview", 128000),
    ("gpt-4-1106-preview", 128000),
    ("gpt-4-vision-preview", 128000),
    ("gpt-4-1106-vision-preview", 128000),
    ("gpt-4", 8192),
    ("gpt-4-0613", 8192),
    ("gpt-4-32k", 32768),
    ("gpt-4-32k-0613", 32768),
];

// Snapshot names carry a trailing -MMDD
static DATED_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.+-[01][0-9][0-3][0-9]$").expect("dated suffix pattern is a valid regex")
});

/// Context window of a known model
pub fn context_length(model: &str) -> Option<usize> {
    CONTEXT_LENGTHS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, len)| *len)
}

/// Resolves model names to endpoint variants
#[derive(Debug, Clone)]
pub struct ModelRouter {
    chat_models: Vec<String>,
    completion_models: Vec<String>,
    fallback: Option<EndpointVariant>,
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRouter {
    /// Router over the known OpenAI model tables
    pub fn new() -> Self {
        Self {
            chat_models: CHAT_MODELS.iter().map(|m| m.to_string()).collect(),
            completion_models: COMPLETION_MODELS.iter().map(|m| m.to_string()).collect(),
            fallback: None,
        }
    }

    /// Router configured for a provider family
    pub fn for_family(family: &ProviderFamily) -> Self {
        Self::new().with_fallback(family.fallback_variant)
    }

    /// Variant to use for names matching no rule
    pub fn with_fallback(mut self, fallback: Option<EndpointVariant>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Register an additional chat model
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_models.push(model.into());
        self
    }

    /// Register an additional completion model
    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_models.push(model.into());
        self
    }

    /// Decide the endpoint variant for `model`.
    ///
    /// Rules, first match wins:
    /// 1. known completion model
    /// 2. known chat model
    /// 3. a chat model name plus a `-MMDD` snapshot suffix, which goes to the
    ///    completion endpoint
    /// 4. the fallback variant, if any
    pub fn resolve(&self, family: &str, model: &str) -> Result<EndpointVariant, GeneratorError> {
        let variant = if self.is_completion_model(model) {
            Some(EndpointVariant::Completion)
        } else if self.is_chat_model(model) {
            Some(EndpointVariant::Chat)
        } else if self.is_dated_chat_snapshot(model) {
            Some(EndpointVariant::Completion)
        } else {
            self.fallback
        };

        match variant {
            Some(variant) => {
                debug!("Routing {} model '{}' to the {} endpoint", family, model, variant);
                Ok(variant)
            }
            None => Err(GeneratorError::UnsupportedEndpoint {
                family: family.to_string(),
                model: model.to_string(),
            }),
        }
    }

    fn is_chat_model(&self, model: &str) -> bool {
        self.chat_models.iter().any(|m| m == model)
    }

    fn is_completion_model(&self, model: &str) -> bool {
        self.completion_models.iter().any(|m| m == model)
    }

    fn is_dated_chat_snapshot(&self, model: &str) -> bool {
        match model.rsplit_once('-') {
            Some((base, _)) => self.is_chat_model(base) && DATED_SUFFIX.is_match(model),
            None => false,
        }
    }
}
