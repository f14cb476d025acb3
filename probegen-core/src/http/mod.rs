//! HTTP layer for talking to OpenAI-style providers
//!
//! This module owns the client handle abstraction:
//! - Endpoint variants and their paths
//! - The `ProviderClient` trait the generator calls through
//! - Status code to `ClientError` mapping

pub mod client;
pub mod error;

use crate::providers::error::ClientError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The two request/response shapes a provider exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointVariant {
    /// Message-list based chat completions
    Chat,
    /// Single-string legacy completions
    Completion,
}

impl EndpointVariant {
    /// Get the endpoint path for this variant
    pub fn endpoint(&self) -> &'static str {
        match self {
            EndpointVariant::Chat => "/chat/completions",
            EndpointVariant::Completion => "/completions",
        }
    }

    /// Request key that carries the prompt
    pub fn prompt_key(&self) -> &'static str {
        match self {
            EndpointVariant::Chat => "messages",
            EndpointVariant::Completion => "prompt",
        }
    }
}

impl fmt::Display for EndpointVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointVariant::Chat => write!(f, "chat"),
            EndpointVariant::Completion => write!(f, "completion"),
        }
    }
}

/// Outgoing parameter set for one call
pub type CreateParams = Map<String, Value>;

/// Opaque handle to a remote provider endpoint
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Create completions and return the raw response body
    async fn create(
        &self,
        variant: EndpointVariant,
        params: &CreateParams,
    ) -> Result<Value, ClientError>;

    /// List the model ids the provider serves
    async fn list_models(&self) -> Result<Vec<String>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_paths_and_keys() {
        assert_eq!(EndpointVariant::Chat.endpoint(), "/chat/completions");
        assert_eq!(EndpointVariant::Completion.endpoint(), "/completions");
        assert_eq!(EndpointVariant::Chat.prompt_key(), "messages");
        assert_eq!(EndpointVariant::Completion.prompt_key(), "prompt");
    }
}
