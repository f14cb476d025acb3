//! Response normalization
//!
//! Turns a provider response body into the ordered list of generated texts.

use crate::http::EndpointVariant;
use crate::protocol::GenerationResult;
use crate::providers::error::ClientError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts generated texts for one endpoint variant
#[derive(Debug, Clone, Copy)]
pub struct ResponseExtractor {
    variant: EndpointVariant,
}

impl ResponseExtractor {
    pub fn new(variant: EndpointVariant) -> Self {
        Self { variant }
    }

    /// Texts of every returned choice, in provider order.
    ///
    /// A body without the variant's choice shape is `UnexpectedShape`, which
    /// is never retried; only bodies that are not JSON count as decode faults.
    pub fn extract(&self, raw: Value) -> Result<GenerationResult, ClientError> {
        match self.variant {
            EndpointVariant::Completion => {
                let response: CompletionResponse = parse(raw)?;
                Ok(response.choices.into_iter().map(|c| c.text).collect())
            }
            EndpointVariant::Chat => {
                let response: ChatCompletionResponse = parse(raw)?;
                Ok(response
                    .choices
                    .into_iter()
                    .map(|c| c.message.content)
                    .collect())
            }
        }
    }
}

fn parse<T: DeserializeOwned>(raw: Value) -> Result<T, ClientError> {
    serde_json::from_value(raw).map_err(|e| ClientError::UnexpectedShape(e.to_string()))
}
