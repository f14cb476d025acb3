//! Probegen Core Library
//!
//! Generator adapters for red-teaming OpenAI-style LLM endpoints: pick the chat or
//! completion API for a model, send prompts with provider-side retry, and hand
//! back the generated texts.

pub mod config;
pub mod http;
pub mod protocol;
pub mod providers;

pub use config::{GeneratorConfig, RetrySettings};
pub use http::EndpointVariant;
pub use protocol::{ChatMessage, GenerationResult, MessageRole, Prompt};
pub use providers::{Generator, GeneratorError, ProviderFamily};

/// Returns the version of the Probegen Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
