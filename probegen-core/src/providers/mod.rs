//! Generator and provider plumbing
//!
//! This module implements the generator that attack scenarios call into, and the
//! pieces it is built from: endpoint routing, request assembly, fault
//! classification with backoff retry, response normalization, and the
//! client handle lifecycle.

pub mod error;
pub mod family;
pub mod fault;
pub mod generator;
pub mod lifecycle;
pub mod request;
pub mod response;
pub mod retry;
pub mod routing;

pub use error::{ClientError, GeneratorError, GeneratorResult};
pub use family::{ProviderFamily, OPENAI_BASE_URL};
pub use fault::{FaultClassifier, FaultKind, RetryBucket};
pub use generator::Generator;
pub use lifecycle::{ClientLifecycle, ClientState};
pub use request::{RequestBuilder, ShapeMismatch};
pub use response::ResponseExtractor;
pub use retry::{BackoffRetryController, CallOutcome, FibonacciBackoff, RetryReport};
pub use routing::{context_length, ModelRouter, CHAT_MODELS, COMPLETION_MODELS};
