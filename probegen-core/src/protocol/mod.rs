//! Protocol module for prompts and generation results
//!
//! These are the values the red-teaming harness exchanges with a generator:
//! prompts going in, ordered optional strings coming out.

pub mod types;

pub use types::{ChatMessage, GenerationResult, MessageRole, Prompt};
