//! Shared helpers for integration tests

#![allow(dead_code)]

use probegen_core::config::{GeneratorConfig, RetrySettings};
use probegen_core::providers::ProviderFamily;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Route test logs through the test harness writer; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// OpenAI family pointed at a mock server, with its key set in `env_var`
pub fn family_for(server: &MockServer, env_var: &str) -> ProviderFamily {
    std::env::set_var(env_var, "sk-test-0123456789abcdef");
    ProviderFamily::openai()
        .with_base_url(server.uri())
        .with_env_var(env_var)
}

/// Default parameters with millisecond backoff
pub fn fast_config() -> GeneratorConfig {
    GeneratorConfig {
        retry: RetrySettings {
            backoff_unit_ms: 1,
            max_wait_ms: 5,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn chat_body(contents: &[&str]) -> Value {
    let choices: Vec<Value> = contents
        .iter()
        .enumerate()
        .map(|(i, c)| {
            json!({
                "index": i,
                "message": {"role": "assistant", "content": c},
                "finish_reason": "stop"
            })
        })
        .collect();

    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": choices
    })
}

pub fn completion_body(texts: &[&str]) -> Value {
    let choices: Vec<Value> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| json!({"index": i, "text": t, "finish_reason": "stop"}))
        .collect();

    json!({
        "id": "cmpl-test",
        "object": "text_completion",
        "choices": choices
    })
}

/// JSON bodies of every request the server has seen
pub async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}
