//! HTTP error mapping utilities

use crate::providers::error::ClientError;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

/// Map HTTP status code and response body to a ClientError
pub fn map_http_error(status: StatusCode, body: Option<String>, request_id: Uuid) -> ClientError {
    let details = body
        .as_deref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_message(&v));

    let error_message = details
        .or(body)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

    let message = format!("{} [request_id: {}]", error_message, request_id);

    match status {
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),

        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Authentication(message),

        StatusCode::NOT_FOUND => ClientError::NotFound(message),

        StatusCode::REQUEST_TIMEOUT => ClientError::Timeout,

        StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited { message },

        status if status.is_server_error() => ClientError::Server {
            status: status.as_u16(),
            message,
        },

        _ => ClientError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract the human-readable message from an error body
fn extract_error_message(json: &Value) -> Option<String> {
    // OpenAI format: { "error": { "message": "...", "type": "...", "code": "..." } }
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
    {
        return Some(message.to_string());
    }

    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    json.get("error")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
