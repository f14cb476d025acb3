//! API key wrapper that never prints its value

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// Provider credential. `Debug` and `Display` both print `[REDACTED]`.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for building the Authorization header
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Enough of the key to tell two keys apart in logs: `sk-...cdef`
    pub fn partial_redact(&self) -> String {
        let key = self.0.as_str();
        if key.is_empty() {
            return "[EMPTY]".to_string();
        }
        if key.len() <= 8 || !key.is_ascii() {
            return REDACTED.to_string();
        }

        let (head, tail) = if key.starts_with("sk-") { (3, 4) } else { (2, 2) };
        format!("{}...{}", &key[..head], &key[key.len() - tail..])
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_never_leaks() {
        let key = SecretString::new("sk-1234567890abcdef");
        assert_eq!(key.to_string(), REDACTED);
        assert_eq!(format!("{:?}", key), REDACTED);
        assert_eq!(key.expose_secret(), "sk-1234567890abcdef");
    }

    #[test]
    fn test_partial_redaction() {
        assert_eq!(SecretString::new("").partial_redact(), "[EMPTY]");
        assert_eq!(SecretString::new("short").partial_redact(), REDACTED);
        assert_eq!(
            SecretString::new("sk-1234567890abcdef").partial_redact(),
            "sk-...cdef"
        );
        assert_eq!(
            SecretString::new("nvapi-abcdefghij").partial_redact(),
            "nv...ij"
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = SecretString::new("sk-serialized-key");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"sk-serialized-key\"");
    }
}
