//! Fault classification
//!
//! Separates "what happened" (`FaultKind`) from "what to do about it"
//! (`RetryBucket`). The retry controller only ever looks at the bucket.

use crate::providers::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What went wrong with a network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    RateLimited,
    ServerBusy,
    Timeout,
    ConnectionDropped,
    /// The response arrived but could not be decoded
    DecodeRetrySignal,
    BadRequest,
    Unclassified,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::RateLimited => "rate-limited",
            FaultKind::ServerBusy => "server-busy",
            FaultKind::Timeout => "timeout",
            FaultKind::ConnectionDropped => "connection-dropped",
            FaultKind::DecodeRetrySignal => "decode",
            FaultKind::BadRequest => "bad-request",
            FaultKind::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// Retry policy bucket for a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryBucket {
    /// Wait and try again
    Transient,
    /// Absorb into the result value
    SoftFail,
    /// Surface to the caller immediately
    Fatal,
}

/// Maps client errors to fault kinds and retry buckets
#[derive(Debug, Clone, Copy)]
pub struct FaultClassifier {
    retry_on_decode_error: bool,
}

impl FaultClassifier {
    pub fn new(retry_on_decode_error: bool) -> Self {
        Self {
            retry_on_decode_error,
        }
    }

    /// Name the kind of fault behind `error`
    pub fn kind(error: &ClientError) -> FaultKind {
        match error {
            ClientError::RateLimited { .. } => FaultKind::RateLimited,
            ClientError::Server { .. } => FaultKind::ServerBusy,
            ClientError::Timeout => FaultKind::Timeout,
            ClientError::Connection(_) => FaultKind::ConnectionDropped,
            ClientError::Decode(_) => FaultKind::DecodeRetrySignal,
            ClientError::BadRequest(_) => FaultKind::BadRequest,
            ClientError::Authentication(_)
            | ClientError::UnexpectedShape(_)
            | ClientError::NotFound(_)
            | ClientError::Status { .. }
            | ClientError::Other(_) => FaultKind::Unclassified,
        }
    }

    /// Retry bucket for a fault kind under this classifier's settings
    pub fn bucket(&self, kind: FaultKind) -> RetryBucket {
        match kind {
            FaultKind::RateLimited
            | FaultKind::ServerBusy
            | FaultKind::Timeout
            | FaultKind::ConnectionDropped => RetryBucket::Transient,
            FaultKind::DecodeRetrySignal if self.retry_on_decode_error => RetryBucket::Transient,
            FaultKind::DecodeRetrySignal => RetryBucket::Fatal,
            FaultKind::BadRequest => RetryBucket::SoftFail,
            FaultKind::Unclassified => RetryBucket::Fatal,
        }
    }

    /// Classify `error` in one step
    pub fn classify(&self, error: &ClientError) -> (FaultKind, RetryBucket) {
        let kind = Self::kind(error);
        (kind, self.bucket(kind))
    }
}
