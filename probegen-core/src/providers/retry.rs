//! Backoff and retry for provider calls
//!
//! Transient faults are retried after Fibonacci-spaced waits, each capped at
//! a configured ceiling. There is no attempt limit unless the deployment sets
//! `max_retries`. Bad requests short-circuit into a soft-failure outcome and
//! everything else is returned to the caller on first sight.

use crate::config::{GeneratorConfig, RetrySettings};
use crate::providers::error::{ClientError, GeneratorError};
use crate::providers::fault::{FaultClassifier, RetryBucket};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Fibonacci wait sequence: `unit` × 1, 1, 2, 3, 5, 8, … capped at `max_wait`
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    unit: Duration,
    max_wait: Duration,
    prev: u64,
    curr: u64,
}

impl FibonacciBackoff {
    pub fn new(unit: Duration, max_wait: Duration) -> Self {
        Self {
            unit,
            max_wait,
            prev: 0,
            curr: 1,
        }
    }

    /// The next wait in the sequence
    pub fn next_wait(&mut self) -> Duration {
        let steps = u32::try_from(self.curr).unwrap_or(u32::MAX);
        let wait = self
            .unit
            .checked_mul(steps)
            .map_or(self.max_wait, |w| w.min(self.max_wait));

        let next = self.prev.saturating_add(self.curr);
        self.prev = self.curr;
        self.curr = next;

        wait
    }
}

impl Iterator for FibonacciBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_wait())
    }
}

/// How a retried call ended, when it did not end in an error
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    /// The call succeeded
    Success(T),
    /// The provider rejected the request; not retried
    Rejected(ClientError),
}

/// Result of a retry operation
#[derive(Debug, Clone, PartialEq)]
pub struct RetryReport<T> {
    pub outcome: CallOutcome<T>,

    /// Waits slept before each retry, in order
    pub waits: Vec<Duration>,
}

impl<T> RetryReport<T> {
    /// Number of retries performed
    pub fn retries(&self) -> usize {
        self.waits.len()
    }

    /// Total time spent waiting
    pub fn total_wait(&self) -> Duration {
        self.waits.iter().sum()
    }
}

/// Wraps a network call with classified retry
#[derive(Debug, Clone)]
pub struct BackoffRetryController {
    settings: RetrySettings,
    classifier: FaultClassifier,
}

impl BackoffRetryController {
    pub fn new(settings: RetrySettings, classifier: FaultClassifier) -> Self {
        Self {
            settings,
            classifier,
        }
    }

    /// Controller for a generator's retry settings and `retry_json` flag
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.retry.clone(), FaultClassifier::new(config.retry_json))
    }

    pub fn settings(&self) -> &RetrySettings {
        &self.settings
    }

    /// Run `operation` until it succeeds or fails with a non-transient fault
    pub async fn execute<F, T, Fut>(&self, mut operation: F) -> Result<RetryReport<T>, GeneratorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut backoff =
            FibonacciBackoff::new(self.settings.backoff_unit(), self.settings.max_wait());
        let mut waits: Vec<Duration> = Vec::new();

        loop {
            let error = match operation().await {
                Ok(value) => {
                    if !waits.is_empty() {
                        debug!("Provider call succeeded after {} retries", waits.len());
                    }
                    return Ok(RetryReport {
                        outcome: CallOutcome::Success(value),
                        waits,
                    });
                }
                Err(error) => error,
            };

            let (kind, bucket) = self.classifier.classify(&error);
            match bucket {
                RetryBucket::SoftFail => {
                    return Ok(RetryReport {
                        outcome: CallOutcome::Rejected(error),
                        waits,
                    });
                }
                RetryBucket::Fatal => {
                    return Err(GeneratorError::Provider {
                        kind,
                        source: error,
                    });
                }
                RetryBucket::Transient => {}
            }

            let retries = u32::try_from(waits.len()).unwrap_or(u32::MAX);
            if let Some(max_retries) = self.settings.max_retries {
                if retries >= max_retries {
                    warn!("Giving up on {} fault after {} retries", kind, retries);
                    return Err(GeneratorError::RetriesExhausted {
                        retries,
                        waited: waits.iter().sum(),
                        source: error,
                    });
                }
            }

            let wait = self.jitter(backoff.next_wait());
            warn!(
                "Transient {} fault (retry {} in {:?}): {}",
                kind,
                retries + 1,
                wait,
                error
            );

            tokio::time::sleep(wait).await;
            waits.push(wait);
        }
    }

    fn jitter(&self, wait: Duration) -> Duration {
        if self.settings.jitter_factor > 0.0 {
            let cut = rand::thread_rng().gen_range(0.0..=self.settings.jitter_factor);
            wait.mul_f64(1.0 - cut)
        } else {
            wait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_settings() -> RetrySettings {
        RetrySettings {
            backoff_unit_ms: 1,
            max_wait_ms: 5,
            max_retries: None,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn test_fibonacci_sequence() {
        let waits: Vec<u64> = FibonacciBackoff::new(Duration::from_secs(1), Duration::from_secs(70))
            .take(12)
            .map(|d| d.as_secs())
            .collect();
        assert_eq!(waits, vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 70, 70]);
    }

    #[test]
    fn test_fibonacci_never_overflows() {
        let mut backoff = FibonacciBackoff::new(Duration::from_millis(1), Duration::from_secs(1));
        let last = backoff.by_ref().take(500).last().unwrap();
        assert_eq!(last, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_success_without_retry() {
        let controller = BackoffRetryController::new(fast_settings(), FaultClassifier::new(true));
        let report = controller
            .execute(|| async { Ok::<_, ClientError>(42) })
            .await
            .unwrap();

        assert_eq!(report.outcome, CallOutcome::Success(42));
        assert_eq!(report.retries(), 0);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let controller = BackoffRetryController::new(fast_settings(), FaultClassifier::new(true));
        let calls = Cell::new(0);

        let report = controller
            .execute(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 3 {
                        Err(ClientError::Timeout)
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(report.outcome, CallOutcome::Success("done"));
        assert_eq!(report.retries(), 3);
        assert_eq!(
            report.waits,
            vec![
                Duration::from_millis(1),
                Duration::from_millis(1),
                Duration::from_millis(2)
            ]
        );
        assert_eq!(report.total_wait(), Duration::from_millis(4));
    }

    #[tokio::test]
    async fn test_jitter_only_shortens() {
        let settings = RetrySettings {
            backoff_unit_ms: 2,
            max_wait_ms: 4,
            max_retries: Some(4),
            jitter_factor: 0.5,
        };
        let controller = BackoffRetryController::new(settings, FaultClassifier::new(true));
        let result = controller
            .execute(|| async { Err::<(), _>(ClientError::Timeout) })
            .await;

        match result {
            Err(GeneratorError::RetriesExhausted { retries, waited, .. }) => {
                assert_eq!(retries, 4);
                // unjittered waits: 2 + 2 + 4 + 4
                assert!(waited <= Duration::from_millis(12));
                assert!(waited >= Duration::from_millis(6));
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
    }
}
