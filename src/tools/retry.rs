//! Bounded exponential backoff with a degraded fallback result.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retries an operation on transient failures.
///
/// Exhausting the budget is not an error: the caller gets `T::default()`,
/// trading completeness for availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts. Zero behaves like one.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Pause after the `attempt`-th failure (1-based): `min(base * 2^attempt, max)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `operation`, retrying while `is_transient` says so.
    ///
    /// Non-transient errors are returned immediately.
    pub async fn run<T, E, F, Fut, C>(
        &self,
        operation_name: &str,
        mut operation: F,
        is_transient: C,
    ) -> Result<T, E>
    where
        T: Default,
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
    {
        let attempts = self.max_retries.max(1);
        let mut attempt = 0;

        while attempt < attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) => {
                    attempt += 1;
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        "{}: {}, retrying in {:?} (attempt {}/{})",
                        operation_name, e, delay, attempt, attempts
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }
            }
        }

        warn!(
            "{}: giving up after {} attempts, returning empty result",
            operation_name, attempts
        );
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SongVocabError;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_secs(2), Duration::from_secs(10))
    }

    #[test]
    fn test_delay_schedule() {
        let policy = policy();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_empty_result() {
        let calls = Mutex::new(Vec::new());
        let start = Instant::now();

        let result: Result<Vec<String>, SongVocabError> = policy()
            .run(
                "search",
                || {
                    calls.lock().unwrap().push(start.elapsed());
                    async { Err(SongVocabError::RateLimited("202".to_string())) }
                },
                SongVocabError::is_transient,
            )
            .await;

        assert!(result.unwrap().is_empty());
        let calls = calls.into_inner().unwrap();
        assert_eq!(
            calls,
            vec![Duration::ZERO, Duration::from_secs(4), Duration::from_secs(12)]
        );
        // The last failure still pauses 10 seconds before giving up.
        assert_eq!(start.elapsed(), Duration::from_secs(22));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_propagates_immediately() {
        let mut calls = 0;
        let result: Result<Vec<String>, SongVocabError> = policy()
            .run(
                "search",
                || {
                    calls += 1;
                    async { Err(SongVocabError::Search("parse failure".to_string())) }
                },
                SongVocabError::is_transient,
            )
            .await;

        assert!(matches!(result, Err(SongVocabError::Search(_))));
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let mut calls = 0;
        let result: Result<Vec<u32>, SongVocabError> = policy()
            .run(
                "search",
                || {
                    calls += 1;
                    let failing = calls == 1;
                    async move {
                        if failing {
                            Err(SongVocabError::RateLimited("429".to_string()))
                        } else {
                            Ok(vec![7])
                        }
                    }
                },
                SongVocabError::is_transient,
            )
            .await;

        assert_eq!(result.unwrap(), vec![7]);
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_still_attempts_once() {
        let mut calls = 0;
        let policy = RetryPolicy::new(0, Duration::from_secs(1), Duration::from_secs(1));
        let result: Result<u32, SongVocabError> = policy
            .run(
                "op",
                || {
                    calls += 1;
                    async { Ok(5) }
                },
                SongVocabError::is_transient,
            )
            .await;
        assert_eq!(result.unwrap(), 5);
        assert_eq!(calls, 1);
    }
}
