//! Retry policy with exponential backoff.
//!
//! Bounded by a hard attempt ceiling independent of configuration so a
//! misconfigured budget cannot stretch one extraction into minutes.

use std::future::Future;
use std::time::Duration;

use crate::config::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
use crate::error::{AiError, ErrorKind};

/// Upper bound on attempts regardless of configuration.
pub const ATTEMPTS_CEILING: u32 = 10;

/// Kinds that never warrant a second attempt under the default policy.
///
/// RateLimit is deliberately absent (throttled calls are retried after
/// backoff) while Timeout is present (a timed-out call already consumed its
/// full wall-clock budget). Preserved as-is from production behavior.
const DEFAULT_NON_RETRYABLE: &[ErrorKind] = &[
    ErrorKind::Authentication,
    ErrorKind::Validation,
    ErrorKind::Timeout,
];

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub non_retryable: Vec<ErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            non_retryable: DEFAULT_NON_RETRYABLE.to_vec(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Self::default()
        }
    }

    /// Whether `error` observed on zero-based `attempt` warrants another try.
    pub fn should_retry(&self, error: &AiError, attempt: u32) -> bool {
        if self.non_retryable.contains(&error.kind()) {
            return false;
        }
        attempt < self.max_attempts.saturating_sub(1)
    }

    /// Backoff after `attempt`: `base_delay * 2^attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `op` under `policy`, sleeping between failed attempts.
///
/// Re-raises the last error once retries are exhausted or the error is
/// non-retryable. The sleep is an async suspension; concurrent runs are
/// unaffected by one another's backoff.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, AiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let budget = policy.max_attempts.clamp(1, ATTEMPTS_CEILING);
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt + 1 >= budget || !policy.should_retry(&error, attempt) {
                    return Err(error);
                }
                let delay = policy.delay(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn retryable_errors_are_retried_below_the_attempt_bound() {
        let policy = fast_policy(3);
        let error = AiError::Network("connection reset".into());
        for attempt in 0..2 {
            assert!(policy.should_retry(&error, attempt));
        }
    }

    #[test]
    fn no_retry_at_or_past_the_attempt_bound_for_any_kind() {
        let policy = fast_policy(3);
        for error in [
            AiError::Network("reset".into()),
            AiError::RateLimit("throttled".into()),
            AiError::Unknown("odd".into()),
        ] {
            assert!(!policy.should_retry(&error, 2));
            assert!(!policy.should_retry(&error, 7));
        }
    }

    #[test]
    fn non_retryable_kinds_short_circuit() {
        let policy = fast_policy(10);
        for error in [
            AiError::Authentication("bad key".into()),
            AiError::Validation("malformed".into()),
            AiError::Timeout("20s".into()),
        ] {
            assert!(!policy.should_retry(&error, 0));
        }
    }

    #[test]
    fn rate_limit_is_retryable_by_default() {
        // Deliberate asymmetry with Timeout; see DEFAULT_NON_RETRYABLE.
        let policy = fast_policy(3);
        assert!(policy.should_retry(&AiError::RateLimit("throttled".into()), 0));
    }

    #[test]
    fn delay_doubles_from_the_base() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let expected = [1000u64, 2000, 4000, 8000, 16000, 32000];
        for (attempt, millis) in expected.iter().enumerate() {
            assert_eq!(
                policy.delay(attempt as u32),
                Duration::from_millis(*millis),
                "attempt {attempt}"
            );
        }
    }

    #[tokio::test]
    async fn succeeds_after_two_failures_on_the_third_invocation() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_retry(&fast_policy(3), move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(AiError::Network("connection reset".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_causes_exactly_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), AiError> = with_retry(&fast_policy(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AiError::Timeout("deadline".into()))
            }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Timeout);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_re_raise_the_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), AiError> = with_retry(&fast_policy(3), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AiError::Network("still down".into()))
            }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Network);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn attempt_ceiling_caps_misconfigured_budgets() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), AiError> = with_retry(&fast_policy(50), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AiError::Network("still down".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), ATTEMPTS_CEILING);
    }
}
