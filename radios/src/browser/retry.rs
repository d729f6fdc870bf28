//! Exponential backoff retry.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Default maximum number of attempts, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Retry schedule: up to `max_attempts` tries, sleeping a random duration
/// in `[0, min(initial_delay * 2^(n-1), max_delay)]` after the n-th failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy with the given attempt limit and default delays.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Policy that retries immediately.
    pub fn without_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Upper bound of the sleep after the given failed attempt (1-based).
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }

    /// Jittered sleep after the given failed attempt.
    fn backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff_ceiling(attempt).as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(0..=ceiling))
    }

    /// Run `op` until it succeeds, fails with an error `is_retryable`
    /// rejects, or the attempt limit is reached. The last error is returned.
    ///
    /// Dropping the returned future cancels both the in-flight attempt and
    /// any pending sleep.
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts && is_retryable(&err) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient,
        Fatal,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn transient(e: &TestError) -> bool {
        *e == TestError::Transient
    }

    #[test]
    fn defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(60));
    }

    #[test]
    fn ceiling_grows_exponentially_and_caps() {
        let policy = RetryPolicy::default().with_max_delay(Duration::from_secs(10));
        assert_eq!(policy.backoff_ceiling(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_ceiling(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_ceiling(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_ceiling(4), Duration::from_secs(8));
        assert_eq!(policy.backoff_ceiling(5), Duration::from_secs(10));
        assert_eq!(policy.backoff_ceiling(100), Duration::from_secs(10));
    }

    #[test]
    fn jitter_stays_under_ceiling() {
        let policy = RetryPolicy::default().with_initial_delay(Duration::from_millis(100));
        for attempt in 1..6 {
            for _ in 0..50 {
                assert!(policy.backoff(attempt) <= policy.backoff_ceiling(attempt));
            }
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::without_delay(5);

        let result = policy
            .run(
                move || async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 3 { Err(TestError::Transient) } else { Ok(n) }
                },
                transient,
            )
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::without_delay(5);

        let result: Result<(), _> = policy
            .run(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Transient)
                },
                transient,
            )
            .await;

        assert_eq!(result, Err(TestError::Transient));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn fatal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::without_delay(5);

        let result: Result<(), _> = policy
            .run(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Fatal)
                },
                transient,
            )
            .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::without_delay(0);

        let _: Result<(), _> = policy
            .run(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Transient)
                },
                transient,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(3).with_initial_delay(Duration::from_secs(1));
        let start = tokio::time::Instant::now();

        let _: Result<(), _> = policy
            .run(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Transient)
                },
                transient,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two sleeps of at most 1s and 2s.
        assert!(start.elapsed() <= Duration::from_secs(3));
    }
}
