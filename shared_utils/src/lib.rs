//! Retry helpers for the database calls made by the server functions.

use std::str::FromStr;
use std::time::Duration;

use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{error, warn};

pub const INITIAL_DELAY_VAR: &str = "DB_RETRY_INITIAL_MS";
pub const MAX_DELAY_VAR: &str = "DB_RETRY_MAX_DELAY_SECS";
pub const MAX_RETRIES_VAR: &str = "DB_RETRY_MAX_RETRIES";

/// Configuration for retry behavior when invoking asynchronous operations.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub initial_delay_millis: u64,
    pub max_delay_secs: u64,
    pub max_retries: u32,
}

impl RetryConfig {
    #[must_use]
    pub fn new(initial_delay_millis: u64, max_delay_secs: u64, max_retries: u32) -> Self {
        Self {
            initial_delay_millis,
            max_delay_secs,
            max_retries,
        }
    }

    /// Reads the retry settings from the process environment. Missing or
    /// unparsable values keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RetryConfig::from_env`] with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            initial_delay_millis: read(&lookup, INITIAL_DELAY_VAR)
                .unwrap_or(defaults.initial_delay_millis),
            max_delay_secs: read(&lookup, MAX_DELAY_VAR).unwrap_or(defaults.max_delay_secs),
            max_retries: read(&lookup, MAX_RETRIES_VAR).unwrap_or(defaults.max_retries),
        }
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> + Clone {
        ExponentialBackoff::from_millis(self.initial_delay_millis)
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .take(self.max_retries as usize)
    }
}

fn read<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_millis: 50,
            max_delay_secs: 2,
            max_retries: 3,
        }
    }
}

/// Execute an asynchronous operation with retry/backoff semantics.
///
/// `context` is included in log messages to provide call-site visibility.
pub async fn retry_async<F, Fut, T, E>(
    context: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    let strategy = config.strategy();
    let result = Retry::spawn(strategy, || {
        let fut = operation();
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                Err(err) => {
                    warn!(error = ?err, retry_context = context, "Operation failed; retrying");
                    Err(err)
                }
            }
        }
    })
    .await;

    if let Err(err) = &result {
        error!(
            error = ?err,
            retry_context = context,
            "Operation failed after exhausting retries"
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn succeeds_after_retries() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let result = retry_async("test_success", RetryConfig::default(), move || {
                let tracker = tracker.clone();
                async move {
                    let current = tracker.fetch_add(1, Ordering::SeqCst);
                    if current < 2 {
                        Err::<_, &'static str>("fail")
                    } else {
                        Ok::<_, &'static str>("ok")
                    }
                }
            })
            .await;

            assert_eq!(result.unwrap(), "ok");
            assert_eq!(attempts.load(Ordering::SeqCst), 3);
        });
    }

    #[test]
    fn returns_error_after_exhausting_retries() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let config = RetryConfig::default();
            let result: Result<(), &str> = retry_async("test_failure", config, move || {
                let tracker = tracker.clone();
                async move {
                    tracker.fetch_add(1, Ordering::SeqCst);
                    Err("nope")
                }
            })
            .await;

            assert!(result.is_err());
            assert_eq!(
                attempts.load(Ordering::SeqCst),
                config.max_retries as usize + 1
            );
        });
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = RetryConfig::from_lookup(|key| match key {
            INITIAL_DELAY_VAR => Some("100".to_owned()),
            MAX_DELAY_VAR => Some(" 5 ".to_owned()),
            MAX_RETRIES_VAR => Some("7".to_owned()),
            _ => None,
        });
        assert_eq!(config.initial_delay_millis, 100);
        assert_eq!(config.max_delay_secs, 5);
        assert_eq!(config.max_retries, 7);
    }

    #[test]
    fn lookup_falls_back_on_missing_or_garbage() {
        let config = RetryConfig::from_lookup(|key| match key {
            MAX_RETRIES_VAR => Some("lots".to_owned()),
            _ => None,
        });
        let defaults = RetryConfig::default();
        assert_eq!(config.initial_delay_millis, defaults.initial_delay_millis);
        assert_eq!(config.max_delay_secs, defaults.max_delay_secs);
        assert_eq!(config.max_retries, defaults.max_retries);
    }

    #[test]
    fn retries_are_parsed_like_the_delays() {
        let config = RetryConfig::from_lookup(|key| match key {
            MAX_RETRIES_VAR => Some(" 9 ".to_owned()),
            MAX_DELAY_VAR => Some("-1".to_owned()),
            _ => None,
        });
        assert_eq!(config.max_retries, 9);
        assert_eq!(config.max_delay_secs, RetryConfig::default().max_delay_secs);
    }

    #[test]
    fn honors_custom_config() {
        tokio_test::block_on(async {
            let config = RetryConfig::new(10, 1, 5);
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let _ = retry_async("custom_config", config, move || {
                let tracker = tracker.clone();
                async move {
                    tracker.fetch_add(1, Ordering::SeqCst);
                    Err::<(), &str>("fail")
                }
            })
            .await;

            assert_eq!(
                attempts.load(Ordering::SeqCst),
                config.max_retries as usize + 1
            );
        });
    }
}
