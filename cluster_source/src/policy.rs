//! Bounded timeout and single-retry policy shared by every source.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use cluster_source_interface::{RawPayload, ResourceKind, Result, SourceError};

/// How long a fetch may take and how often it is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Per-attempt deadline.
    pub timeout: Duration,
    /// Total attempts, including the first one. Values below 1 count as 1.
    pub attempts: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            attempts: 2,
            retry_delay: Duration::from_millis(250),
        }
    }
}

impl FetchPolicy {
    /// Run `op` under this policy. Only retryable errors are retried; the
    /// error of the last attempt is returned.
    pub async fn run<F, Fut>(&self, kind: ResourceKind, mut op: F) -> Result<RawPayload>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RawPayload>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(self.timeout)),
            };

            match result {
                Ok(payload) => return Ok(payload),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        "Fetching {} failed (attempt {}/{}): {}; retrying",
                        kind, attempt, attempts, e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn quick(attempts: u32) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_millis(50),
            attempts,
            retry_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert_eq!(policy.attempts, 2);
    }

    #[tokio::test]
    async fn test_retries_once_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = quick(2)
            .run(ResourceKind::Nodes, || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(SourceError::Connect("refused".into()))
                    } else {
                        Ok(serde_json::json!([]))
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), serde_json::json!([]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_last_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = quick(2)
            .run(ResourceKind::Info, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(SourceError::status(502, "bad gateway")) }
            })
            .await;

        assert_eq!(result.unwrap_err(), SourceError::status(502, "bad gateway"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_is_immediate() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = quick(3)
            .run(ResourceKind::Services, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(SourceError::Decode("expected value".into())) }
            })
            .await;

        assert!(matches!(result, Err(SourceError::Decode(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hung_fetch_times_out() {
        let result = quick(1)
            .run(ResourceKind::Info, || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(serde_json::json!({}))
            })
            .await;

        assert_eq!(result.unwrap_err(), SourceError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let _ = quick(0)
            .run(ResourceKind::Info, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(SourceError::Connect("refused".into())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
