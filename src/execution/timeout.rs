//! Query Timeout Module
//!
//! Enforces a hard deadline around a Kernel computation.
//!
//! ## Design
//!
//! Kernel calls have no cancellation checkpoints, so the guard cannot ask
//! them to stop. Instead the computation runs on a blocking worker thread
//! while the caller waits on a timer that is independent of the worker's
//! progress. When the timer fires first the guard drops its handle to the
//! worker and reports `TimedOut`.
//!
//! Dropping the handle *abandons* the worker: its eventual result is
//! discarded, but the thread keeps running until the Kernel returns. No
//! resources held inside the Kernel are reclaimed by the guard.

use std::time::{Duration, Instant};

use super::cache::QueryId;

/// Default limit for guarded Kernel calls
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(180);

/// A guarded computation ran past its deadline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Query '{query}' exceeded timeout of {timeout:?} (ran for {elapsed:?})")]
pub struct TimedOut {
    /// The query the computation was evaluating
    pub query: QueryId,
    /// The limit that was exceeded
    pub timeout: Duration,
    /// How long the caller waited before giving up
    pub elapsed: Duration,
}

/// Failure of a guarded computation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error(transparent)]
    TimedOut(#[from] TimedOut),

    /// The worker died before producing a result
    #[error("Computation for query '{query}' failed: {reason}")]
    Aborted { query: QueryId, reason: String },
}

/// Deadline wrapper for blocking Kernel calls.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutGuard {
    limit: Duration,
}

impl TimeoutGuard {
    pub fn new(limit: Duration) -> Self {
        TimeoutGuard { limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Run `computation` on a blocking worker, giving up after the limit.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn run<T, F>(&self, query: &QueryId, computation: F) -> Result<T, GuardError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let start = Instant::now();
        let worker = tokio::task::spawn_blocking(computation);

        match tokio::time::timeout(self.limit, worker).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(join_error)) => Err(GuardError::Aborted {
                query: query.clone(),
                reason: join_error.to_string(),
            }),
            // The JoinHandle was dropped by `timeout`, detaching the worker.
            Err(_) => Err(GuardError::TimedOut(TimedOut {
                query: query.clone(),
                timeout: self.limit,
                elapsed: start.elapsed(),
            })),
        }
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        TimeoutGuard::new(DEFAULT_QUERY_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[tokio::test]
    async fn test_completes_within_limit() {
        let guard = TimeoutGuard::new(Duration::from_secs(5));
        let result = guard.run(&QueryId::from("fast"), || 21 * 2).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_timeout_exceeded() {
        let guard = TimeoutGuard::new(Duration::from_millis(50));
        let result = guard
            .run(&QueryId::from("slow"), || {
                thread::sleep(Duration::from_millis(500));
                1
            })
            .await;

        match result {
            Err(GuardError::TimedOut(t)) => {
                assert_eq!(t.query, QueryId::from("slow"));
                assert_eq!(t.timeout, Duration::from_millis(50));
                assert!(t.elapsed >= Duration::from_millis(50));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_returns_at_deadline_not_at_completion() {
        let guard = TimeoutGuard::new(Duration::from_millis(50));
        let start = Instant::now();
        let _ = guard
            .run(&QueryId::from("slow"), || {
                thread::sleep(Duration::from_secs(2));
            })
            .await;
        // Generous margin for CI scheduling jitter
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_abandoned_worker_keeps_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let guard = TimeoutGuard::new(Duration::from_millis(20));
        let result = guard
            .run(&QueryId::from("slow"), move || {
                thread::sleep(Duration::from_millis(200));
                flag.store(true, Ordering::SeqCst);
            })
            .await;
        assert!(matches!(result, Err(GuardError::TimedOut(_))));
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_worker_is_reported() {
        let guard = TimeoutGuard::new(Duration::from_secs(5));
        let result: Result<(), _> = guard
            .run(&QueryId::from("boom"), || panic!("kernel crashed"))
            .await;
        assert!(matches!(result, Err(GuardError::Aborted { .. })));
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(TimeoutGuard::default().limit(), Duration::from_secs(180));
    }

    #[test]
    fn test_timed_out_display() {
        let err = TimedOut {
            query: QueryId::from("foo*bar"),
            timeout: Duration::from_secs(5),
            elapsed: Duration::from_secs(6),
        };
        let msg = err.to_string();
        assert!(msg.contains("foo*bar"));
        assert!(msg.contains('5'));
        assert!(msg.contains('6'));
    }
}
