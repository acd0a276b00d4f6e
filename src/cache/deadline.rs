//! Deadline Runner
//!
//! Runs a recompute on its own task and stops waiting once the deadline
//! passes. The task is detached rather than killed, so an overrunning
//! computation never holds the caller past the deadline.

use std::future::Future;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Outcome of a deadline-bounded computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deadline<T> {
    /// Finished in time with a value
    Completed(T),
    /// Still running when the deadline passed
    Exceeded,
}

impl<T> Deadline<T> {
    pub fn is_exceeded(&self) -> bool {
        matches!(self, Deadline::Exceeded)
    }
}

/// Spawns `work` and waits at most `limit` for it.
///
/// A failing or panicking computation surfaces as [`CacheError::Compute`].
pub async fn run_with_deadline<T, Fut>(limit: Duration, work: Fut) -> Result<Deadline<T>>
where
    T: Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    let handle = tokio::spawn(work);

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(Ok(value))) => Ok(Deadline::Completed(value)),
        Ok(Ok(Err(err))) => Err(CacheError::compute(err)),
        Ok(Err(join_err)) => Err(CacheError::compute(anyhow::anyhow!(
            "compute task failed: {join_err}"
        ))),
        Err(_elapsed) => Ok(Deadline::Exceeded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_completes_within_deadline() {
        let outcome = run_with_deadline(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(42)
        })
        .await
        .unwrap();

        assert_eq!(outcome, Deadline::Completed(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exceeded_leaves_work_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let outcome = run_with_deadline(Duration::from_secs(1), async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();

        assert!(outcome.is_exceeded());
        assert!(!finished.load(Ordering::SeqCst));

        // The detached task still runs to completion
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_compute_error_propagates() {
        let result: Result<Deadline<u32>> = run_with_deadline(Duration::from_secs(1), async {
            Err(anyhow::anyhow!("backend unavailable"))
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, CacheError::Compute(_)));
        assert!(err.to_string().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn test_panic_is_compute_error() {
        let result: Result<Deadline<u32>> = run_with_deadline(Duration::from_secs(1), async {
            let fail = true;
            if fail {
                panic!("boom");
            }
            Ok(0)
        })
        .await;

        assert!(matches!(result, Err(CacheError::Compute(_))));
    }
}
