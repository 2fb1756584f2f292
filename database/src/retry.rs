use std::time::Duration;

use tokio::time::sleep;

use crate::error::StoreError;

/// Bounded retry with exponential backoff for transient storage faults.
///
/// Only errors classified transient are retried; a failed write surfaces
/// immediately, since replaying a non-idempotent statement needs the same
/// atomicity guard as the statement itself, not a blind retry. Wrap
/// idempotent reads only.
pub async fn retry_with_backoff<F, T>(
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T, StoreError>
where
    F: FnMut() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T, StoreError>> + Send>>,
{
    let mut delay = initial_delay;

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempt < max_retries => {
                tracing::warn!(
                    "attempt {} failed: {}. retrying in {:?}",
                    attempt + 1,
                    e,
                    delay
                );
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) if e.is_transient() => {
                return Err(StoreError::RetryExhausted(e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result = retry_with_backoff(
            move || {
                let counter = counter.clone();
                Box::pin(async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(StoreError::Connection("refused".into()))
                    } else {
                        Ok(42)
                    }
                })
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_errors_surface_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<i64, _> = retry_with_backoff(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Err::<i64, _>(StoreError::NoOpenRound) })
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert!(matches!(result, Err(StoreError::NoOpenRound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_is_reported() {
        let result: Result<i64, _> = retry_with_backoff(
            || Box::pin(async { Err::<i64, _>(StoreError::Connection("refused".into())) }),
            2,
            Duration::from_millis(1),
        )
        .await;

        assert!(matches!(result, Err(StoreError::RetryExhausted(_))));
    }
}
