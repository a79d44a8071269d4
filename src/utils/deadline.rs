use crate::error::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;

/// Per-request limit for store calls, shared with handlers as app data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationTimeout(pub Option<Duration>);

/// Runs `fut` under an optional deadline. On expiry the future is dropped, which
/// cancels the in-flight database call, and `AppError::Timeout` is returned.
pub async fn within<T, F>(limit: Option<Duration>, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| AppError::Timeout(limit))?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_within_passes_through_result() {
        let ok = within(Some(Duration::from_secs(1)), async { Ok::<_, AppError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = within(None, async {
            Err::<i32, _>(AppError::NotFound("gone".into()))
        })
        .await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_within_times_out() {
        let result = within(Some(Duration::from_millis(10)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}
