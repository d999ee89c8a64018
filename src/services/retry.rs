use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;

/// Bounds `fut` by `limit`; an elapsed timer becomes [`AppError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AppError::Timeout(limit.as_millis()))?
}

/// Runs `attempt`, and runs it a second time if the first failure was
/// transient. The second result is returned as is.
pub async fn retry_once<T, F, Fut>(op: &str, mut attempt: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    match attempt().await {
        Err(e) if e.is_transient() => {
            warn!("{} failed with a transient error, retrying once: {}", op, e);
            attempt().await
        }
        other => other,
    }
}
