use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::{DaoLayerError, DaoResult};

/// Drives a storage future until it finishes or `cancel` fires.
///
/// On cancellation the in-flight future is dropped and `DaoLayerError::Cancelled`
/// is returned. A token that is already cancelled never polls `fut`.
pub async fn cancellable<T, E, F>(cancel: &CancellationToken, fut: F) -> DaoResult<T>
where
    F: Future<Output = Result<T, E>>,
    DaoLayerError: From<E>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DaoLayerError::Cancelled),
        result = fut => result.map_err(DaoLayerError::from),
    }
}
