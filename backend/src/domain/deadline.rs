//! Bounded deadlines for store and feed calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::Error;

/// Default bound on one store transaction.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Default bound on one feed push.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(1);

/// Time limits applied by the workflow services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Bound on each store call, including whole transactions.
    pub transaction: Duration,
    /// Bound on each feed push.
    pub feed: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            transaction: DEFAULT_TRANSACTION_TIMEOUT,
            feed: DEFAULT_FEED_TIMEOUT,
        }
    }
}

/// Await `fut` for at most `limit`.
///
/// Port errors convert into domain errors. An elapsed deadline drops the
/// in-flight future, which rolls back any open transaction, and surfaces as
/// [`super::ErrorCode::ServiceUnavailable`].
pub async fn within<T, E, Fut>(
    limit: Duration,
    operation: &'static str,
    fut: Fut,
) -> Result<T, Error>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<Error>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_elapsed) => {
            warn!(
                operation,
                timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                "store call exceeded its deadline"
            );
            Err(Error::service_unavailable(format!("{operation} timed out")))
        }
    }
}
