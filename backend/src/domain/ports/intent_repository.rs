//! Driven port for intent persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::error;

use crate::domain::{
    Error, Intent, IntentId, IntentReservation, Notification, NotificationDraft, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by intent repository adapters.
    pub enum IntentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "intent repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "intent repository query failed: {message}",
    }
}

impl From<IntentRepositoryError> for Error {
    fn from(err: IntentRepositoryError) -> Self {
        error!(error = %err, "intent repository failure");
        match err {
            IntentRepositoryError::Connection { .. } => {
                Error::service_unavailable("intent store is unavailable")
            }
            IntentRepositoryError::Query { .. } => Error::internal("intent store query failed"),
        }
    }
}

/// Result of a committed reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedIntent {
    /// The upserted intent.
    pub intent: Intent,
    /// The apply-intent notification written in the same transaction.
    pub notification: Notification,
}

/// Port for reserving, reading, and removing intents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentRepository: Send + Sync {
    /// Upsert the intent keyed on `(job_id, student_id)` and insert
    /// `notification` targeting the intent id, in one transaction.
    ///
    /// An existing row (live or expired) keeps its id and `created_at`; only
    /// `expires_at` and `college_id` are refreshed.
    async fn reserve(
        &self,
        reservation: &IntentReservation,
        notification: NotificationDraft,
    ) -> Result<ReservedIntent, IntentRepositoryError>;

    /// Find an intent owned by `student_id`. Intents owned by anyone else are
    /// reported as absent.
    async fn find_owned(
        &self,
        intent_id: IntentId,
        student_id: UserId,
    ) -> Result<Option<Intent>, IntentRepositoryError>;

    /// Delete an intent, returning whether a row was removed.
    async fn delete(&self, intent_id: IntentId) -> Result<bool, IntentRepositoryError>;

    /// Delete every intent whose expiry is before `now`, returning the count.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, IntentRepositoryError>;
}
