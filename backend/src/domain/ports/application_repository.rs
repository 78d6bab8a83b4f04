//! Driven port for application persistence.
//!
//! Each mutating method is one store transaction. Adapters must leave no
//! partial result visible when a method fails.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, warn};

use crate::domain::transition;
use crate::domain::{
    Application, ApplicationId, ApplicationListQuery, ApplicationStatus, CollegeId, Error, Intent,
    JobId, ListingScope, NewApplication, Notification, NotificationDraft, TransitionCandidate,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
        /// The `(job_id, student_id)` pair already has an application.
        Duplicate => "an application already exists for this job and student",
        /// The intent being confirmed was removed before the transaction
        /// could consume it.
        IntentConsumed => "intent was consumed by another transaction",
        /// An application no longer holds the status its move was validated
        /// against.
        StaleStatus { message: String } => "application status changed concurrently: {message}",
    }
}

impl From<ApplicationRepositoryError> for Error {
    fn from(err: ApplicationRepositoryError) -> Self {
        match err {
            ApplicationRepositoryError::Duplicate => {
                Error::conflict("an application for this job already exists")
            }
            ApplicationRepositoryError::IntentConsumed => Error::not_found("intent not found"),
            ApplicationRepositoryError::StaleStatus { .. } => {
                warn!(error = %err, "status update lost a race");
                Error::conflict("an application changed status while the update was in progress")
            }
            ApplicationRepositoryError::Connection { .. } => {
                error!(error = %err, "application repository failure");
                Error::service_unavailable("application store is unavailable")
            }
            ApplicationRepositoryError::Query { .. } => {
                error!(error = %err, "application repository failure");
                Error::internal("application store query failed")
            }
        }
    }
}

/// Result of a committed confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedApplication {
    /// The inserted application.
    pub application: Application,
    /// The job-applied notification targeting it.
    pub notification: Notification,
}

/// A status change applied to a batch of applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Applications to update, each paired with the status the move was
    /// validated from.
    pub expected: Vec<(ApplicationId, ApplicationStatus)>,
    /// Status to set.
    pub status: ApplicationStatus,
    /// New `updated_at` value.
    pub updated_at: DateTime<Utc>,
    /// Notifications to insert alongside the update.
    pub notifications: Vec<NotificationDraft>,
}

impl StatusChange {
    /// Ids of the applications being updated.
    pub fn ids(&self) -> Vec<ApplicationId> {
        self.expected.iter().map(|(id, _)| *id).collect()
    }

    /// First application whose current status differs from the validated
    /// one, or from which the move is no longer legal. A row `current`
    /// cannot find counts as stale.
    pub fn first_stale(
        &self,
        current: impl Fn(ApplicationId) -> Option<ApplicationStatus>,
    ) -> Option<ApplicationId> {
        self.expected
            .iter()
            .find(|(id, expected)| match current(*id) {
                Some(now) => now != *expected || !transition::is_legal(now, self.status),
                None => true,
            })
            .map(|(id, _)| *id)
    }
}

/// Result of a committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStatusChange {
    /// Rows updated.
    pub updated: u64,
    /// Notifications inserted.
    pub notifications: Vec<Notification>,
}

/// One page of a listing plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPage {
    /// Rows on the requested page.
    pub rows: Vec<Application>,
    /// Rows matching scope and filters.
    pub total: u64,
}

/// Port for reading and mutating applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Whether `student_id` already holds an application for `job_id`.
    async fn exists_for(
        &self,
        job_id: JobId,
        student_id: UserId,
    ) -> Result<bool, ApplicationRepositoryError>;

    /// Insert `application`, delete `intent`, and insert `notification`
    /// targeting the new application, all in one transaction.
    ///
    /// A unique violation on `(job_id, student_id)` aborts with
    /// [`ApplicationRepositoryError::Duplicate`]; an intent that no longer
    /// exists aborts with [`ApplicationRepositoryError::IntentConsumed`].
    async fn confirm(
        &self,
        intent: &Intent,
        application: NewApplication,
        notification: NotificationDraft,
    ) -> Result<ConfirmedApplication, ApplicationRepositoryError>;

    /// Fetch the requested applications whose job belongs to `college_id`,
    /// resolved with a join against jobs. Foreign or missing ids are omitted.
    async fn find_transition_candidates(
        &self,
        ids: &[ApplicationId],
        college_id: CollegeId,
    ) -> Result<Vec<TransitionCandidate>, ApplicationRepositoryError>;

    /// Update every listed application and insert the notifications, in one
    /// transaction.
    ///
    /// Rows are re-read under a lock first; any row reported by
    /// [`StatusChange::first_stale`] aborts with
    /// [`ApplicationRepositoryError::StaleStatus`].
    async fn apply_status_change(
        &self,
        change: StatusChange,
    ) -> Result<AppliedStatusChange, ApplicationRepositoryError>;

    /// Fetch one application if it falls inside `scope`.
    async fn find_visible(
        &self,
        id: ApplicationId,
        scope: ListingScope,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Run a scoped, filtered, sorted, paginated listing.
    async fn list(
        &self,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, ApplicationRepositoryError>;
}
