//! Durable notification records and their type-specific payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{ApplicationId, ApplicationStatus, JobId, JobSnapshot, NotificationId, UserId};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A job was posted to the student's college.
    NewJob,
    /// A student reserved a job and is completing the external form.
    JobApplyIntent,
    /// A student's application was confirmed.
    JobApplied,
    /// A reviewer moved an application to a new status.
    ApplicationStatusUpdate,
    /// A discussion thread the user follows changed.
    DiscussionUpdate,
}

impl NotificationKind {
    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewJob => "NEW_JOB",
            Self::JobApplyIntent => "JOB_APPLY_INTENT",
            Self::JobApplied => "JOB_APPLIED",
            Self::ApplicationStatusUpdate => "APPLICATION_STATUS_UPDATE",
            Self::DiscussionUpdate => "DISCUSSION_UPDATE",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored kind string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

impl std::str::FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::NewJob,
            Self::JobApplyIntent,
            Self::JobApplied,
            Self::ApplicationStatusUpdate,
            Self::DiscussionUpdate,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s)
        .ok_or_else(|| UnknownNotificationKind(s.to_owned()))
    }
}

/// A stored notification. Only `is_read` may change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Notification kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Entity the notification points at (intent or application id).
    pub target_id: Option<i64>,
    /// Kind-specific payload.
    #[schema(value_type = Object)]
    pub payload: Value,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A notification waiting to be written inside a workflow transaction.
///
/// `target_id` is left open when the target row is created by the same
/// transaction; the store fills it in once the id is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Recipient.
    pub user_id: UserId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Target entity, when already known.
    pub target_id: Option<i64>,
    /// Kind-specific payload.
    pub payload: Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NotificationDraft {
    /// Draft an apply-intent or job-applied notification for `job`.
    #[must_use]
    pub fn for_job(
        user_id: UserId,
        kind: NotificationKind,
        job: &JobSnapshot,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            kind,
            target_id: None,
            payload: serde_json::json!({
                "job_id": job.id,
                "title": job.title,
                "company": job.company,
            }),
            created_at,
        }
    }

    /// Draft a status-update notification for the student owning
    /// `application_id`.
    #[must_use]
    pub fn for_status_change(
        user_id: UserId,
        application_id: ApplicationId,
        job_id: JobId,
        previous: ApplicationStatus,
        next: ApplicationStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            kind: NotificationKind::ApplicationStatusUpdate,
            target_id: Some(application_id.get()),
            payload: serde_json::json!({
                "application_id": application_id,
                "job_id": job_id,
                "previous_status": previous,
                "new_status": next,
            }),
            created_at,
        }
    }

    /// Fill in the target once the transaction has created it.
    #[must_use]
    pub fn targeting(mut self, target_id: i64) -> Self {
        self.target_id = Some(target_id);
        self
    }
}
