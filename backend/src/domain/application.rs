//! Durable application records and their review status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ApplicationId, CollegeId, JobId, UserId};

/// Review status of an application.
///
/// Serialised in upper case (`APPLIED`, `SHORTLISTED`, ...), matching the
/// values stored in the `applications.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Submitted and awaiting review.
    Applied,
    /// Passed initial screening.
    Shortlisted,
    /// Invited to interview.
    Interview,
    /// Offer extended. Terminal.
    Offered,
    /// Rejected at any stage. Terminal.
    Rejected,
}

impl ApplicationStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Applied,
        Self::Shortlisted,
        Self::Interview,
        Self::Offered,
        Self::Rejected,
    ];

    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Shortlisted => "SHORTLISTED",
            Self::Interview => "INTERVIEW",
            Self::Offered => "OFFERED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalised)
            .ok_or(UnknownStatus(normalised))
    }
}

/// A confirmed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Application {
    /// Application identifier.
    pub id: ApplicationId,
    /// Job applied to.
    pub job_id: JobId,
    /// Applying student.
    pub student_id: UserId,
    /// College owning the job, copied at confirmation for scoped reads.
    pub college_id: CollegeId,
    /// Current review status.
    pub status: ApplicationStatus,
    /// Resume URL captured at confirmation time; empty when none was on file.
    pub resume_snapshot_url: String,
    /// Confirmation time.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

/// Values for a new application row; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    /// Job applied to.
    pub job_id: JobId,
    /// Applying student.
    pub student_id: UserId,
    /// College owning the job.
    pub college_id: CollegeId,
    /// Resume URL snapshot.
    pub resume_snapshot_url: String,
    /// Confirmation time, used for both timestamps.
    pub created_at: DateTime<Utc>,
}

/// An application as seen by the bulk engine: its status plus the college of
/// the job it belongs to, resolved through the jobs table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCandidate {
    /// Application identifier.
    pub id: ApplicationId,
    /// Job applied to.
    pub job_id: JobId,
    /// Student to notify.
    pub student_id: UserId,
    /// Status before the change.
    pub status: ApplicationStatus,
}
