//! Time-boxed reservations of a student's place in a job's pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollegeId, IntentId, JobId, UserId};

/// Default lifetime of a reservation, in hours.
pub const DEFAULT_INTENT_TTL_HOURS: u32 = 24;

/// A reservation that a student wants to apply to a job.
///
/// At most one intent exists per `(job_id, student_id)`; reserving again
/// overwrites the expiry of the existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Intent identifier.
    pub id: IntentId,
    /// Reserved job.
    pub job_id: JobId,
    /// Owning student; only they may confirm.
    pub student_id: UserId,
    /// College of the job at reservation time.
    pub college_id: CollegeId,
    /// Instant after which the intent is treated as absent.
    pub expires_at: DateTime<Utc>,
    /// First reservation time.
    pub created_at: DateTime<Utc>,
}

impl Intent {
    /// Whether the reservation has lapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Upsert payload keyed on `(job_id, student_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentReservation {
    /// Reserved job.
    pub job_id: JobId,
    /// Reserving student.
    pub student_id: UserId,
    /// College of the job.
    pub college_id: CollegeId,
    /// Fresh expiry.
    pub expires_at: DateTime<Utc>,
    /// Reservation time, kept as `created_at` only on first insert.
    pub reserved_at: DateTime<Utc>,
}
