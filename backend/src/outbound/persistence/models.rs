//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types validate ids and enum text, reporting failures as plain messages the
//! repositories wrap in their own query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, CollegeId, Intent, IntentId, JobId,
    JobSnapshot, Notification, NotificationId, StudentProfile, TransitionCandidate, UserId,
};

use super::schema::{application_intents, applications, jobs, notifications, student_profiles};

fn parse_text<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| err.to_string())
}

fn id<T, E>(raw: i64, wrap: impl FnOnce(i64) -> Result<T, E>) -> Result<T, String>
where
    E: std::fmt::Display,
{
    wrap(raw).map_err(|err| err.to_string())
}

/// Row struct for reading from the jobs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobRow {
    pub id: i64,
    pub college_id: i64,
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub domain: String,
    pub eligible_batches: Vec<i32>,
    pub registration_form_url: Option<String>,
    pub is_active: bool,
}

impl TryFrom<JobRow> for JobSnapshot {
    type Error = String;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id(row.id, JobId::new)?,
            college_id: id(row.college_id, CollegeId::new)?,
            title: row.title,
            company: row.company,
            domain: parse_text(&row.domain)?,
            job_type: parse_text(&row.job_type)?,
            is_active: row.is_active,
            eligible_batches: row.eligible_batches,
            registration_url: row.registration_form_url,
        })
    }
}

/// Row struct for reading from the student_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = student_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentProfileRow {
    pub user_id: i64,
    pub batch: Option<i32>,
    pub resume_url: Option<String>,
}

impl TryFrom<StudentProfileRow> for StudentProfile {
    type Error = String;

    fn try_from(row: StudentProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id(row.user_id, UserId::new)?,
            batch: row.batch,
            resume_url: row.resume_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Intent models
// ---------------------------------------------------------------------------

/// Row struct for reading from the application_intents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = application_intents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IntentRow {
    pub id: i64,
    pub job_id: i64,
    pub student_id: i64,
    pub college_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<IntentRow> for Intent {
    type Error = String;

    fn try_from(row: IntentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id(row.id, IntentId::new)?,
            job_id: id(row.job_id, JobId::new)?,
            student_id: id(row.student_id, UserId::new)?,
            college_id: id(row.college_id, CollegeId::new)?,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for the intent upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = application_intents)]
pub(crate) struct NewIntentRow {
    pub job_id: i64,
    pub student_id: i64,
    pub college_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Application models
// ---------------------------------------------------------------------------

/// Row struct for reading from the applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub student_id: i64,
    pub college_id: i64,
    pub status: String,
    pub resume_snapshot_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id(row.id, ApplicationId::new)?,
            job_id: id(row.job_id, JobId::new)?,
            student_id: id(row.student_id, UserId::new)?,
            college_id: id(row.college_id, CollegeId::new)?,
            status: parse_text::<ApplicationStatus>(&row.status)?,
            resume_snapshot_url: row.resume_snapshot_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Narrow projection used to validate a bulk transition.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CandidateRow {
    pub id: i64,
    pub job_id: i64,
    pub student_id: i64,
    pub status: String,
}

impl TryFrom<CandidateRow> for TransitionCandidate {
    type Error = String;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id(row.id, ApplicationId::new)?,
            job_id: id(row.job_id, JobId::new)?,
            student_id: id(row.student_id, UserId::new)?,
            status: parse_text(&row.status)?,
        })
    }
}

/// Insertable struct for new applications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub job_id: i64,
    pub student_id: i64,
    pub college_id: i64,
    pub status: &'a str,
    pub resume_snapshot_url: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notification models
// ---------------------------------------------------------------------------

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub target_id: Option<i64>,
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = String;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id(row.id, NotificationId::new)?,
            user_id: id(row.user_id, UserId::new)?,
            kind: parse_text(&row.kind)?,
            target_id: row.target_id,
            payload: row.payload,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for new notifications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub user_id: i64,
    pub kind: &'a str,
    pub target_id: Option<i64>,
    pub payload: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a crate::domain::NotificationDraft> for NewNotificationRow<'a> {
    fn from(draft: &'a crate::domain::NotificationDraft) -> Self {
        Self {
            user_id: draft.user_id.get(),
            kind: draft.kind.as_str(),
            target_id: draft.target_id,
            payload: &draft.payload,
            created_at: draft.created_at,
        }
    }
}
