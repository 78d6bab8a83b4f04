//! Builders for principals, jobs and profiles used across tests.

use crate::domain::{
    CollegeId, JobDomain, JobId, JobSnapshot, Principal, Role, StudentProfile, UserId,
};

/// Wrap a raw id, panicking on non-positive fixtures.
#[must_use]
pub fn user(id: i64) -> UserId {
    match UserId::new(id) {
        Ok(value) => value,
        Err(err) => panic!("fixture ids are positive: {err}"),
    }
}

/// Wrap a raw college id.
#[must_use]
pub fn college(id: i64) -> CollegeId {
    match CollegeId::new(id) {
        Ok(value) => value,
        Err(err) => panic!("fixture ids are positive: {err}"),
    }
}

/// Wrap a raw job id.
#[must_use]
pub fn job_id(id: i64) -> JobId {
    match JobId::new(id) {
        Ok(value) => value,
        Err(err) => panic!("fixture ids are positive: {err}"),
    }
}

/// A student enrolled at `college_id`.
#[must_use]
pub fn student(id: i64, college_id: i64) -> Principal {
    Principal::new(user(id), Role::Student, Some(college(college_id)))
}

/// A college admin managing `college_id`.
#[must_use]
pub fn college_admin(id: i64, college_id: i64) -> Principal {
    Principal::new(user(id), Role::CollegeAdmin, Some(college(college_id)))
}

/// A platform admin.
#[must_use]
pub fn platform_admin(id: i64) -> Principal {
    Principal::new(user(id), Role::Admin, None)
}

/// An active full-time backend job open to the 2026 batch.
#[must_use]
pub fn active_job(id: i64, college_id: i64) -> JobSnapshot {
    JobSnapshot {
        id: job_id(id),
        college_id: college(college_id),
        title: format!("Backend Engineer {id}"),
        company: "Acme Systems".to_owned(),
        domain: JobDomain::Backend,
        job_type: crate::domain::JobType::FullTime,
        is_active: true,
        eligible_batches: vec![2026],
        registration_url: Some(format!("https://forms.example.test/jobs/{id}")),
    }
}

/// A profile in the 2026 batch with a resume on file.
#[must_use]
pub fn complete_profile(student_id: i64) -> StudentProfile {
    StudentProfile {
        user_id: user(student_id),
        batch: Some(2026),
        resume_url: Some(format!("https://files.example.test/resumes/{student_id}.pdf")),
    }
}
