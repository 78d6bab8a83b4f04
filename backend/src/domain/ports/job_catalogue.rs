//! Driven ports for the job and student-profile collaborators.
//!
//! Job postings and profiles are owned by the surrounding CRUD system; the
//! workflow only reads the fields captured in [`JobSnapshot`] and
//! [`StudentProfile`].

use async_trait::async_trait;
use tracing::error;

use crate::domain::{CollegeId, Error, JobId, JobSnapshot, StudentProfile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job catalogue and profile adapters.
    pub enum CatalogueError {
        /// The backing store could not be reached.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// A lookup failed during execution.
        Query { message: String } => "catalogue query failed: {message}",
    }
}

impl From<CatalogueError> for Error {
    fn from(err: CatalogueError) -> Self {
        error!(error = %err, "catalogue lookup failed");
        match err {
            CatalogueError::Connection { .. } => {
                Error::service_unavailable("job catalogue is unavailable")
            }
            CatalogueError::Query { .. } => Error::internal("job catalogue lookup failed"),
        }
    }
}

/// Read access to job postings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobCatalogue: Send + Sync {
    /// Find a job posted to `college_id`. A job posted elsewhere is reported
    /// as absent.
    async fn find_job(
        &self,
        job_id: JobId,
        college_id: CollegeId,
    ) -> Result<Option<JobSnapshot>, CatalogueError>;
}

/// Read access to student profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentProfiles: Send + Sync {
    /// Find the profile of `student_id`, if one exists.
    async fn find_profile(
        &self,
        student_id: UserId,
    ) -> Result<Option<StudentProfile>, CatalogueError>;
}
