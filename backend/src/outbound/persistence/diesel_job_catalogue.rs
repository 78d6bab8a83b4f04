//! PostgreSQL-backed job and student-profile lookups.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueError, JobCatalogue, StudentProfiles};
use crate::domain::{CollegeId, JobId, JobSnapshot, StudentProfile, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{JobRow, StudentProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{jobs, student_profiles};

/// Diesel-backed implementation of [`JobCatalogue`] and [`StudentProfiles`].
#[derive(Clone)]
pub struct DieselJobCatalogue {
    pool: DbPool,
}

impl DieselJobCatalogue {
    /// Create a new catalogue with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueError {
    map_basic_pool_error(error, |message| CatalogueError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueError {
    map_basic_diesel_error(error, CatalogueError::query, CatalogueError::connection)
}

#[async_trait]
impl JobCatalogue for DieselJobCatalogue {
    async fn find_job(
        &self,
        job_id: JobId,
        college_id: CollegeId,
    ) -> Result<Option<JobSnapshot>, CatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<JobRow> = jobs::table
            .filter(jobs::id.eq(job_id.get()))
            .filter(jobs::college_id.eq(college_id.get()))
            .select(JobRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(JobSnapshot::try_from)
            .transpose()
            .map_err(CatalogueError::query)
    }
}

#[async_trait]
impl StudentProfiles for DieselJobCatalogue {
    async fn find_profile(
        &self,
        student_id: UserId,
    ) -> Result<Option<StudentProfile>, CatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StudentProfileRow> = student_profiles::table
            .filter(student_profiles::user_id.eq(student_id.get()))
            .select(StudentProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(StudentProfile::try_from)
            .transpose()
            .map_err(CatalogueError::query)
    }
}
