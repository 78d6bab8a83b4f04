//! Job reservation HTTP handler.
//!
//! ```text
//! POST /api/v1/jobs/{job_id}/apply
//! ```

use actix_web::{post, web};

use crate::domain::ports::ReserveIntentResponse;
use crate::domain::{Error, JobId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::PrincipalContext;
use crate::inbound::http::state::HttpState;

/// Reserve the job for the calling student and return the registration link.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{job_id}/apply",
    params(("job_id" = i64, Path, description = "Job to reserve")),
    responses(
        (status = 200, description = "Intent reserved", body = ReserveIntentResponse),
        (status = 400, description = "Profile incomplete", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a student or batch not eligible", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Already applied", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "applyToJob"
)]
#[post("/jobs/{job_id}/apply")]
pub async fn apply_to_job(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ReserveIntentResponse>> {
    let job_id = JobId::new(path.into_inner())?;
    let response = state.intents.reserve(caller.principal(), job_id).await?;
    Ok(web::Json(response))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
