//! Application workflow HTTP handlers.
//!
//! ```text
//! POST  /api/v1/applications/{intent_id}/confirm
//! PATCH /api/v1/applications/status/bulk
//! GET   /api/v1/applications
//! GET   /api/v1/applications/{id}
//! ```

use actix_web::{get, patch, post, web};
use pagination::Paginated;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::{
    BulkTransitionRequest, BulkTransitionResponse, ConfirmApplicationResponse,
};
use crate::domain::{Application, ApplicationId, Error, IntentId, ListingRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::PrincipalContext;
use crate::inbound::http::schemas::ApplicationPageSchema;
use crate::inbound::http::state::HttpState;

/// Query string accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListApplicationsParams {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 20).
    pub limit: Option<u32>,
    /// Exact status, e.g. `SHORTLISTED`.
    pub status: Option<String>,
    /// Restrict to one job.
    pub job_id: Option<i64>,
    /// Job domain, e.g. `BACKEND`.
    pub job_domain: Option<String>,
    /// Job type: `INTERN`, `FTE` or `INTERN_PPO`.
    pub job_type: Option<String>,
    /// Case-insensitive match on student name, job title or company.
    pub search: Option<String>,
    /// `created_at` (default) or `status`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_dir: Option<String>,
}

impl From<ListApplicationsParams> for ListingRequest {
    fn from(params: ListApplicationsParams) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            status: params.status,
            job_id: params.job_id,
            job_domain: params.job_domain,
            job_type: params.job_type,
            search: params.search,
            sort_by: params.sort_by,
            sort_dir: params.sort_dir,
        }
    }
}

/// Convert the caller's intent into an application.
#[utoipa::path(
    post,
    path = "/api/v1/applications/{intent_id}/confirm",
    params(("intent_id" = i64, Path, description = "Intent returned by the apply call")),
    responses(
        (status = 200, description = "Application created", body = ConfirmApplicationResponse),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Caller is not a student", body = Error),
        (status = 404, description = "Intent not found", body = Error),
        (status = 409, description = "Already applied", body = Error),
        (status = 410, description = "Intent expired", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["applications"],
    operation_id = "confirmApplication"
)]
#[post("/applications/{intent_id}/confirm")]
pub async fn confirm_application(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ConfirmApplicationResponse>> {
    let intent_id = IntentId::new(path.into_inner())?;
    let response = state
        .confirmations
        .confirm(caller.principal(), intent_id)
        .await?;
    Ok(web::Json(response))
}

/// Move a batch of the caller's college's applications to a new status.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/status/bulk",
    request_body = BulkTransitionRequest,
    responses(
        (status = 200, description = "Statuses updated", body = BulkTransitionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Caller does not own every application", body = Error),
        (status = 422, description = "Illegal transition", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["applications"],
    operation_id = "bulkUpdateApplicationStatus"
)]
#[patch("/applications/status/bulk")]
pub async fn bulk_update_status(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    payload: web::Json<BulkTransitionRequest>,
) -> ApiResult<web::Json<BulkTransitionResponse>> {
    let response = state
        .bulk_transitions
        .bulk_update(caller.principal(), payload.into_inner())
        .await?;
    Ok(web::Json(response))
}

/// List applications visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    params(ListApplicationsParams),
    responses(
        (status = 200, description = "One page of applications", body = ApplicationPageSchema),
        (status = 400, description = "Invalid filter, sort or page", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Caller has no readable scope", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    params: web::Query<ListApplicationsParams>,
) -> ApiResult<web::Json<Paginated<Application>>> {
    let page = state
        .applications
        .list(caller.principal(), params.into_inner().into())
        .await?;
    Ok(web::Json(page))
}

/// Fetch one application visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    params(("id" = i64, Path, description = "Application id")),
    responses(
        (status = 200, description = "The application", body = Application),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not found or not visible", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["applications"],
    operation_id = "getApplication"
)]
#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Application>> {
    let id = ApplicationId::new(path.into_inner())?;
    let application = state.applications.get(caller.principal(), id).await?;
    Ok(web::Json(application))
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;
