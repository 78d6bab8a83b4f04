//! Notification inbox HTTP handlers.
//!
//! ```text
//! GET  /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::Paginated;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, Notification, NotificationId, page_request};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::PrincipalContext;
use crate::inbound::http::schemas::NotificationPageSchema;
use crate::inbound::http::state::HttpState;

/// Page window for the inbox.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InboxParams {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 20).
    pub limit: Option<u32>,
}

/// List the caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(InboxParams),
    responses(
        (status = 200, description = "One page of notifications", body = NotificationPageSchema),
        (status = 400, description = "Invalid page", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    params: web::Query<InboxParams>,
) -> ApiResult<web::Json<Paginated<Notification>>> {
    let page = page_request(params.page, params.limit)?;
    let notifications = state.notifications.list(caller.principal(), page).await?;
    Ok(web::Json(notifications))
}

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    caller: PrincipalContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = NotificationId::new(path.into_inner())?;
    state.notifications.mark_read(caller.principal(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
