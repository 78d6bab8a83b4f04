//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the domain
//! request and response types, the pagination envelope mirrors from
//! [`crate::inbound::http::schemas`] and the identity header scheme.
//!
//! The generated specification is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ports::{
    BulkTransitionRequest, BulkTransitionResponse, ConfirmApplicationResponse,
    ReserveIntentResponse,
};
use crate::domain::{
    Application, ApplicationStatus, Error, ErrorCode, Notification, NotificationKind,
};
use crate::inbound::http::principal::{COLLEGE_ID_HEADER, ROLE_HEADER, USER_ID_HEADER};
use crate::inbound::http::schemas::{
    ApplicationPageSchema, NotificationPageSchema, PageMetaSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the identity header schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        for (name, header, description) in [
            ("UserId", USER_ID_HEADER, "Authenticated user id."),
            ("Role", ROLE_HEADER, "student, college_admin or admin."),
            ("CollegeId", COLLEGE_ID_HEADER, "College of the caller, if any."),
        ] {
            components.add_security_scheme(
                name,
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    header,
                    description,
                ))),
            );
        }
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Career portal API",
        description = "Job application workflow: reservations, confirmations, \
                       bulk status review, scoped listings and notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("UserId" = [], "Role" = [], "CollegeId" = [])),
    paths(
        crate::inbound::http::jobs::apply_to_job,
        crate::inbound::http::applications::confirm_application,
        crate::inbound::http::applications::bulk_update_status,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::get_application,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Application,
        ApplicationStatus,
        ApplicationPageSchema,
        BulkTransitionRequest,
        BulkTransitionResponse,
        ConfirmApplicationResponse,
        Error,
        ErrorCode,
        Notification,
        NotificationKind,
        NotificationPageSchema,
        PageMetaSchema,
        ReserveIntentResponse,
    )),
    tags(
        (name = "jobs", description = "Reserving jobs"),
        (name = "applications", description = "Confirming, reviewing and listing applications"),
        (name = "notifications", description = "Per-user notification inbox"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
