//! OpenAPI schema definitions for types owned by the pagination crate.
//!
//! `pagination` stays free of `utoipa`; these mirrors document the envelope
//! without coupling the crate to the HTTP stack.

use utoipa::ToSchema;

use crate::domain::{Application, Notification};

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = PageMeta)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PageMetaSchema {
    /// One-based page number.
    #[schema(example = 1, minimum = 1)]
    page: u32,
    /// Page size.
    #[schema(example = 20, minimum = 1, maximum = 100)]
    limit: u32,
    /// Rows matching the query across all pages.
    #[schema(example = 42)]
    total: u64,
}

/// A page of applications.
#[derive(ToSchema)]
#[schema(as = ApplicationPage)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ApplicationPageSchema {
    data: Vec<Application>,
    meta: PageMetaSchema,
}

/// A page of notifications.
#[derive(ToSchema)]
#[schema(as = NotificationPage)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct NotificationPageSchema {
    data: Vec<Notification>,
    meta: PageMetaSchema,
}
