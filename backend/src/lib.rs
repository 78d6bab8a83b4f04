//! Career portal workflow engine.
//!
//! Students reserve a job, confirm an application against that reservation,
//! and college administrators move applications through review in bulk. Every
//! committed change leaves durable notification rows and is fanned out to a
//! transient feed after commit.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
