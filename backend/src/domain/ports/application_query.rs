//! Driving port for scoped application reads.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Application, ApplicationId, Error, ListingRequest, Principal};

/// Role-scoped reads over applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// List applications visible to `principal`.
    async fn list(
        &self,
        principal: &Principal,
        request: ListingRequest,
    ) -> Result<Paginated<Application>, Error>;

    /// Fetch one application visible to `principal`. Applications outside
    /// the caller's scope are reported as not found.
    async fn get(&self, principal: &Principal, id: ApplicationId) -> Result<Application, Error>;
}
