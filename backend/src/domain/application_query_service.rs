//! Scoped read paths over applications.
//!
//! The scope is derived from the caller before any input is parsed, and every
//! store call receives it, so visibility never depends on which optional
//! filters were supplied.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Paginated;

use super::deadline::{Deadlines, within};
use super::ports::{ApplicationQuery, ApplicationRepository};
use super::{
    Application, ApplicationId, ApplicationListQuery, Error, ListingRequest, ListingScope,
    Principal,
};

/// Service implementing [`ApplicationQuery`].
pub struct ApplicationQueryService<A> {
    applications: Arc<A>,
    deadlines: Deadlines,
}

impl<A> ApplicationQueryService<A> {
    /// Create the service with default deadlines.
    pub fn new(applications: Arc<A>) -> Self {
        Self {
            applications,
            deadlines: Deadlines::default(),
        }
    }

    /// Replace the store deadline.
    #[must_use]
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}

#[async_trait]
impl<A> ApplicationQuery for ApplicationQueryService<A>
where
    A: ApplicationRepository,
{
    async fn list(
        &self,
        principal: &Principal,
        request: ListingRequest,
    ) -> Result<Paginated<Application>, Error> {
        let scope = ListingScope::for_principal(principal)?;
        let query = ApplicationListQuery::build(scope, &request)?;
        let page = within(
            self.deadlines.transaction,
            "application listing",
            self.applications.list(&query),
        )
        .await?;
        Ok(Paginated::new(page.rows, query.page, page.total))
    }

    async fn get(&self, principal: &Principal, id: ApplicationId) -> Result<Application, Error> {
        let scope = ListingScope::for_principal(principal)?;
        within(
            self.deadlines.transaction,
            "application lookup",
            self.applications.find_visible(id, scope),
        )
        .await?
        .ok_or_else(|| Error::not_found(format!("application {id} not found")))
    }
}
