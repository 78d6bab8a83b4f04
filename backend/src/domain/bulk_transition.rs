//! Bulk transition engine.
//!
//! A batch is authorised and validated in full before anything is written:
//! every requested id must belong to the caller's college and every move must
//! be legal under [`transition::is_legal`](super::transition::is_legal). The
//! status update and the durable status-update notifications then commit
//! together, and the feed push follows the commit. The write carries the
//! status each move was validated from, so a row changed by a concurrent
//! reviewer aborts the whole batch with a conflict.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tracing::info;

use super::deadline::{Deadlines, within};
use super::notification_fanout::PostCommitHook;
use super::ports::{
    ApplicationRepository, BulkTransitionCommand, BulkTransitionRequest, BulkTransitionResponse,
    StatusChange,
};
use super::{ApplicationId, Error, NotificationDraft, Principal, transition};

/// Largest batch accepted in one call.
pub const MAX_BULK_IDS: usize = 500;

/// Service implementing [`BulkTransitionCommand`].
pub struct BulkTransitionService<A> {
    applications: Arc<A>,
    hook: Arc<dyn PostCommitHook>,
    clock: Arc<dyn Clock>,
    deadlines: Deadlines,
}

impl<A> BulkTransitionService<A> {
    /// Create the service with the system clock and default deadlines.
    pub fn new(applications: Arc<A>, hook: Arc<dyn PostCommitHook>) -> Self {
        Self {
            applications,
            hook,
            clock: Arc::new(DefaultClock),
            deadlines: Deadlines::default(),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the store and feed deadlines.
    #[must_use]
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}

fn distinct_ids(requested: &[ApplicationId]) -> Result<Vec<ApplicationId>, Error> {
    let ids: Vec<ApplicationId> = requested
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Err(Error::invalid_request("application_ids must not be empty"));
    }
    if ids.len() > MAX_BULK_IDS {
        return Err(Error::invalid_request(format!(
            "at most {MAX_BULK_IDS} applications may be updated at once"
        ))
        .with_details(serde_json::json!({ "requested": ids.len() })));
    }
    Ok(ids)
}

#[async_trait]
impl<A> BulkTransitionCommand for BulkTransitionService<A>
where
    A: ApplicationRepository,
{
    async fn bulk_update(
        &self,
        principal: &Principal,
        request: BulkTransitionRequest,
    ) -> Result<BulkTransitionResponse, Error> {
        let college_id = principal.require_college_admin()?;
        let ids = distinct_ids(&request.application_ids)?;
        let target = request.new_status;
        let limit = self.deadlines.transaction;

        let candidates = within(
            limit,
            "bulk ownership check",
            self.applications.find_transition_candidates(&ids, college_id),
        )
        .await?;
        if candidates.len() != ids.len() {
            return Err(Error::forbidden(
                "one or more applications do not belong to your college",
            )
            .with_details(serde_json::json!({
                "requested": ids.len(),
                "permitted": candidates.len(),
            })));
        }

        for candidate in &candidates {
            transition::ensure_legal(candidate.status, target).map_err(|err| {
                err.with_details(serde_json::json!({
                    "application_id": candidate.id,
                    "from": candidate.status,
                    "to": target,
                    "allowed": transition::successors(candidate.status),
                }))
            })?;
        }

        let now = self.clock.utc();
        let expected = candidates
            .iter()
            .map(|candidate| (candidate.id, candidate.status))
            .collect();
        let notifications = candidates
            .iter()
            .map(|candidate| {
                NotificationDraft::for_status_change(
                    candidate.student_id,
                    candidate.id,
                    candidate.job_id,
                    candidate.status,
                    target,
                    now,
                )
            })
            .collect();
        let applied = within(
            limit,
            "bulk status update",
            self.applications.apply_status_change(StatusChange {
                expected,
                status: target,
                updated_at: now,
                notifications,
            }),
        )
        .await?;

        info!(
            college_id = %college_id,
            updated = applied.updated,
            new_status = %target,
            "bulk status update committed"
        );
        self.hook
            .after_commit(&applied.notifications)
            .await
            .log("bulk status update");

        Ok(BulkTransitionResponse {
            updated_count: applied.updated,
            new_status: target,
        })
    }
}

#[cfg(test)]
#[path = "bulk_transition_tests.rs"]
mod tests;
