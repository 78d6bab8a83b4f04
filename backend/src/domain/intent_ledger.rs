//! Intent ledger: single-use, expiring reservations per `(job, student)`.
//!
//! A reservation checks that the job is open at the student's college and
//! that the student's batch is eligible, then upserts the intent and writes
//! the apply-intent notification in one transaction. The feed push runs
//! after commit through the [`PostCommitHook`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use tracing::info;

use super::deadline::{Deadlines, within};
use super::intent::DEFAULT_INTENT_TTL_HOURS;
use super::notification_fanout::PostCommitHook;
use super::ports::{
    ApplicationRepository, IntentCommand, IntentRepository, JobCatalogue, ReserveIntentResponse,
    StudentProfiles,
};
use super::{Error, IntentReservation, JobId, NotificationDraft, NotificationKind, Principal};

/// Service implementing [`IntentCommand`].
pub struct IntentLedgerService<C, P, I, A> {
    catalogue: Arc<C>,
    profiles: Arc<P>,
    intents: Arc<I>,
    applications: Arc<A>,
    hook: Arc<dyn PostCommitHook>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    deadlines: Deadlines,
}

impl<C, P, I, A> IntentLedgerService<C, P, I, A> {
    /// Create a ledger with the system clock, default TTL and deadlines.
    pub fn new(
        catalogue: Arc<C>,
        profiles: Arc<P>,
        intents: Arc<I>,
        applications: Arc<A>,
        hook: Arc<dyn PostCommitHook>,
    ) -> Self {
        Self {
            catalogue,
            profiles,
            intents,
            applications,
            hook,
            clock: Arc::new(DefaultClock),
            ttl: Duration::hours(i64::from(DEFAULT_INTENT_TTL_HOURS)),
            deadlines: Deadlines::default(),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the reservation lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the store and feed deadlines.
    #[must_use]
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}

#[async_trait]
impl<C, P, I, A> IntentCommand for IntentLedgerService<C, P, I, A>
where
    C: JobCatalogue,
    P: StudentProfiles,
    I: IntentRepository,
    A: ApplicationRepository,
{
    async fn reserve(
        &self,
        principal: &Principal,
        job_id: JobId,
    ) -> Result<ReserveIntentResponse, Error> {
        let (student_id, college_id) = principal.require_enrolled_student()?;
        let limit = self.deadlines.transaction;

        let job = within(limit, "job lookup", self.catalogue.find_job(job_id, college_id))
            .await?
            .filter(|job| job.is_active)
            .ok_or_else(|| Error::not_found(format!("job {job_id} not found")))?;

        let batch = within(limit, "profile lookup", self.profiles.find_profile(student_id))
            .await?
            .and_then(|profile| profile.batch)
            .ok_or_else(|| Error::invalid_request("complete your profile before applying"))?;
        if !job.accepts_batch(batch) {
            return Err(Error::forbidden("you are not eligible for this job").with_details(
                serde_json::json!({
                    "batch": batch,
                    "eligible_batches": job.eligible_batches,
                }),
            ));
        }

        let already_applied = within(
            limit,
            "application lookup",
            self.applications.exists_for(job.id, student_id),
        )
        .await?;
        if already_applied {
            return Err(Error::conflict("you have already applied to this job"));
        }

        let now = self.clock.utc();
        let reservation = IntentReservation {
            job_id: job.id,
            student_id,
            college_id: job.college_id,
            expires_at: now + self.ttl,
            reserved_at: now,
        };
        let draft =
            NotificationDraft::for_job(student_id, NotificationKind::JobApplyIntent, &job, now);
        let reserved = within(
            limit,
            "intent reservation",
            self.intents.reserve(&reservation, draft),
        )
        .await?;

        info!(
            intent_id = %reserved.intent.id,
            job_id = %job.id,
            student_id = %student_id,
            expires_at = %reserved.intent.expires_at,
            "intent reserved"
        );
        self.hook
            .after_commit(std::slice::from_ref(&reserved.notification))
            .await
            .log("reserve intent");

        Ok(ReserveIntentResponse {
            intent_id: reserved.intent.id,
            expires_at: reserved.intent.expires_at,
            redirect_url: job.registration_url,
        })
    }
}

#[cfg(test)]
#[path = "intent_ledger_tests.rs"]
mod tests;
