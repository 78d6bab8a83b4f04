//! Confirmation protocol: convert an intent into an application exactly once.
//!
//! The intent is read scoped to the calling student, checked for expiry, and
//! its job re-fetched scoped to the intent's college. The application insert,
//! intent deletion and job-applied notification then commit together. The
//! feed push happens only after commit and can never undo it.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use super::deadline::{Deadlines, within};
use super::notification_fanout::PostCommitHook;
use super::ports::{
    ApplicationRepository, ConfirmApplicationResponse, ConfirmationCommand, IntentRepository,
    JobCatalogue, StudentProfiles,
};
use super::{
    ApplicationStatus, Error, IntentId, NewApplication, NotificationDraft, NotificationKind,
    Principal,
};

/// Acknowledgement returned to the student.
pub const CONFIRMATION_MESSAGE: &str = "application confirmed";

/// Service implementing [`ConfirmationCommand`].
pub struct ConfirmationService<C, P, I, A> {
    catalogue: Arc<C>,
    profiles: Arc<P>,
    intents: Arc<I>,
    applications: Arc<A>,
    hook: Arc<dyn PostCommitHook>,
    clock: Arc<dyn Clock>,
    deadlines: Deadlines,
}

impl<C, P, I, A> ConfirmationService<C, P, I, A> {
    /// Create the service with the system clock and default deadlines.
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

#[async_trait]
impl<C, P, I, A> ConfirmationCommand for ConfirmationService<C, P, I, A>
where
    C: JobCatalogue,
    P: StudentProfiles,
    I: IntentRepository,
    A: ApplicationRepository,
{
    async fn confirm(
        &self,
        principal: &Principal,
        intent_id: IntentId,
    ) -> Result<ConfirmApplicationResponse, Error> {
        let student_id = principal.require_student()?;
        let limit = self.deadlines.transaction;

        let intent = within(
            limit,
            "intent lookup",
            self.intents.find_owned(intent_id, student_id),
        )
        .await?
        .ok_or_else(|| Error::not_found("intent not found"))?;

        let now = self.clock.utc();
        if intent.is_expired_at(now) {
            let removed = within(limit, "intent expiry", self.intents.delete(intent.id)).await?;
            warn!(
                intent_id = %intent.id,
                expires_at = %intent.expires_at,
                removed,
                "expired intent presented for confirmation"
            );
            return Err(Error::expired("intent has expired; apply again"));
        }

        let job = within(
            limit,
            "job lookup",
            self.catalogue.find_job(intent.job_id, intent.college_id),
        )
        .await?
        .ok_or_else(|| Error::not_found(format!("job {} not found", intent.job_id)))?;

        let resume_snapshot_url = within(
            limit,
            "profile lookup",
            self.profiles.find_profile(student_id),
        )
        .await?
        .and_then(|profile| profile.resume_url)
        .unwrap_or_default();

        let application = NewApplication {
            job_id: job.id,
            student_id,
            college_id: job.college_id,
            resume_snapshot_url,
            created_at: now,
        };
        let draft = NotificationDraft::for_job(student_id, NotificationKind::JobApplied, &job, now);
        let confirmed = within(
            limit,
            "application confirmation",
            self.applications.confirm(&intent, application, draft),
        )
        .await?;

        info!(
            application_id = %confirmed.application.id,
            intent_id = %intent.id,
            job_id = %job.id,
            student_id = %student_id,
            "application confirmed"
        );
        self.hook
            .after_commit(std::slice::from_ref(&confirmed.notification))
            .await
            .log("confirm application");

        Ok(ConfirmApplicationResponse {
            application_id: confirmed.application.id,
            status: ApplicationStatus::Applied,
            message: CONFIRMATION_MESSAGE.to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "confirmation_tests.rs"]
mod tests;
