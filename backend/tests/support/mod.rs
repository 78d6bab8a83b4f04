//! Shared harness wiring the workflow services over the in-memory store.

use std::sync::Arc;

use career_portal::domain::{
    ApplicationId, ApplicationQueryService, ApplicationStatus, BulkTransitionService,
    ConfirmationService, FeedFanout, IntentLedgerService, NotificationInboxService,
    PostCommitHook,
};
use career_portal::inbound::http::state::HttpState;
use career_portal::outbound::memory::InMemoryPortal;
use career_portal::test_support::fixtures::{active_job, college, complete_profile, job_id, user};
use career_portal::test_support::{MutableClock, RecordingFeed, fixture_now};
use chrono::TimeDelta;
use mockable::Clock;
use rstest::fixture;

/// College owning jobs 1 and 2 and students 100 to 102.
pub const HOME_COLLEGE: i64 = 10;
/// College owning job 3 and student 200.
pub const OTHER_COLLEGE: i64 = 20;

type Ledger = IntentLedgerService<InMemoryPortal, InMemoryPortal, InMemoryPortal, InMemoryPortal>;
type Confirmations =
    ConfirmationService<InMemoryPortal, InMemoryPortal, InMemoryPortal, InMemoryPortal>;

/// Every workflow service over one seeded store, a settable clock and a
/// recording feed.
pub struct Harness {
    pub portal: Arc<InMemoryPortal>,
    pub clock: Arc<MutableClock>,
    pub feed: Arc<RecordingFeed>,
    pub ledger: Arc<Ledger>,
    pub confirmations: Arc<Confirmations>,
    pub bulk: Arc<BulkTransitionService<InMemoryPortal>>,
    pub queries: Arc<ApplicationQueryService<InMemoryPortal>>,
    pub inbox: Arc<NotificationInboxService<InMemoryPortal>>,
}

impl Harness {
    /// Handler state backed by the harness services.
    pub fn http_state(&self) -> HttpState {
        HttpState {
            intents: self.ledger.clone(),
            confirmations: self.confirmations.clone(),
            bulk_transitions: self.bulk.clone(),
            applications: self.queries.clone(),
            notifications: self.inbox.clone(),
        }
    }

    /// Insert an application directly with the given status.
    pub fn seed_application(
        &self,
        job: i64,
        student: i64,
        status: ApplicationStatus,
    ) -> ApplicationId {
        let college_id = if job == 3 { OTHER_COLLEGE } else { HOME_COLLEGE };
        self.portal
            .seed_application(
                job_id(job),
                user(student),
                college(college_id),
                status,
                self.clock.utc() - TimeDelta::minutes(job * 10 + student),
            )
            .expect("application seeds once per (job, student)")
    }
}

#[fixture]
pub fn harness() -> Harness {
    let portal = Arc::new(InMemoryPortal::new());
    portal.insert_job(active_job(1, HOME_COLLEGE));
    portal.insert_job(active_job(2, HOME_COLLEGE));
    portal.insert_job(active_job(3, OTHER_COLLEGE));
    for student in [100, 101, 102, 200] {
        portal.insert_profile(complete_profile(student));
    }
    portal.insert_user_name(user(100), "Asha Rao");
    portal.insert_user_name(user(101), "Vikram Iyer");
    portal.insert_user_name(user(102), "Meera Nair");
    portal.insert_user_name(user(200), "Rahul Sen");

    let clock = Arc::new(MutableClock::new(fixture_now()));
    let feed = Arc::new(RecordingFeed::default());
    let hook: Arc<dyn PostCommitHook> = Arc::new(FeedFanout::new(feed.clone()));

    let ledger = IntentLedgerService::new(
        portal.clone(),
        portal.clone(),
        portal.clone(),
        portal.clone(),
        hook.clone(),
    )
    .with_clock(clock.clone());
    let confirmations = ConfirmationService::new(
        portal.clone(),
        portal.clone(),
        portal.clone(),
        portal.clone(),
        hook.clone(),
    )
    .with_clock(clock.clone());
    let bulk = BulkTransitionService::new(portal.clone(), hook).with_clock(clock.clone());

    Harness {
        queries: Arc::new(ApplicationQueryService::new(portal.clone())),
        inbox: Arc::new(NotificationInboxService::new(portal.clone())),
        ledger: Arc::new(ledger),
        confirmations: Arc::new(confirmations),
        bulk: Arc::new(bulk),
        portal,
        clock,
        feed,
    }
}
