//! End-to-end workflow properties over the in-memory store.
//!
//! Each test drives the public services the way the HTTP layer does and then
//! inspects the store directly.

mod support;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use career_portal::domain::ports::{
    AppliedStatusChange, ApplicationPage, ApplicationQuery, ApplicationRepository,
    ApplicationRepositoryError, BulkTransitionCommand, BulkTransitionRequest, ConfirmationCommand,
    ConfirmedApplication, IntentCommand, IntentRepository, IntentRepositoryError,
    NotificationInbox, ReservedIntent, StatusChange,
};
use career_portal::domain::{
    Application, ApplicationId, ApplicationListQuery, ApplicationStatus, BulkTransitionService,
    CollegeId, ConfirmationService, ErrorCode, FeedFanout, Intent, IntentId, IntentReservation,
    JobId, ListingRequest, ListingScope, NewApplication, NotificationDraft, NotificationKind,
    SHARED_QUEUE_CHANNEL, TransitionCandidate, UserId,
};
use career_portal::outbound::memory::InMemoryPortal;
use career_portal::test_support::fixtures::{college_admin, job_id, student, user};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use pagination::PageRequest;
use rstest::rstest;
use support::{HOME_COLLEGE, Harness, OTHER_COLLEGE, harness};
use tokio::sync::Barrier;

#[rstest]
#[tokio::test]
async fn reserving_twice_keeps_one_intent_with_a_later_expiry(harness: Harness) {
    let caller = student(100, HOME_COLLEGE);
    let first = harness
        .ledger
        .reserve(&caller, job_id(1))
        .await
        .expect("first reservation");

    harness.clock.advance(TimeDelta::hours(3));
    let second = harness
        .ledger
        .reserve(&caller, job_id(1))
        .await
        .expect("second reservation");

    assert_eq!(first.intent_id, second.intent_id);
    assert_eq!(second.expires_at, harness.clock.utc() + TimeDelta::hours(24));
    assert!(second.expires_at > first.expires_at);
    let intents = harness.portal.intents();
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].expires_at, second.expires_at);
}

#[rstest]
#[tokio::test]
async fn expired_intent_is_consumed_by_the_failed_confirmation(harness: Harness) {
    let caller = student(100, HOME_COLLEGE);
    let reserved = harness
        .ledger
        .reserve(&caller, job_id(1))
        .await
        .expect("reservation");

    harness.clock.advance(TimeDelta::hours(25));
    let expired = harness
        .confirmations
        .confirm(&caller, reserved.intent_id)
        .await
        .expect_err("expired intent");
    assert_eq!(expired.code(), ErrorCode::Expired);
    assert!(harness.portal.intents().is_empty());

    let retry = harness
        .confirmations
        .confirm(&caller, reserved.intent_id)
        .await
        .expect_err("intent is gone");
    assert_eq!(retry.code(), ErrorCode::NotFound);
    assert!(harness.portal.applications().is_empty());
}

#[rstest]
#[tokio::test]
async fn reserve_then_confirm_leaves_one_application_and_one_notification(harness: Harness) {
    let caller = student(100, HOME_COLLEGE);
    let reserved = harness
        .ledger
        .reserve(&caller, job_id(1))
        .await
        .expect("reservation");
    assert_eq!(
        reserved.expires_at,
        harness.clock.utc() + TimeDelta::hours(24)
    );

    harness.clock.advance(TimeDelta::hours(1));
    let confirmed = harness
        .confirmations
        .confirm(&caller, reserved.intent_id)
        .await
        .expect("confirmation");

    assert_eq!(confirmed.status, ApplicationStatus::Applied);
    let applications = harness.portal.applications();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].id, confirmed.application_id);
    assert_eq!(applications[0].student_id, user(100));
    assert!(harness.portal.intents().is_empty());

    let applied: Vec<_> = harness
        .portal
        .notifications()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::JobApplied)
        .collect();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].user_id, user(100));
    assert_eq!(applied[0].target_id, Some(confirmed.application_id.get()));

    let channels: Vec<String> = harness
        .feed
        .pushes()
        .into_iter()
        .map(|(channel, _)| channel)
        .collect();
    assert_eq!(
        channels,
        vec!["notifications:user:100".to_owned(), "notifications:user:100".to_owned()]
    );
}

/// Intent store that holds every lookup until two confirmations have read the
/// intent, so both race into the insert.
struct GatedIntents {
    inner: Arc<InMemoryPortal>,
    gate: Barrier,
}

#[async_trait]
impl IntentRepository for GatedIntents {
    async fn reserve(
        &self,
        reservation: &IntentReservation,
        notification: NotificationDraft,
    ) -> Result<ReservedIntent, IntentRepositoryError> {
        self.inner.reserve(reservation, notification).await
    }

    async fn find_owned(
        &self,
        intent_id: IntentId,
        student_id: UserId,
    ) -> Result<Option<Intent>, IntentRepositoryError> {
        let found = self.inner.find_owned(intent_id, student_id).await;
        self.gate.wait().await;
        found
    }

    async fn delete(&self, intent_id: IntentId) -> Result<bool, IntentRepositoryError> {
        self.inner.delete(intent_id).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, IntentRepositoryError> {
        self.inner.delete_expired(now).await
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_confirmations_create_exactly_one_application(harness: Harness) {
    let caller = student(100, HOME_COLLEGE);
    let reserved = harness
        .ledger
        .reserve(&caller, job_id(1))
        .await
        .expect("reservation");
    let portal = harness.portal.clone();
    let gated = Arc::new(GatedIntents {
        inner: portal.clone(),
        gate: Barrier::new(2),
    });
    let confirmations = ConfirmationService::new(
        portal.clone(),
        portal.clone(),
        gated,
        portal,
        Arc::new(FeedFanout::new(harness.feed.clone())),
    )
    .with_clock(harness.clock.clone());

    let (first, second) = tokio::join!(
        confirmations.confirm(&caller, reserved.intent_id),
        confirmations.confirm(&caller, reserved.intent_id),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    let loser = outcomes
        .into_iter()
        .find_map(Result::err)
        .expect("one confirmation loses");
    assert_eq!(loser.code(), ErrorCode::Conflict);
    assert_eq!(harness.portal.applications().len(), 1);
    assert!(harness.portal.intents().is_empty());
}

#[rstest]
#[case(ApplicationStatus::Offered, ApplicationStatus::Shortlisted)]
#[case(ApplicationStatus::Rejected, ApplicationStatus::Applied)]
#[case(ApplicationStatus::Rejected, ApplicationStatus::Shortlisted)]
#[case(ApplicationStatus::Rejected, ApplicationStatus::Interview)]
#[case(ApplicationStatus::Rejected, ApplicationStatus::Offered)]
#[tokio::test]
async fn illegal_transitions_leave_status_unchanged(
    harness: Harness,
    #[case] from: ApplicationStatus,
    #[case] to: ApplicationStatus,
) {
    let id = harness.seed_application(1, 100, from);

    let err = harness
        .bulk
        .bulk_update(
            &college_admin(5, HOME_COLLEGE),
            BulkTransitionRequest {
                application_ids: vec![id],
                new_status: to,
            },
        )
        .await
        .expect_err("illegal transition");

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
    assert_eq!(harness.portal.applications()[0].status, from);
}

#[rstest]
#[tokio::test]
async fn bulk_update_with_a_foreign_application_changes_nothing(harness: Harness) {
    let own = harness.seed_application(1, 100, ApplicationStatus::Applied);
    let also_own = harness.seed_application(2, 101, ApplicationStatus::Applied);
    let foreign = harness.seed_application(3, 200, ApplicationStatus::Applied);

    let err = harness
        .bulk
        .bulk_update(
            &college_admin(5, HOME_COLLEGE),
            BulkTransitionRequest {
                application_ids: vec![own, also_own, foreign],
                new_status: ApplicationStatus::Shortlisted,
            },
        )
        .await
        .expect_err("foreign application");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert!(
        harness
            .portal
            .applications()
            .iter()
            .all(|application| application.status == ApplicationStatus::Applied)
    );
    assert!(harness.portal.notifications().is_empty());
    assert!(harness.feed.pushes().is_empty());
}

#[rstest]
#[tokio::test]
async fn bulk_shortlisting_notifies_every_student(harness: Harness) {
    let ids = vec![
        harness.seed_application(1, 100, ApplicationStatus::Applied),
        harness.seed_application(1, 101, ApplicationStatus::Applied),
        harness.seed_application(2, 102, ApplicationStatus::Applied),
    ];

    let response = harness
        .bulk
        .bulk_update(
            &college_admin(5, HOME_COLLEGE),
            BulkTransitionRequest {
                application_ids: ids.clone(),
                new_status: ApplicationStatus::Shortlisted,
            },
        )
        .await
        .expect("bulk update");

    assert_eq!(response.updated_count, 3);
    assert_eq!(response.new_status, ApplicationStatus::Shortlisted);
    assert!(
        harness
            .portal
            .applications()
            .iter()
            .all(|application| application.status == ApplicationStatus::Shortlisted)
    );

    let notified: BTreeSet<_> = harness
        .portal
        .notifications()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::ApplicationStatusUpdate)
        .map(|n| n.user_id)
        .collect();
    assert_eq!(notified, BTreeSet::from([user(100), user(101), user(102)]));

    let pushes = harness.feed.pushes();
    assert_eq!(pushes.len(), 3);
    assert!(pushes.iter().all(|(channel, _)| channel == SHARED_QUEUE_CHANNEL));
}

fn everything_request(search: Option<&str>, status: Option<&str>) -> ListingRequest {
    ListingRequest {
        limit: Some(100),
        search: search.map(str::to_owned),
        status: status.map(str::to_owned),
        ..ListingRequest::default()
    }
}

#[rstest]
#[case(None, None)]
#[case(Some("Backend"), None)]
#[case(Some("Vikram"), None)]
#[case(None, Some("APPLIED"))]
#[case(Some("Acme"), Some("SHORTLISTED"))]
#[tokio::test]
async fn listings_never_escape_the_caller_scope(
    harness: Harness,
    #[case] search: Option<&str>,
    #[case] status: Option<&str>,
) {
    harness.seed_application(1, 100, ApplicationStatus::Applied);
    harness.seed_application(2, 100, ApplicationStatus::Shortlisted);
    harness.seed_application(1, 101, ApplicationStatus::Applied);
    harness.seed_application(2, 102, ApplicationStatus::Shortlisted);
    harness.seed_application(3, 200, ApplicationStatus::Applied);

    let as_student = harness
        .queries
        .list(&student(100, HOME_COLLEGE), everything_request(search, status))
        .await
        .expect("student listing");
    assert!(as_student.data.iter().all(|a| a.student_id == user(100)));

    let as_admin = harness
        .queries
        .list(
            &college_admin(5, OTHER_COLLEGE),
            everything_request(search, status),
        )
        .await
        .expect("admin listing");
    assert!(
        as_admin
            .data
            .iter()
            .all(|a| a.college_id.get() == OTHER_COLLEGE)
    );
}

#[rstest]
#[tokio::test]
async fn application_outside_scope_reads_as_missing(harness: Harness) {
    let foreign = harness.seed_application(3, 200, ApplicationStatus::Applied);

    let err = harness
        .queries
        .get(&college_admin(5, HOME_COLLEGE), foreign)
        .await
        .expect_err("outside scope");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn inbox_lists_newest_first_and_marks_read(harness: Harness) {
    let caller = student(100, HOME_COLLEGE);
    harness
        .ledger
        .reserve(&caller, job_id(1))
        .await
        .expect("first reservation");
    harness.clock.advance(TimeDelta::minutes(5));
    harness
        .ledger
        .reserve(&caller, job_id(2))
        .await
        .expect("second reservation");

    let page = harness
        .inbox
        .list(&caller, PageRequest::default())
        .await
        .expect("inbox");
    assert_eq!(page.meta.total, 2);
    assert!(page.data[0].created_at > page.data[1].created_at);

    let newest = page.data[0].id;
    let stranger = harness
        .inbox
        .mark_read(&student(101, HOME_COLLEGE), newest)
        .await
        .expect_err("not the recipient");
    assert_eq!(stranger.code(), ErrorCode::NotFound);

    harness
        .inbox
        .mark_read(&caller, newest)
        .await
        .expect("mark read");
    let read = harness
        .portal
        .notifications()
        .into_iter()
        .find(|n| n.id == newest)
        .expect("notification kept");
    assert!(read.is_read);
}

/// Application store where another reviewer rejects every candidate right
/// after the bulk engine has read it.
struct RacingReviewer {
    inner: Arc<InMemoryPortal>,
}

#[async_trait]
impl ApplicationRepository for RacingReviewer {
    async fn exists_for(
        &self,
        job_id: JobId,
        student_id: UserId,
    ) -> Result<bool, ApplicationRepositoryError> {
        self.inner.exists_for(job_id, student_id).await
    }

    async fn confirm(
        &self,
        intent: &Intent,
        application: NewApplication,
        notification: NotificationDraft,
    ) -> Result<ConfirmedApplication, ApplicationRepositoryError> {
        self.inner.confirm(intent, application, notification).await
    }

    async fn find_transition_candidates(
        &self,
        ids: &[ApplicationId],
        college_id: CollegeId,
    ) -> Result<Vec<TransitionCandidate>, ApplicationRepositoryError> {
        let candidates = self.inner.find_transition_candidates(ids, college_id).await?;
        self.inner
            .apply_status_change(StatusChange {
                expected: candidates
                    .iter()
                    .map(|candidate| (candidate.id, candidate.status))
                    .collect(),
                status: ApplicationStatus::Rejected,
                updated_at: Utc::now(),
                notifications: Vec::new(),
            })
            .await?;
        Ok(candidates)
    }

    async fn apply_status_change(
        &self,
        change: StatusChange,
    ) -> Result<AppliedStatusChange, ApplicationRepositoryError> {
        self.inner.apply_status_change(change).await
    }

    async fn find_visible(
        &self,
        id: ApplicationId,
        scope: ListingScope,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        self.inner.find_visible(id, scope).await
    }

    async fn list(
        &self,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, ApplicationRepositoryError> {
        self.inner.list(query).await
    }
}

#[rstest]
#[tokio::test]
async fn bulk_update_does_not_overwrite_a_concurrent_rejection(harness: Harness) {
    let id = harness.seed_application(1, 100, ApplicationStatus::Applied);
    let bulk = BulkTransitionService::new(
        Arc::new(RacingReviewer {
            inner: harness.portal.clone(),
        }),
        Arc::new(FeedFanout::new(harness.feed.clone())),
    )
    .with_clock(harness.clock.clone());

    let err = bulk
        .bulk_update(
            &college_admin(5, HOME_COLLEGE),
            BulkTransitionRequest {
                application_ids: vec![id],
                new_status: ApplicationStatus::Shortlisted,
            },
        )
        .await
        .expect_err("the row was rejected underneath the batch");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        harness.portal.applications()[0].status,
        ApplicationStatus::Rejected
    );
    assert!(
        harness
            .portal
            .notifications()
            .iter()
            .all(|n| n.kind != NotificationKind::ApplicationStatusUpdate)
    );
}
