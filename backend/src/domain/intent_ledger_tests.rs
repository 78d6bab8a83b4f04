//! Regression coverage for this module.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;

use super::*;
use crate::domain::notification_fanout::{FanoutReport, MockPostCommitHook};
use crate::domain::ports::{
    CatalogueError, MockApplicationRepository, MockIntentRepository, MockJobCatalogue,
    MockStudentProfiles, ReservedIntent,
};
use crate::domain::{ErrorCode, Intent, IntentId, Notification, NotificationId, StudentProfile};
use crate::test_support::fixtures::{active_job, complete_profile, job_id, student, user};
use crate::test_support::{MutableClock, fixture_now};

struct Mocks {
    catalogue: MockJobCatalogue,
    profiles: MockStudentProfiles,
    intents: MockIntentRepository,
    applications: MockApplicationRepository,
    hook: MockPostCommitHook,
}

impl Mocks {
    fn new() -> Self {
        Self {
            catalogue: MockJobCatalogue::new(),
            profiles: MockStudentProfiles::new(),
            intents: MockIntentRepository::new(),
            applications: MockApplicationRepository::new(),
            hook: MockPostCommitHook::new(),
        }
    }

    fn with_job(mut self) -> Self {
        self.catalogue
            .expect_find_job()
            .returning(|id, college| Ok(Some(active_job(id.get(), college.get()))));
        self
    }

    fn with_profile(mut self, profile: StudentProfile) -> Self {
        self.profiles
            .expect_find_profile()
            .returning(move |_| Ok(Some(profile.clone())));
        self
    }

    fn with_applied(mut self, applied: bool) -> Self {
        self.applications
            .expect_exists_for()
            .returning(move |_, _| Ok(applied));
        self
    }

    fn service(
        self,
    ) -> IntentLedgerService<
        MockJobCatalogue,
        MockStudentProfiles,
        MockIntentRepository,
        MockApplicationRepository,
    > {
        IntentLedgerService::new(
            Arc::new(self.catalogue),
            Arc::new(self.profiles),
            Arc::new(self.intents),
            Arc::new(self.applications),
            Arc::new(self.hook),
        )
        .with_clock(Arc::new(MutableClock::at_fixture_time()))
    }
}

fn echo_reservation(
    reservation: &IntentReservation,
    draft: NotificationDraft,
) -> Result<ReservedIntent, crate::domain::ports::IntentRepositoryError> {
    let intent = Intent {
        id: IntentId::new(31).expect("valid id"),
        job_id: reservation.job_id,
        student_id: reservation.student_id,
        college_id: reservation.college_id,
        expires_at: reservation.expires_at,
        created_at: reservation.reserved_at,
    };
    let notification = Notification {
        id: NotificationId::new(1).expect("valid id"),
        user_id: draft.user_id,
        kind: draft.kind,
        target_id: Some(intent.id.get()),
        payload: draft.payload,
        is_read: false,
        created_at: draft.created_at,
    };
    Ok(ReservedIntent {
        intent,
        notification,
    })
}

#[rstest]
#[tokio::test]
async fn reserve_upserts_with_ttl_and_fans_out_after_commit() {
    let mut mocks = Mocks::new()
        .with_job()
        .with_profile(complete_profile(7))
        .with_applied(false);
    mocks
        .intents
        .expect_reserve()
        .withf(|reservation, draft| {
            reservation.expires_at == fixture_now() + Duration::hours(24)
                && reservation.reserved_at == fixture_now()
                && draft.kind == NotificationKind::JobApplyIntent
                && draft.user_id == user(7)
        })
        .times(1)
        .returning(|reservation, draft| echo_reservation(reservation, draft));
    mocks
        .hook
        .expect_after_commit()
        .withf(|committed| {
            committed.len() == 1 && committed[0].kind == NotificationKind::JobApplyIntent
        })
        .times(1)
        .returning(|_| FanoutReport {
            delivered: 1,
            failed: 0,
        });

    let response = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect("reservation succeeds");

    assert_eq!(response.intent_id.get(), 31);
    assert_eq!(response.expires_at, fixture_now() + Duration::hours(24));
    assert_eq!(
        response.redirect_url.as_deref(),
        Some("https://forms.example.test/jobs/5")
    );
}

#[rstest]
#[tokio::test]
async fn custom_ttl_sets_expiry() {
    let mut mocks = Mocks::new()
        .with_job()
        .with_profile(complete_profile(7))
        .with_applied(false);
    mocks
        .intents
        .expect_reserve()
        .returning(|reservation, draft| echo_reservation(reservation, draft));
    mocks.hook.expect_after_commit().returning(|_| FanoutReport::default());

    let response = mocks
        .service()
        .with_ttl(Duration::minutes(30))
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect("reservation succeeds");

    assert_eq!(response.expires_at, fixture_now() + Duration::minutes(30));
}

#[rstest]
#[tokio::test]
async fn inactive_or_foreign_jobs_are_not_found() {
    let mut mocks = Mocks::new();
    mocks.catalogue.expect_find_job().returning(|id, college| {
        let mut job = active_job(id.get(), college.get());
        job.is_active = false;
        Ok(Some(job))
    });

    let err = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect_err("inactive job");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let mut mocks = Mocks::new();
    mocks.catalogue.expect_find_job().returning(|_, _| Ok(None));
    let err = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect_err("job at another college");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(None)]
#[case(Some(StudentProfile { user_id: user(7), batch: None, resume_url: None }))]
#[tokio::test]
async fn incomplete_profiles_are_rejected(#[case] profile: Option<StudentProfile>) {
    let mut mocks = Mocks::new().with_job();
    mocks
        .profiles
        .expect_find_profile()
        .returning(move |_| Ok(profile.clone()));

    let err = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect_err("profile incomplete");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn ineligible_batch_is_forbidden() {
    let mut profile = complete_profile(7);
    profile.batch = Some(2024);
    let mocks = Mocks::new().with_job().with_profile(profile);

    let err = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect_err("batch not eligible");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn existing_application_is_a_conflict() {
    let mocks = Mocks::new()
        .with_job()
        .with_profile(complete_profile(7))
        .with_applied(true);

    let err = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect_err("already applied");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn non_students_cannot_reserve() {
    let err = Mocks::new()
        .service()
        .reserve(
            &crate::test_support::fixtures::college_admin(2, 1),
            job_id(5),
        )
        .await
        .expect_err("admins cannot apply");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn catalogue_outage_is_unavailable() {
    let mut mocks = Mocks::new();
    mocks
        .catalogue
        .expect_find_job()
        .returning(|_, _| Err(CatalogueError::connection("pool exhausted")));

    let err = mocks
        .service()
        .reserve(&student(7, 1), job_id(5))
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(!err.message().contains("pool exhausted"));
}
