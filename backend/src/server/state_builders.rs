//! Builders wiring domain services onto the configured adapters.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use career_portal::domain::ports::{
    ApplicationRepository, IntentRepository, JobCatalogue, NotificationFeed,
    NotificationRepository, StudentProfiles,
};
use career_portal::domain::{
    ApplicationQueryService, ApplicationStatus, BulkTransitionService, CollegeId,
    ConfirmationService, FeedFanout, IntentLedgerService, JobDomain, JobId, JobSnapshot, JobType,
    NotificationInboxService, PostCommitHook, StudentProfile, UserId,
};
use career_portal::inbound::http::state::HttpState;
use career_portal::outbound::feed::{LoggingFeed, RedisNotificationFeed};
use career_portal::outbound::memory::InMemoryPortal;
use career_portal::outbound::persistence::{
    DieselApplicationRepository, DieselIntentRepository, DieselJobCatalogue,
    DieselNotificationRepository,
};

use super::ServerConfig;

const FEED_POOL_SIZE: u32 = 8;

/// Persistence adapters behind the workflow services.
struct Stores<C, P, I, A, N> {
    catalogue: Arc<C>,
    profiles: Arc<P>,
    intents: Arc<I>,
    applications: Arc<A>,
    notifications: Arc<N>,
}

fn wire<C, P, I, A, N>(
    stores: Stores<C, P, I, A, N>,
    hook: &Arc<dyn PostCommitHook>,
    config: &ServerConfig,
) -> HttpState
where
    C: JobCatalogue + 'static,
    P: StudentProfiles + 'static,
    I: IntentRepository + 'static,
    A: ApplicationRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Stores {
        catalogue,
        profiles,
        intents,
        applications,
        notifications,
    } = stores;
    HttpState {
        intents: Arc::new(
            IntentLedgerService::new(
                catalogue.clone(),
                profiles.clone(),
                intents.clone(),
                applications.clone(),
                hook.clone(),
            )
            .with_ttl(config.intent_ttl)
            .with_deadlines(config.deadlines),
        ),
        confirmations: Arc::new(
            ConfirmationService::new(
                catalogue,
                profiles,
                intents,
                applications.clone(),
                hook.clone(),
            )
            .with_deadlines(config.deadlines),
        ),
        bulk_transitions: Arc::new(
            BulkTransitionService::new(applications.clone(), hook.clone())
                .with_deadlines(config.deadlines),
        ),
        applications: Arc::new(
            ApplicationQueryService::new(applications).with_deadlines(config.deadlines),
        ),
        notifications: Arc::new(
            NotificationInboxService::new(notifications).with_deadlines(config.deadlines),
        ),
    }
}

fn fanout<F>(feed: F, config: &ServerConfig) -> Arc<dyn PostCommitHook>
where
    F: NotificationFeed + 'static,
{
    Arc::new(FeedFanout::new(Arc::new(feed)).with_timeout(config.deadlines.feed))
}

/// Build the post-commit hook: Redis when a URL is configured, otherwise a
/// feed that only logs.
///
/// # Errors
/// Returns [`std::io::Error`] when the Redis URL cannot be parsed.
fn build_hook(config: &ServerConfig) -> std::io::Result<Arc<dyn PostCommitHook>> {
    match config.redis_url.as_deref() {
        Some(url) => {
            let feed = RedisNotificationFeed::connect_lazy(url, FEED_POOL_SIZE)
                .map_err(|err| std::io::Error::other(format!("redis feed: {err}")))?;
            Ok(fanout(feed, config))
        }
        None => {
            warn!("no redis url configured; notification feed pushes are only logged");
            Ok(fanout(LoggingFeed, config))
        }
    }
}

/// A small catalogue so the in-memory server answers something useful.
fn seed_demo(portal: &InMemoryPortal) -> Option<()> {
    let college = CollegeId::new(1).ok()?;
    let jobs = [
        (1, "Backend Engineer", "Acme Systems", JobDomain::Backend, JobType::FullTime),
        (2, "Frontend Intern", "Pixelworks", JobDomain::Frontend, JobType::Intern),
        (3, "ML Research Intern", "Tensorlab", JobDomain::Aiml, JobType::InternPpo),
    ];
    for (id, title, company, domain, job_type) in jobs {
        portal.insert_job(JobSnapshot {
            id: JobId::new(id).ok()?,
            college_id: college,
            title: title.to_owned(),
            company: company.to_owned(),
            domain,
            job_type,
            is_active: true,
            eligible_batches: vec![2026, 2027],
            registration_url: Some(format!("https://forms.example.com/jobs/{id}")),
        });
    }
    let students = [(100, "Asha Rao"), (101, "Vikram Iyer")];
    for (id, name) in students {
        let user_id = UserId::new(id).ok()?;
        portal.insert_profile(StudentProfile {
            user_id,
            batch: Some(2026),
            resume_url: Some(format!("https://files.example.com/resumes/{id}.pdf")),
        });
        portal.insert_user_name(user_id, name);
    }
    portal.seed_application(
        JobId::new(1).ok()?,
        UserId::new(101).ok()?,
        college,
        ApplicationStatus::Applied,
        Utc::now() - Duration::days(1),
    )?;
    Some(())
}

/// Build handler state from the configured adapters.
///
/// Uses the Diesel adapters when a pool is attached and the seeded in-memory
/// store otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] when the feed adapter cannot be configured.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let hook = build_hook(config)?;
    let statement_timeout = config.deadlines.transaction;
    let state = match &config.db_pool {
        Some(pool) => {
            let catalogue = Arc::new(DieselJobCatalogue::new(pool.clone()));
            wire(
                Stores {
                    catalogue: catalogue.clone(),
                    profiles: catalogue,
                    intents: Arc::new(
                        DieselIntentRepository::new(pool.clone())
                            .with_statement_timeout(statement_timeout),
                    ),
                    applications: Arc::new(
                        DieselApplicationRepository::new(pool.clone())
                            .with_statement_timeout(statement_timeout),
                    ),
                    notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
                },
                &hook,
                config,
            )
        }
        None => {
            let portal = Arc::new(InMemoryPortal::new());
            if seed_demo(&portal).is_some() {
                info!("serving the seeded in-memory store");
            }
            wire(
                Stores {
                    catalogue: portal.clone(),
                    profiles: portal.clone(),
                    intents: portal.clone(),
                    applications: portal.clone(),
                    notifications: portal,
                },
                &hook,
                config,
            )
        }
    };
    Ok(state)
}
