//! In-process adapter implementing every persistence port.
//!
//! The store keeps all tables behind one mutex, so each port method runs as a
//! single atomic step. It enforces the same uniqueness rules as the
//! PostgreSQL schema: one intent per `(job, student)` and one application per
//! `(job, student)`. Used when no database URL is configured and by tests.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::ports::{
    AppliedStatusChange, ApplicationPage, ApplicationRepository, ApplicationRepositoryError,
    CatalogueError, ConfirmedApplication, IntentRepository, IntentRepositoryError, JobCatalogue,
    NotificationPage, NotificationRepository, NotificationRepositoryError, ReservedIntent,
    StatusChange, StudentProfiles,
};
use crate::domain::{
    Application, ApplicationId, ApplicationListQuery, ApplicationSort, ApplicationStatus,
    CollegeId, Intent, IntentId, IntentReservation, JobId, JobSnapshot, ListingScope,
    NewApplication, Notification, NotificationDraft, NotificationId, SortColumn, SortDirection,
    StudentProfile, TransitionCandidate, UserId,
};

#[derive(Default)]
struct Tables {
    jobs: HashMap<JobId, JobSnapshot>,
    profiles: HashMap<UserId, StudentProfile>,
    user_names: HashMap<UserId, String>,
    intents: BTreeMap<IntentId, Intent>,
    applications: BTreeMap<ApplicationId, Application>,
    notifications: BTreeMap<NotificationId, Notification>,
    next_id: i64,
}

impl Tables {
    fn next_raw_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_notification(&mut self, draft: NotificationDraft) -> Result<Notification, String> {
        let id = NotificationId::new(self.next_raw_id()).map_err(|err| err.to_string())?;
        let notification = Notification {
            id,
            user_id: draft.user_id,
            kind: draft.kind,
            target_id: draft.target_id,
            payload: draft.payload,
            is_read: false,
            created_at: draft.created_at,
        };
        self.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    fn application_exists(&self, job_id: JobId, student_id: UserId) -> bool {
        self.applications
            .values()
            .any(|app| app.job_id == job_id && app.student_id == student_id)
    }

    fn matches(&self, app: &Application, query: &ApplicationListQuery) -> bool {
        if !query.scope.admits(app.student_id, app.college_id) {
            return false;
        }
        let filter = &query.filter;
        if filter.status.is_some_and(|status| status != app.status) {
            return false;
        }
        if filter.job_id.is_some_and(|job_id| job_id != app.job_id) {
            return false;
        }
        let job = self.jobs.get(&app.job_id);
        if let Some(domain) = filter.job_domain {
            if job.is_none_or(|job| job.domain != domain) {
                return false;
            }
        }
        if let Some(job_type) = filter.job_type {
            if job.is_none_or(|job| job.job_type != job_type) {
                return false;
            }
        }
        if let Some(term) = &filter.search {
            let student_hit = self
                .user_names
                .get(&app.student_id)
                .is_some_and(|name| term.matches(name));
            let job_hit =
                job.is_some_and(|job| term.matches(&job.title) || term.matches(&job.company));
            if !student_hit && !job_hit {
                return false;
            }
        }
        true
    }
}

fn compare(sort: ApplicationSort, left: &Application, right: &Application) -> Ordering {
    let primary = match sort.column {
        SortColumn::CreatedAt => left.created_at.cmp(&right.created_at),
        SortColumn::Status => left.status.as_str().cmp(right.status.as_str()),
    };
    let ordering = primary.then_with(|| left.id.cmp(&right.id));
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn page_window<T>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    rows.into_iter().skip(skip).take(take).collect()
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// In-memory implementation of the persistence ports.
#[derive(Default)]
pub struct InMemoryPortal {
    tables: Mutex<Tables>,
}

impl InMemoryPortal {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        match self.tables.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Add or replace a job posting.
    pub fn insert_job(&self, job: JobSnapshot) {
        self.with_tables(|tables| {
            tables.jobs.insert(job.id, job);
        });
    }

    /// Add or replace a student profile.
    pub fn insert_profile(&self, profile: StudentProfile) {
        self.with_tables(|tables| {
            tables.profiles.insert(profile.user_id, profile);
        });
    }

    /// Record a user's display name for search.
    pub fn insert_user_name(&self, user_id: UserId, name: impl Into<String>) {
        let name = name.into();
        self.with_tables(|tables| {
            tables.user_names.insert(user_id, name);
        });
    }

    /// Insert an application directly, bypassing the confirmation flow.
    pub fn seed_application(
        &self,
        job_id: JobId,
        student_id: UserId,
        college_id: CollegeId,
        status: ApplicationStatus,
        created_at: DateTime<Utc>,
    ) -> Option<ApplicationId> {
        self.with_tables(|tables| {
            if tables.application_exists(job_id, student_id) {
                return None;
            }
            let id = ApplicationId::new(tables.next_raw_id()).ok()?;
            tables.applications.insert(
                id,
                Application {
                    id,
                    job_id,
                    student_id,
                    college_id,
                    status,
                    resume_snapshot_url: String::new(),
                    created_at,
                    updated_at: created_at,
                },
            );
            Some(id)
        })
    }

    /// Snapshot of stored intents.
    pub fn intents(&self) -> Vec<Intent> {
        self.with_tables(|tables| tables.intents.values().cloned().collect())
    }

    /// Snapshot of stored applications.
    pub fn applications(&self) -> Vec<Application> {
        self.with_tables(|tables| tables.applications.values().cloned().collect())
    }

    /// Snapshot of stored notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.with_tables(|tables| tables.notifications.values().cloned().collect())
    }
}

#[async_trait]
impl JobCatalogue for InMemoryPortal {
    async fn find_job(
        &self,
        job_id: JobId,
        college_id: CollegeId,
    ) -> Result<Option<JobSnapshot>, CatalogueError> {
        let tables = self.lock().map_err(CatalogueError::query)?;
        Ok(tables
            .jobs
            .get(&job_id)
            .filter(|job| job.college_id == college_id)
            .cloned())
    }
}

#[async_trait]
impl StudentProfiles for InMemoryPortal {
    async fn find_profile(
        &self,
        student_id: UserId,
    ) -> Result<Option<StudentProfile>, CatalogueError> {
        let tables = self.lock().map_err(CatalogueError::query)?;
        Ok(tables.profiles.get(&student_id).cloned())
    }
}

#[async_trait]
impl IntentRepository for InMemoryPortal {
    async fn reserve(
        &self,
        reservation: &IntentReservation,
        notification: NotificationDraft,
    ) -> Result<ReservedIntent, IntentRepositoryError> {
        let mut tables = self.lock().map_err(IntentRepositoryError::query)?;
        let existing = tables
            .intents
            .values()
            .find(|intent| {
                intent.job_id == reservation.job_id && intent.student_id == reservation.student_id
            })
            .map(|intent| (intent.id, intent.created_at));
        let (id, created_at) = match existing {
            Some(found) => found,
            None => {
                let id = IntentId::new(tables.next_raw_id())
                    .map_err(|err| IntentRepositoryError::query(err.to_string()))?;
                (id, reservation.reserved_at)
            }
        };
        let intent = Intent {
            id,
            job_id: reservation.job_id,
            student_id: reservation.student_id,
            college_id: reservation.college_id,
            expires_at: reservation.expires_at,
            created_at,
        };
        tables.intents.insert(id, intent.clone());
        let notification = tables
            .insert_notification(notification.targeting(id.get()))
            .map_err(IntentRepositoryError::query)?;
        Ok(ReservedIntent {
            intent,
            notification,
        })
    }

    async fn find_owned(
        &self,
        intent_id: IntentId,
        student_id: UserId,
    ) -> Result<Option<Intent>, IntentRepositoryError> {
        let tables = self.lock().map_err(IntentRepositoryError::query)?;
        Ok(tables
            .intents
            .get(&intent_id)
            .filter(|intent| intent.student_id == student_id)
            .cloned())
    }

    async fn delete(&self, intent_id: IntentId) -> Result<bool, IntentRepositoryError> {
        let mut tables = self.lock().map_err(IntentRepositoryError::query)?;
        Ok(tables.intents.remove(&intent_id).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, IntentRepositoryError> {
        let mut tables = self.lock().map_err(IntentRepositoryError::query)?;
        let before = tables.intents.len();
        tables.intents.retain(|_, intent| intent.expires_at >= now);
        Ok(count(before - tables.intents.len()))
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryPortal {
    async fn exists_for(
        &self,
        job_id: JobId,
        student_id: UserId,
    ) -> Result<bool, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables.application_exists(job_id, student_id))
    }

    async fn confirm(
        &self,
        intent: &Intent,
        application: NewApplication,
        notification: NotificationDraft,
    ) -> Result<ConfirmedApplication, ApplicationRepositoryError> {
        let mut tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        if tables.application_exists(application.job_id, application.student_id) {
            return Err(ApplicationRepositoryError::duplicate());
        }
        if !tables.intents.contains_key(&intent.id) {
            return Err(ApplicationRepositoryError::intent_consumed());
        }
        let id = ApplicationId::new(tables.next_raw_id())
            .map_err(|err| ApplicationRepositoryError::query(err.to_string()))?;
        let stored = Application {
            id,
            job_id: application.job_id,
            student_id: application.student_id,
            college_id: application.college_id,
            status: ApplicationStatus::Applied,
            resume_snapshot_url: application.resume_snapshot_url,
            created_at: application.created_at,
            updated_at: application.created_at,
        };
        let notification = tables
            .insert_notification(notification.targeting(id.get()))
            .map_err(ApplicationRepositoryError::query)?;
        tables.intents.remove(&intent.id);
        tables.applications.insert(id, stored.clone());
        Ok(ConfirmedApplication {
            application: stored,
            notification,
        })
    }

    async fn find_transition_candidates(
        &self,
        ids: &[ApplicationId],
        college_id: CollegeId,
    ) -> Result<Vec<TransitionCandidate>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.applications.get(id))
            .filter(|app| {
                tables
                    .jobs
                    .get(&app.job_id)
                    .is_some_and(|job| job.college_id == college_id)
            })
            .map(|app| TransitionCandidate {
                id: app.id,
                job_id: app.job_id,
                student_id: app.student_id,
                status: app.status,
            })
            .collect())
    }

    async fn apply_status_change(
        &self,
        change: StatusChange,
    ) -> Result<AppliedStatusChange, ApplicationRepositoryError> {
        let mut tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        if let Some(stale) =
            change.first_stale(|id| tables.applications.get(&id).map(|app| app.status))
        {
            return Err(ApplicationRepositoryError::stale_status(format!("application {stale}")));
        }
        let ids = change.ids();
        for id in &ids {
            if let Some(app) = tables.applications.get_mut(id) {
                app.status = change.status;
                app.updated_at = change.updated_at;
            }
        }
        let notifications = change
            .notifications
            .into_iter()
            .map(|draft| tables.insert_notification(draft))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApplicationRepositoryError::query)?;
        Ok(AppliedStatusChange {
            updated: count(ids.len()),
            notifications,
        })
    }

    async fn find_visible(
        &self,
        id: ApplicationId,
        scope: ListingScope,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables
            .applications
            .get(&id)
            .filter(|app| scope.admits(app.student_id, app.college_id))
            .cloned())
    }

    async fn list(
        &self,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        let mut rows: Vec<Application> = tables
            .applications
            .values()
            .filter(|app| tables.matches(app, query))
            .cloned()
            .collect();
        rows.sort_by(|left, right| compare(query.sort, left, right));
        let total = count(rows.len());
        Ok(ApplicationPage {
            rows: page_window(rows, query.page),
            total,
        })
    }
}

#[async_trait]
impl NotificationRepository for InMemoryPortal {
    async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<NotificationPage, NotificationRepositoryError> {
        let tables = self.lock().map_err(NotificationRepositoryError::query)?;
        let mut rows: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        let total = count(rows.len());
        Ok(NotificationPage {
            rows: page_window(rows, page),
            total,
        })
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut tables = self.lock().map_err(NotificationRepositoryError::query)?;
        match tables.notifications.get_mut(&id) {
            Some(notification) if notification.user_id == user_id => {
                notification.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
