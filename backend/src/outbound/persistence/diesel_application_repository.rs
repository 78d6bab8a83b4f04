//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Listing queries are assembled as boxed statements so the mandatory scope
//! and each optional filter compose without string building. Job and student
//! filters resolve through `IN (SELECT ...)` subqueries against `jobs` and
//! `users`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::deadline::DEFAULT_TRANSACTION_TIMEOUT;
use crate::domain::ports::{
    AppliedStatusChange, ApplicationPage, ApplicationRepository, ApplicationRepositoryError,
    ConfirmedApplication, StatusChange,
};
use crate::domain::{
    Application, ApplicationId, ApplicationListQuery, ApplicationStatus, CollegeId, Intent, JobId,
    ListingScope, NewApplication, Notification, NotificationDraft, SortColumn, SortDirection,
    TransitionCandidate, UserId,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_helpers::{collect_rows, count_to_total, offset_for_db, set_statement_timeout};
use super::models::{
    ApplicationRow, CandidateRow, NewApplicationRow, NewNotificationRow, NotificationRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{application_intents, applications, jobs, notifications, users};

const UNIQUE_APPLICATION_CONSTRAINT: &str = "uniq_student_job";

/// Diesel-backed implementation of the application repository port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
    statement_timeout: Duration,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            statement_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Override the per-statement timeout applied inside transactions.
    #[must_use]
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }
}

/// Failure raised inside a transaction closure; converting from Diesel keeps
/// `?` usable while letting domain-specific aborts roll back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    IntentConsumed,
    StaleStatus(ApplicationId),
    RowCountMismatch { expected: usize, updated: usize },
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    map_basic_pool_error(error, |message| {
        ApplicationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    if is_unique_violation(&error, UNIQUE_APPLICATION_CONSTRAINT) {
        return ApplicationRepositoryError::duplicate();
    }
    map_basic_diesel_error(
        error,
        ApplicationRepositoryError::query,
        ApplicationRepositoryError::connection,
    )
}

fn map_tx_error(error: TxError) -> ApplicationRepositoryError {
    match error {
        TxError::Diesel(error) => map_diesel_error(error),
        TxError::IntentConsumed => ApplicationRepositoryError::intent_consumed(),
        TxError::StaleStatus(id) => {
            ApplicationRepositoryError::stale_status(format!("application {id}"))
        }
        TxError::RowCountMismatch { expected, updated } => ApplicationRepositoryError::query(
            format!("expected to update {expected} applications, updated {updated}"),
        ),
    }
}

fn to_application(row: ApplicationRow) -> Result<Application, ApplicationRepositoryError> {
    Application::try_from(row).map_err(ApplicationRepositoryError::query)
}

fn to_notifications(
    rows: Vec<NotificationRow>,
) -> Result<Vec<Notification>, ApplicationRepositoryError> {
    collect_rows(
        rows.into_iter().map(Notification::try_from),
        ApplicationRepositoryError::query,
    )
}

fn raw_ids(ids: &[ApplicationId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

type BoxedApplications = applications::BoxedQuery<'static, Pg>;

fn scoped(scope: ListingScope) -> BoxedApplications {
    let query = applications::table.into_boxed();
    match scope {
        ListingScope::Student(student_id) => {
            query.filter(applications::student_id.eq(student_id.get()))
        }
        ListingScope::College(college_id) => {
            query.filter(applications::college_id.eq(college_id.get()))
        }
        ListingScope::Unscoped => query,
    }
}

fn filtered(listing: &ApplicationListQuery) -> BoxedApplications {
    let mut query = scoped(listing.scope);
    let filter = &listing.filter;

    if let Some(status) = filter.status {
        query = query.filter(applications::status.eq(status.as_str()));
    }
    if let Some(job_id) = filter.job_id {
        query = query.filter(applications::job_id.eq(job_id.get()));
    }
    if let Some(domain) = filter.job_domain {
        query = query.filter(
            applications::job_id.eq_any(
                jobs::table
                    .filter(jobs::domain.eq(domain.as_str()))
                    .select(jobs::id),
            ),
        );
    }
    if let Some(job_type) = filter.job_type {
        query = query.filter(
            applications::job_id.eq_any(
                jobs::table
                    .filter(jobs::job_type.eq(job_type.as_str()))
                    .select(jobs::id),
            ),
        );
    }
    if let Some(term) = &filter.search {
        let pattern = term.like_pattern();
        query = query.filter(
            applications::student_id
                .eq_any(
                    users::table
                        .filter(users::name.ilike(pattern.clone()))
                        .select(users::id),
                )
                .or(applications::job_id.eq_any(
                    jobs::table
                        .filter(
                            jobs::title
                                .ilike(pattern.clone())
                                .or(jobs::company.ilike(pattern)),
                        )
                        .select(jobs::id),
                )),
        );
    }
    query
}

fn ordered(query: BoxedApplications, listing: &ApplicationListQuery) -> BoxedApplications {
    match (listing.sort.column, listing.sort.direction) {
        (SortColumn::CreatedAt, SortDirection::Desc) => {
            query.order((applications::created_at.desc(), applications::id.desc()))
        }
        (SortColumn::CreatedAt, SortDirection::Asc) => {
            query.order((applications::created_at.asc(), applications::id.asc()))
        }
        (SortColumn::Status, SortDirection::Desc) => {
            query.order((applications::status.desc(), applications::id.desc()))
        }
        (SortColumn::Status, SortDirection::Asc) => {
            query.order((applications::status.asc(), applications::id.asc()))
        }
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn exists_for(
        &self,
        job_id: JobId,
        student_id: UserId,
    ) -> Result<bool, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            applications::table
                .filter(applications::job_id.eq(job_id.get()))
                .filter(applications::student_id.eq(student_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn confirm(
        &self,
        intent: &Intent,
        application: NewApplication,
        notification: NotificationDraft,
    ) -> Result<ConfirmedApplication, ApplicationRepositoryError> {
        let intent_id = intent.id.get();
        let timeout = self.statement_timeout;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (application_row, notification_row) = conn
            .transaction(|conn| {
                async move {
                    set_statement_timeout(conn, timeout).await?;

                    let new_row = NewApplicationRow {
                        job_id: application.job_id.get(),
                        student_id: application.student_id.get(),
                        college_id: application.college_id.get(),
                        status: ApplicationStatus::Applied.as_str(),
                        resume_snapshot_url: &application.resume_snapshot_url,
                        created_at: application.created_at,
                        updated_at: application.created_at,
                    };
                    let application_row: ApplicationRow =
                        diesel::insert_into(applications::table)
                            .values(&new_row)
                            .returning(ApplicationRow::as_returning())
                            .get_result(conn)
                            .await?;

                    let removed = diesel::delete(
                        application_intents::table
                            .filter(application_intents::id.eq(intent_id)),
                    )
                    .execute(conn)
                    .await?;
                    if removed == 0 {
                        return Err(TxError::IntentConsumed);
                    }

                    let draft = notification.targeting(application_row.id);
                    let notification_row: NotificationRow =
                        diesel::insert_into(notifications::table)
                            .values(&NewNotificationRow::from(&draft))
                            .returning(NotificationRow::as_returning())
                            .get_result(conn)
                            .await?;

                    Ok((application_row, notification_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        let notification = Notification::try_from(notification_row)
            .map_err(ApplicationRepositoryError::query)?;
        Ok(ConfirmedApplication {
            application: to_application(application_row)?,
            notification,
        })
    }

    async fn find_transition_candidates(
        &self,
        ids: &[ApplicationId],
        college_id: CollegeId,
    ) -> Result<Vec<TransitionCandidate>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CandidateRow> = applications::table
            .inner_join(jobs::table)
            .filter(applications::id.eq_any(raw_ids(ids)))
            .filter(jobs::college_id.eq(college_id.get()))
            .select(CandidateRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(
            rows.into_iter().map(TransitionCandidate::try_from),
            ApplicationRepositoryError::query,
        )
    }

    async fn apply_status_change(
        &self,
        change: StatusChange,
    ) -> Result<AppliedStatusChange, ApplicationRepositoryError> {
        let ids = raw_ids(&change.ids());
        let expected = ids.len();
        let timeout = self.statement_timeout;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (updated, notification_rows) = conn
            .transaction(|conn| {
                async move {
                    set_statement_timeout(conn, timeout).await?;

                    let locked: Vec<(i64, String)> = applications::table
                        .filter(applications::id.eq_any(&ids))
                        .select((applications::id, applications::status))
                        .for_update()
                        .load(conn)
                        .await?;
                    let locked: HashMap<i64, String> = locked.into_iter().collect();
                    let stale = change.first_stale(|id| {
                        locked.get(&id.get()).and_then(|raw| raw.parse().ok())
                    });
                    if let Some(id) = stale {
                        return Err(TxError::StaleStatus(id));
                    }

                    let updated = diesel::update(
                        applications::table.filter(applications::id.eq_any(&ids)),
                    )
                    .set((
                        applications::status.eq(change.status.as_str()),
                        applications::updated_at.eq(change.updated_at),
                    ))
                    .execute(conn)
                    .await?;
                    if updated != expected {
                        return Err(TxError::RowCountMismatch { expected, updated });
                    }

                    let rows: Vec<NotificationRow> = if change.notifications.is_empty() {
                        Vec::new()
                    } else {
                        let new_rows: Vec<NewNotificationRow<'_>> = change
                            .notifications
                            .iter()
                            .map(NewNotificationRow::from)
                            .collect();
                        diesel::insert_into(notifications::table)
                            .values(&new_rows)
                            .returning(NotificationRow::as_returning())
                            .get_results(conn)
                            .await?
                    };

                    Ok((updated, rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        Ok(AppliedStatusChange {
            updated: u64::try_from(updated).unwrap_or(u64::MAX),
            notifications: to_notifications(notification_rows)?,
        })
    }

    async fn find_visible(
        &self,
        id: ApplicationId,
        scope: ListingScope,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = scoped(scope)
            .filter(applications::id.eq(id.get()))
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_application).transpose()
    }

    async fn list(
        &self,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<ApplicationRow> = ordered(filtered(query), query)
            .select(ApplicationRow::as_select())
            .offset(offset_for_db(query.page.offset()))
            .limit(i64::from(query.page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ApplicationPage {
            rows: collect_rows(
                rows.into_iter().map(Application::try_from),
                ApplicationRepositoryError::query,
            )?,
            total: count_to_total(total),
        })
    }
}
