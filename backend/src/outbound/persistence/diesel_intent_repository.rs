//! PostgreSQL-backed `IntentRepository` implementation using Diesel ORM.
//!
//! Reservations upsert on the `(job_id, student_id)` unique key and insert the
//! apply-intent notification in the same transaction.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::deadline::DEFAULT_TRANSACTION_TIMEOUT;
use crate::domain::ports::{IntentRepository, IntentRepositoryError, ReservedIntent};
use crate::domain::{Intent, IntentId, IntentReservation, Notification, NotificationDraft, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::set_statement_timeout;
use super::models::{IntentRow, NewIntentRow, NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{application_intents, notifications};

/// Diesel-backed implementation of the intent repository port.
#[derive(Clone)]
pub struct DieselIntentRepository {
    pool: DbPool,
    statement_timeout: Duration,
}

impl DieselIntentRepository {
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

fn map_pool_error(error: PoolError) -> IntentRepositoryError {
    map_basic_pool_error(error, |message| IntentRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> IntentRepositoryError {
    map_basic_diesel_error(
        error,
        IntentRepositoryError::query,
        IntentRepositoryError::connection,
    )
}

fn to_intent(row: IntentRow) -> Result<Intent, IntentRepositoryError> {
    Intent::try_from(row).map_err(IntentRepositoryError::query)
}

fn to_notification(row: NotificationRow) -> Result<Notification, IntentRepositoryError> {
    Notification::try_from(row).map_err(IntentRepositoryError::query)
}

#[async_trait]
impl IntentRepository for DieselIntentRepository {
    async fn reserve(
        &self,
        reservation: &IntentReservation,
        notification: NotificationDraft,
    ) -> Result<ReservedIntent, IntentRepositoryError> {
        let new_row = NewIntentRow {
            job_id: reservation.job_id.get(),
            student_id: reservation.student_id.get(),
            college_id: reservation.college_id.get(),
            expires_at: reservation.expires_at,
            created_at: reservation.reserved_at,
        };
        let timeout = self.statement_timeout;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (intent_row, notification_row) = conn
            .transaction(|conn| {
                async move {
                    set_statement_timeout(conn, timeout).await?;

                    let intent_row: IntentRow = diesel::insert_into(application_intents::table)
                        .values(&new_row)
                        .on_conflict((application_intents::job_id, application_intents::student_id))
                        .do_update()
                        .set((
                            application_intents::expires_at
                                .eq(excluded(application_intents::expires_at)),
                            application_intents::college_id
                                .eq(excluded(application_intents::college_id)),
                        ))
                        .returning(IntentRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let draft = notification.targeting(intent_row.id);
                    let notification_row: NotificationRow =
                        diesel::insert_into(notifications::table)
                            .values(&NewNotificationRow::from(&draft))
                            .returning(NotificationRow::as_returning())
                            .get_result(conn)
                            .await?;

                    Ok::<_, diesel::result::Error>((intent_row, notification_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(ReservedIntent {
            intent: to_intent(intent_row)?,
            notification: to_notification(notification_row)?,
        })
    }

    async fn find_owned(
        &self,
        intent_id: IntentId,
        student_id: UserId,
    ) -> Result<Option<Intent>, IntentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IntentRow> = application_intents::table
            .filter(application_intents::id.eq(intent_id.get()))
            .filter(application_intents::student_id.eq(student_id.get()))
            .select(IntentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_intent).transpose()
    }

    async fn delete(&self, intent_id: IntentId) -> Result<bool, IntentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            application_intents::table.filter(application_intents::id.eq(intent_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, IntentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            application_intents::table.filter(application_intents::expires_at.lt(now)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
