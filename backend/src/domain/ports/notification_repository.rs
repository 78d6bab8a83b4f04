//! Driven ports for durable notifications and the transient feed.

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::Value;
use tracing::error;

use crate::domain::{Error, Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

impl From<NotificationRepositoryError> for Error {
    fn from(err: NotificationRepositoryError) -> Self {
        error!(error = %err, "notification repository failure");
        match err {
            NotificationRepositoryError::Connection { .. } => {
                Error::service_unavailable("notification store is unavailable")
            }
            NotificationRepositoryError::Query { .. } => {
                Error::internal("notification store query failed")
            }
        }
    }
}

/// One page of a user's notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPage {
    /// Notifications on the page, newest first.
    pub rows: Vec<Notification>,
    /// Notifications addressed to the user.
    pub total: u64,
}

/// Read access to durable notifications plus the read-flag mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// List notifications addressed to `user_id`, newest first.
    async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<NotificationPage, NotificationRepositoryError>;

    /// Mark a notification read if it is addressed to `user_id`. Returns
    /// whether such a notification exists.
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, NotificationRepositoryError>;
}

define_port_error! {
    /// Errors raised by transient feed adapters.
    pub enum NotificationFeedError {
        /// The feed backend could not be reached.
        Connection { message: String } => "notification feed connection failed: {message}",
        /// The push command was rejected.
        Push { message: String } => "notification feed push failed: {message}",
    }
}

/// Fire-and-forget delivery channel mirroring durable notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    /// Push `entry` onto `channel`.
    async fn push(&self, channel: &str, entry: &Value) -> Result<(), NotificationFeedError>;
}
