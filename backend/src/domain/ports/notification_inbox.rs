//! Driving port for the durable notification inbox.
//!
//! Feed consumers treat a feed entry as a wake-up hint and reconcile against
//! this inbox.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, Notification, NotificationId, Principal};

/// Reads and the read-flag mutation over the caller's notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// List the caller's notifications, newest first.
    async fn list(
        &self,
        principal: &Principal,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, Error>;

    /// Mark one of the caller's notifications read.
    async fn mark_read(&self, principal: &Principal, id: NotificationId) -> Result<(), Error>;
}
