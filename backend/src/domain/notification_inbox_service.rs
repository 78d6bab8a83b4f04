//! Durable notification inbox.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use super::deadline::{Deadlines, within};
use super::ports::{NotificationInbox, NotificationRepository};
use super::{Error, Notification, NotificationId, Principal};

/// Service implementing [`NotificationInbox`].
pub struct NotificationInboxService<N> {
    notifications: Arc<N>,
    deadlines: Deadlines,
}

impl<N> NotificationInboxService<N> {
    /// Create the service with default deadlines.
    pub fn new(notifications: Arc<N>) -> Self {
        Self {
            notifications,
            deadlines: Deadlines::default(),
        }
    }

    /// Replace the store deadline.
    #[must_use]
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}

#[async_trait]
impl<N> NotificationInbox for NotificationInboxService<N>
where
    N: NotificationRepository,
{
    async fn list(
        &self,
        principal: &Principal,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, Error> {
        let result = within(
            self.deadlines.transaction,
            "notification listing",
            self.notifications.list_for_user(principal.user_id(), page),
        )
        .await?;
        Ok(Paginated::new(result.rows, page, result.total))
    }

    async fn mark_read(&self, principal: &Principal, id: NotificationId) -> Result<(), Error> {
        let found = within(
            self.deadlines.transaction,
            "notification update",
            self.notifications.mark_read(id, principal.user_id()),
        )
        .await?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(format!("notification {id} not found")))
        }
    }
}
