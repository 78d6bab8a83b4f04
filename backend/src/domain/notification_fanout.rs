//! Best-effort fan-out of committed notifications onto the transient feed.
//!
//! Services call a [`PostCommitHook`] only after their transaction commits.
//! The hook never reports failure to its caller: the durable notification row
//! is authoritative and feed consumers reconcile against it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::deadline::DEFAULT_FEED_TIMEOUT;
use super::ports::NotificationFeed;
use super::{Notification, NotificationKind};

/// Prefix of the per-user feed channel.
pub const USER_CHANNEL_PREFIX: &str = "notifications:user:";
/// Shared channel drained by the status-update delivery worker.
pub const SHARED_QUEUE_CHANNEL: &str = "notifications:queue";

/// Feed channel a notification is pushed to.
#[must_use]
pub fn channel_for(notification: &Notification) -> String {
    match notification.kind {
        NotificationKind::ApplicationStatusUpdate => SHARED_QUEUE_CHANNEL.to_owned(),
        NotificationKind::NewJob
        | NotificationKind::JobApplyIntent
        | NotificationKind::JobApplied
        | NotificationKind::DiscussionUpdate => {
            format!("{USER_CHANNEL_PREFIX}{}", notification.user_id)
        }
    }
}

/// Feed entry mirroring a durable notification.
#[must_use]
pub fn feed_entry(notification: &Notification) -> Value {
    json!({
        "notification_id": notification.id,
        "user_id": notification.user_id,
        "type": notification.kind,
        "target_id": notification.target_id,
        "payload": notification.payload,
        "is_read": notification.is_read,
        "created_at": notification.created_at,
    })
}

/// Outcome of one fan-out pass, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanoutReport {
    /// Entries accepted by the feed.
    pub delivered: usize,
    /// Entries dropped after an error or timeout.
    pub failed: usize,
}

impl FanoutReport {
    /// Log the pass against the workflow `operation` that committed it. A
    /// pass with drops is a warning; a clean pass is debug output.
    pub fn log(&self, operation: &'static str) {
        if self.failed > 0 {
            warn!(
                operation,
                delivered = self.delivered,
                failed = self.failed,
                "feed fan-out dropped notifications"
            );
        } else {
            debug!(operation, delivered = self.delivered, "feed fan-out complete");
        }
    }
}

/// Work run after a workflow transaction commits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommitHook: Send + Sync {
    /// React to notifications committed by the caller's transaction.
    async fn after_commit(&self, committed: &[Notification]) -> FanoutReport;
}

/// [`PostCommitHook`] pushing each committed notification onto a feed.
pub struct FeedFanout<F> {
    feed: Arc<F>,
    timeout: Duration,
}

impl<F> FeedFanout<F> {
    /// Fan out through `feed` with the default per-push deadline.
    pub fn new(feed: Arc<F>) -> Self {
        Self {
            feed,
            timeout: DEFAULT_FEED_TIMEOUT,
        }
    }

    /// Override the per-push deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<F> PostCommitHook for FeedFanout<F>
where
    F: NotificationFeed,
{
    async fn after_commit(&self, committed: &[Notification]) -> FanoutReport {
        let mut report = FanoutReport::default();
        for notification in committed {
            let channel = channel_for(notification);
            let entry = feed_entry(notification);
            match tokio::time::timeout(self.timeout, self.feed.push(&channel, &entry)).await {
                Ok(Ok(())) => {
                    debug!(%channel, notification_id = %notification.id, "feed entry pushed");
                    report.delivered += 1;
                }
                Ok(Err(error)) => {
                    warn!(%channel, notification_id = %notification.id, %error, "feed push failed");
                    report.failed += 1;
                }
                Err(_elapsed) => {
                    warn!(%channel, notification_id = %notification.id, "feed push timed out");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "notification_fanout_tests.rs"]
mod tests;
