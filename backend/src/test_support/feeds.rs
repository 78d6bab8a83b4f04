//! Notification feed doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{NotificationFeed, NotificationFeedError};

/// Feed that records every push.
#[derive(Debug, Default)]
pub struct RecordingFeed {
    pushes: Mutex<Vec<(String, Value)>>,
}

impl RecordingFeed {
    /// Snapshot of `(channel, entry)` pairs pushed so far.
    #[must_use]
    pub fn pushes(&self) -> Vec<(String, Value)> {
        match self.pushes.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => panic!("recording feed mutex"),
        }
    }
}

#[async_trait]
impl NotificationFeed for RecordingFeed {
    async fn push(&self, channel: &str, entry: &Value) -> Result<(), NotificationFeedError> {
        match self.pushes.lock() {
            Ok(mut guard) => guard.push((channel.to_owned(), entry.clone())),
            Err(_) => panic!("recording feed mutex"),
        }
        Ok(())
    }
}

/// Feed whose backend is always down.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableFeed;

#[async_trait]
impl NotificationFeed for UnreachableFeed {
    async fn push(&self, _channel: &str, _entry: &Value) -> Result<(), NotificationFeedError> {
        Err(NotificationFeedError::connection("connection refused"))
    }
}
