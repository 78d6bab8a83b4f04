//! Transient notification feed adapters.
//!
//! [`RedisNotificationFeed`] LPUSHes serialised entries onto Redis lists via
//! a `bb8-redis` pool. [`LoggingFeed`] stands in when no Redis URL is
//! configured and only records the push at debug level.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{NotificationFeed, NotificationFeedError};

const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(1);

/// Redis-backed feed.
#[derive(Clone)]
pub struct RedisNotificationFeed {
    pool: Pool<RedisConnectionManager>,
}

impl RedisNotificationFeed {
    /// Build a pool for `redis_url`.
    ///
    /// The pool is built lazily: an unreachable server surfaces on the first
    /// push, where the fan-out logs and counts it, rather than at startup.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationFeedError::Connection`] when the URL is invalid.
    pub fn connect_lazy(redis_url: &str, max_size: u32) -> Result<Self, NotificationFeedError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| NotificationFeedError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(max_size.max(1))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build_unchecked(manager);
        Ok(Self { pool })
    }
}

#[async_trait]
impl NotificationFeed for RedisNotificationFeed {
    async fn push(&self, channel: &str, entry: &Value) -> Result<(), NotificationFeedError> {
        let payload = serde_json::to_string(entry)
            .map_err(|err| NotificationFeedError::push(err.to_string()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| NotificationFeedError::connection(err.to_string()))?;
        let _: i64 = conn
            .lpush(channel, payload)
            .await
            .map_err(|err| NotificationFeedError::push(err.to_string()))?;
        Ok(())
    }
}

/// Feed that only logs pushes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFeed;

#[async_trait]
impl NotificationFeed for LoggingFeed {
    async fn push(&self, channel: &str, entry: &Value) -> Result<(), NotificationFeedError> {
        debug!(channel, %entry, "notification feed disabled; dropping entry");
        Ok(())
    }
}
