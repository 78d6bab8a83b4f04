//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use career_portal::domain::Deadlines;
use career_portal::outbound::persistence::DbPool;
use career_portal::settings::PortalSettings;
use chrono::TimeDelta;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis_url: Option<String>,
    pub(crate) intent_ttl: TimeDelta,
    pub(crate) deadlines: Deadlines,
}

impl ServerConfig {
    /// Construct a server configuration from loaded settings. Adapters fall
    /// back to the in-memory store until a pool is attached.
    #[must_use]
    pub fn new(settings: &PortalSettings) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            db_pool: None,
            redis_url: settings.redis_url.clone(),
            intent_ttl: settings.intent_ttl(),
            deadlines: settings.deadlines(),
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
