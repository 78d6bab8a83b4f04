//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `PORTAL_*` environment variables, an optional
//! configuration file and command-line flags, in increasing precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_INTENT_TTL_HOURS, Deadlines};

/// Listener used when no bind address is configured.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Configuration for the portal server and operator binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Redis URL for the transient feed. Pushes are only logged when absent.
    pub redis_url: Option<String>,
    /// Lifetime of a reservation, in hours.
    #[ortho_config(default = 24)]
    pub intent_ttl_hours: u32,
    /// Deadline for each store call, in milliseconds.
    #[ortho_config(default = 5000)]
    pub transaction_timeout_ms: u64,
    /// Deadline for each feed push, in milliseconds.
    #[ortho_config(default = 1000)]
    pub feed_timeout_ms: u64,
    /// Apply pending migrations before serving. Read through
    /// [`PortalSettings::run_migrations`].
    pub run_migrations: Option<bool>,
}

impl PortalSettings {
    /// Return the configured listener, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Whether pending migrations run at startup. Off unless requested.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(false)
    }

    /// Reservation lifetime. Zero falls back to the default.
    pub fn intent_ttl(&self) -> TimeDelta {
        let hours = match self.intent_ttl_hours {
            0 => DEFAULT_INTENT_TTL_HOURS,
            hours => hours,
        };
        TimeDelta::hours(i64::from(hours))
    }

    /// Store and feed deadlines.
    pub fn deadlines(&self) -> Deadlines {
        Deadlines {
            transaction: Duration::from_millis(self.transaction_timeout_ms.max(1)),
            feed: Duration::from_millis(self.feed_timeout_ms.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "PORTAL_BIND_ADDR",
        "PORTAL_DATABASE_URL",
        "PORTAL_REDIS_URL",
        "PORTAL_INTENT_TTL_HOURS",
        "PORTAL_TRANSACTION_TIMEOUT_MS",
        "PORTAL_FEED_TIMEOUT_MS",
        "PORTAL_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("career-portal")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url.is_none());
        assert!(settings.redis_url.is_none());
        assert_eq!(settings.intent_ttl(), TimeDelta::hours(24));
        assert_eq!(settings.deadlines(), Deadlines::default());
        assert!(!settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PORTAL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "PORTAL_DATABASE_URL",
                Some("postgres://portal@localhost/portal".to_owned()),
            ),
            ("PORTAL_REDIS_URL", Some("redis://localhost:6379".to_owned())),
            ("PORTAL_INTENT_TTL_HOURS", Some("48".to_owned())),
            ("PORTAL_TRANSACTION_TIMEOUT_MS", Some("250".to_owned())),
            ("PORTAL_FEED_TIMEOUT_MS", Some("100".to_owned())),
            ("PORTAL_RUN_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("valid addr")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://portal@localhost/portal")
        );
        assert_eq!(settings.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(settings.intent_ttl(), TimeDelta::hours(48));
        assert_eq!(settings.deadlines().transaction, Duration::from_millis(250));
        assert_eq!(settings.deadlines().feed, Duration::from_millis(100));
        assert!(settings.run_migrations());
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("false"), false)]
    #[case(Some("true"), true)]
    fn migrations_toggle_follows_environment(
        #[case] raw: Option<&str>,
        #[case] expected: bool,
    ) {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "PORTAL_RUN_MIGRATIONS")
                .then(|| raw.map(str::to_owned))
                .flatten();
            (name, value)
        }));

        let settings = load_from_empty_args();
        assert_eq!(settings.run_migrations(), expected);
    }

    #[rstest]
    fn zero_ttl_falls_back_to_default() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "PORTAL_INTENT_TTL_HOURS").then(|| "0".to_owned());
            (name, value)
        }));

        let settings = load_from_empty_args();
        assert_eq!(settings.intent_ttl(), TimeDelta::hours(24));
    }
}
