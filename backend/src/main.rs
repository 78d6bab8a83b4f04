//! Portal entry-point: loads settings, prepares storage and serves the REST
//! API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use career_portal::inbound::http::health::HealthState;
use career_portal::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use career_portal::settings::PortalSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let mut config = ServerConfig::new(&settings);

    match settings.database_url.as_deref() {
        Some(url) => {
            if settings.run_migrations() {
                let migration_url = url.to_owned();
                let applied =
                    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
                        .await
                        .map_err(std::io::Error::other)?
                        .map_err(std::io::Error::other)?;
                info!(applied, "database migrations complete");
            }
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database url configured; using the in-memory store"),
    }

    info!(bind_addr = %config.bind_addr(), "starting career portal");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
