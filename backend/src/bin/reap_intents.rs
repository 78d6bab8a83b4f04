//! Delete application intents whose reservation window has closed.
//!
//! Expired intents are already ignored by confirmation; this keeps the table
//! small. Safe to run at any time, including concurrently with the server.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin reap-intents -- \
//!     --database-url postgres://portal@localhost/portal
//! ```

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use career_portal::domain::ports::IntentRepository;
use career_portal::outbound::persistence::{DbPool, DieselIntentRepository, PoolConfig};

const DATABASE_URL_ENV: &str = "PORTAL_DATABASE_URL";

#[derive(Debug, Parser)]
#[command(name = "reap-intents", about = "Delete expired application intents")]
struct Cli {
    /// PostgreSQL URL; defaults to `PORTAL_DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        return Err(eyre!("tracing init failed: {err}"));
    }

    let cli = Cli::parse();
    let database_url = match cli.database_url {
        Some(url) => url,
        None => std::env::var(DATABASE_URL_ENV)
            .wrap_err_with(|| format!("pass --database-url or set {DATABASE_URL_ENV}"))?,
    };

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build reaper runtime")?;
    let removed = runtime.block_on(async move {
        let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
            .await
            .wrap_err("failed to open database pool")?;
        DieselIntentRepository::new(pool)
            .delete_expired(Utc::now())
            .await
            .wrap_err("failed to delete expired intents")
    })?;

    info!(removed, "expired intents deleted");
    Ok(())
}
