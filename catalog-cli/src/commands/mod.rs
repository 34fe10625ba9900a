//! Subcommand implementations for the catalog binary

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;

use catalog_server::db::{create_pool_with_options, pool::DEFAULT_MAX_CONNECTIONS, PgStore};

pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

/// Postgres connection flags shared by every subcommand that needs a database
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL (also read from DATABASE_URL or a .env file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    /// Open a pool and wrap it in a store
    pub async fn connect(&self) -> Result<PgStore> {
        let url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        let pool = create_pool_with_options(url, self.max_connections)
            .await
            .context("Failed to create database pool")?;

        Ok(PgStore::new(pool))
    }
}
