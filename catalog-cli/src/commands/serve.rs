//! HTTP server command
//!
//! Serves the catalog API from Postgres, or from memory with `--memory`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_server::db::{migrations, CatalogStore, MemoryStore};
use catalog_server::http::{run_server, AppState, ServerConfig};
use catalog_server::seed::seed;

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3001")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Keep the catalog in memory instead of Postgres (lost on shutdown)
    #[arg(long)]
    pub memory: bool,

    /// Load the demo catalog before serving
    #[arg(long)]
    pub seed: bool,

    /// Do not run schema migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store: Arc<dyn CatalogStore> = if args.memory {
        tracing::warn!("Using in-memory store, data will not survive shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let store = args.db.connect().await?;
        if args.skip_migrations {
            tracing::info!("Skipping migrations");
        } else {
            migrations::run(store.pool())
                .await
                .context("Failed to run migrations")?;
        }
        Arc::new(store)
    };

    if args.seed {
        let report = seed(store.as_ref())
            .await
            .context("Failed to seed demo catalog")?;
        tracing::info!(
            categories = report.categories,
            products = report.products,
            tags = report.tags,
            "Loaded demo catalog"
        );
    }

    tracing::info!("Starting catalog server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(AppState::new(store), config)
        .await
        .context("Server error")?;

    Ok(())
}
