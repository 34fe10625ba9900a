//! Demo data command

use anyhow::{Context, Result};
use clap::Parser;

use catalog_server::db::migrations;
use catalog_server::seed::seed;

use super::DatabaseArgs;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Do not create missing tables first
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Insert the demo categories, tags and products
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let store = args.db.connect().await?;

    if !args.skip_migrations {
        migrations::run(store.pool())
            .await
            .context("Failed to run migrations")?;
    }

    let report = seed(&store).await.context("Failed to seed demo catalog")?;

    println!(
        "Seeded {} categories, {} tags and {} products",
        report.categories, report.tags, report.products
    );
    Ok(())
}
