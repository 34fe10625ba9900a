//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use catalog_server::db::migrations;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Create the catalog tables if they are missing
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let store = args.db.connect().await?;

    migrations::run(store.pool())
        .await
        .context("Failed to run migrations")?;

    println!("Catalog schema is up to date");
    Ok(())
}
