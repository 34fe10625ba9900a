//! Schema migrations for the catalog tables
//!
//! Every statement is idempotent, so `run` is safe on every startup.

use sqlx::PgPool;

use super::DbError;

/// Run all catalog migrations
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running catalog migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS category (
            id SERIAL PRIMARY KEY,
            category_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // A category cannot be dropped while products still point at it
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product (
            id SERIAL PRIMARY KEY,
            product_name TEXT NOT NULL,
            price NUMERIC(10, 2) NOT NULL CHECK (price > 0),
            stock INTEGER NOT NULL DEFAULT 10 CHECK (stock >= 0),
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tag (
            id SERIAL PRIMARY KEY,
            tag_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_tag (
            id SERIAL PRIMARY KEY,
            product_id INTEGER NOT NULL REFERENCES product(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
            UNIQUE (product_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Catalog migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_product_category ON product(category_id)")
        .execute(pool)
        .await?;

    // (product_id, tag_id) is covered by the unique constraint
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_product_tag_tag ON product_tag(tag_id)")
        .execute(pool)
        .await?;

    Ok(())
}
