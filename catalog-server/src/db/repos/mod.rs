//! Postgres repositories
//!
//! Each repository follows these patterns:
//! - Record graphs are loaded with one JOIN query (no N+1)
//! - Multi-table writes run in a single transaction
//! - Join rows are diffed against the request, never wiped blindly

pub(crate) mod associations;
pub mod categories;
pub mod products;
pub mod tags;

pub use categories::CategoryRepo;
pub use products::ProductRepo;
pub use tags::TagRepo;

use sqlx::postgres::PgRow;
use sqlx::Row;

use super::records::ProductSummary;
use crate::models::Id;

/// Read the optional product columns of a LEFT JOIN row.
///
/// Expects `product_id`, `product_name`, `price` and `stock` columns;
/// `category_id` is read from the row unless the caller already knows it.
pub(crate) fn product_summary(
    row: &PgRow,
    category_id: Option<Id>,
) -> Result<Option<ProductSummary>, sqlx::Error> {
    let Some(id) = row.try_get::<Option<Id>, _>("product_id")? else {
        return Ok(None);
    };

    let category_id = match category_id {
        Some(category_id) => category_id,
        None => row.try_get("category_id")?,
    };

    Ok(Some(ProductSummary {
        id,
        product_name: row.try_get("product_name")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
        category_id,
    }))
}
