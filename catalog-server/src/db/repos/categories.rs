//! Category repository
//!
//! Single-table writes; reads JOIN the owned products.

use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};

use super::super::error::is_foreign_key_violation;
use super::super::records::Category;
use super::super::DbError;
use super::product_summary;
use crate::models::{CategoryName, CategoryPatch, Id, NewCategory};

const CATEGORY_GRAPH: &str = r#"
    SELECT
        c.id,
        c.category_name,
        p.id AS product_id,
        p.product_name,
        p.price,
        p.stock
    FROM category c
    LEFT JOIN product p ON p.category_id = c.id
"#;

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories with their products.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let sql = format!("{CATEGORY_GRAPH} ORDER BY c.id, p.id");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        Ok(fold_categories(rows)?)
    }

    /// Get a single category with its products.
    pub async fn get(&self, id: Id) -> Result<Category, DbError> {
        fetch_category(self.pool, id)
            .await?
            .ok_or_else(|| DbError::not_found("category", id))
    }

    pub async fn create(&self, new: NewCategory) -> Result<Category, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO category (category_name)
            VALUES ($1)
            RETURNING id, category_name
            "#,
        )
        .bind(new.name.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(Category {
            id: row.try_get("id")?,
            category_name: row.try_get("category_name")?,
            products: Vec::new(),
        })
    }

    pub async fn update(&self, id: Id, patch: CategoryPatch) -> Result<Category, DbError> {
        let updated: Option<Id> = sqlx::query_scalar(
            r#"
            UPDATE category
            SET category_name = COALESCE($2, category_name)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.name.as_ref().map(CategoryName::as_str))
        .fetch_optional(self.pool)
        .await?;

        if updated.is_none() {
            return Err(DbError::not_found("category", id));
        }

        self.get(id).await
    }

    /// Delete a category. Products are never cascaded; a category that
    /// still owns products is a conflict.
    pub async fn delete(&self, id: Id) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DbError::Conflict {
                        message: format!("category '{}' still has products", id),
                    }
                } else {
                    DbError::Sqlx(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("category", id));
        }

        Ok(())
    }
}

async fn fetch_category<'e, E>(executor: E, id: Id) -> Result<Option<Category>, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{CATEGORY_GRAPH} WHERE c.id = $1 ORDER BY p.id");
    let rows = sqlx::query(&sql).bind(id).fetch_all(executor).await?;
    Ok(fold_categories(rows)?.pop())
}

/// Collapse (category, product) rows ordered by category id.
fn fold_categories(rows: Vec<PgRow>) -> Result<Vec<Category>, sqlx::Error> {
    let mut categories: Vec<Category> = Vec::new();

    for row in rows {
        let id: Id = row.try_get("id")?;
        if categories.last().map(|c| c.id) != Some(id) {
            categories.push(Category {
                id,
                category_name: row.try_get("category_name")?,
                products: Vec::new(),
            });
        }

        if let (Some(product), Some(category)) =
            (product_summary(&row, Some(id))?, categories.last_mut())
        {
            category.products.push(product);
        }
    }

    Ok(categories)
}
