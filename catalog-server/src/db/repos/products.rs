//! Product repository
//!
//! The only repository whose writes always span two tables:
//! - create: product row + tag edges in one transaction
//! - update: scalar fields + tag set replacement in one transaction
//! - delete: tag edges + product row in one transaction

use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};

use super::super::records::{CategoryRef, Product, TagRef};
use super::super::DbError;
use super::associations::{
    delete_links, ensure_exist, insert_links, replace_links, LinkOwner, Referenced,
};
use crate::models::{Id, IdList, NewProduct, ProductName, ProductPatch};

const PRODUCT_GRAPH: &str = r#"
    SELECT
        p.id,
        p.product_name,
        p.price,
        p.stock,
        p.category_id,
        c.category_name,
        t.id AS tag_id,
        t.tag_name
    FROM product p
    JOIN category c ON c.id = p.category_id
    LEFT JOIN product_tag pt ON pt.product_id = p.id
    LEFT JOIN tag t ON t.id = pt.tag_id
"#;

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with category and tags in a single query.
    pub async fn list(&self) -> Result<Vec<Product>, DbError> {
        let sql = format!("{PRODUCT_GRAPH} ORDER BY p.id, t.id");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        Ok(fold_products(rows)?)
    }

    pub async fn get(&self, id: Id) -> Result<Product, DbError> {
        fetch_product(self.pool, id)
            .await?
            .ok_or_else(|| DbError::not_found("product", id))
    }

    /// Create a product with its tags (atomic).
    ///
    /// The category and every tag are checked inside the transaction; a
    /// missing reference rolls the whole write back. The response is read
    /// after commit.
    pub async fn create(&self, new: NewProduct) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        ensure_exist(&mut tx, Referenced::Category, &IdList::new(vec![new.category_id])).await?;
        ensure_exist(&mut tx, Referenced::Tag, &new.tag_ids).await?;

        let id: Id = sqlx::query_scalar(
            r#"
            INSERT INTO product (product_name, price, stock, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.price.value())
        .bind(new.stock.value())
        .bind(new.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Referenced::Category.reference_error(e, &[new.category_id]))?;

        insert_links(&mut tx, LinkOwner::Product(id), new.tag_ids.as_slice()).await?;

        tx.commit().await?;
        tracing::debug!(product_id = id, tags = new.tag_ids.len(), "product committed");

        self.get(id).await
    }

    /// Apply a partial update and, when given, replace the tag set (atomic).
    pub async fn update(&self, id: Id, patch: ProductPatch) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Id> = sqlx::query_scalar("SELECT id FROM product WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(DbError::not_found("product", id));
        }

        if let Some(category_id) = patch.category_id {
            ensure_exist(&mut tx, Referenced::Category, &IdList::new(vec![category_id])).await?;
        }
        if let Some(tag_ids) = &patch.tag_ids {
            ensure_exist(&mut tx, Referenced::Tag, tag_ids).await?;
        }

        sqlx::query(
            r#"
            UPDATE product
            SET product_name = COALESCE($2, product_name),
                price = COALESCE($3, price),
                stock = COALESCE($4, stock),
                category_id = COALESCE($5, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name.as_ref().map(ProductName::as_str))
        .bind(patch.price.map(|p| p.value()))
        .bind(patch.stock.map(|s| s.value()))
        .bind(patch.category_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let ids: Vec<Id> = patch.category_id.into_iter().collect();
            Referenced::Category.reference_error(e, &ids)
        })?;

        if let Some(tag_ids) = &patch.tag_ids {
            replace_links(&mut tx, LinkOwner::Product(id), tag_ids).await?;
        }

        let product = fetch_product(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("product", id))?;

        tx.commit().await?;
        Ok(product)
    }

    /// Delete a product and all of its tag edges (atomic).
    pub async fn delete(&self, id: Id) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let edges = delete_links(&mut tx, LinkOwner::Product(id)).await?;

        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Dropping tx rolls back the edge delete
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }

        tx.commit().await?;
        tracing::debug!(product_id = id, edges, "product deleted");
        Ok(())
    }
}

async fn fetch_product<'e, E>(executor: E, id: Id) -> Result<Option<Product>, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{PRODUCT_GRAPH} WHERE p.id = $1 ORDER BY t.id");
    let rows = sqlx::query(&sql).bind(id).fetch_all(executor).await?;
    Ok(fold_products(rows)?.pop())
}

/// Collapse (product, tag) rows ordered by product id.
fn fold_products(rows: Vec<PgRow>) -> Result<Vec<Product>, sqlx::Error> {
    let mut products: Vec<Product> = Vec::new();

    for row in rows {
        let id: Id = row.try_get("id")?;
        if products.last().map(|p| p.id) != Some(id) {
            let category_id: Id = row.try_get("category_id")?;
            products.push(Product {
                id,
                product_name: row.try_get("product_name")?,
                price: row.try_get("price")?,
                stock: row.try_get("stock")?,
                category_id,
                category: CategoryRef {
                    id: category_id,
                    category_name: row.try_get("category_name")?,
                },
                tags: Vec::new(),
            });
        }

        let tag_id: Option<Id> = row.try_get("tag_id")?;
        if let (Some(tag_id), Some(product)) = (tag_id, products.last_mut()) {
            product.tags.push(TagRef {
                id: tag_id,
                tag_name: row.try_get("tag_name")?,
            });
        }
    }

    Ok(products)
}
