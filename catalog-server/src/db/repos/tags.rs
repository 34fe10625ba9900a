//! Tag repository
//!
//! Tag writes carry their product set, so create and update run the tag
//! row and the edge replacement in one transaction.

use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};

use super::super::records::Tag;
use super::super::DbError;
use super::associations::{
    delete_links, ensure_exist, insert_links, replace_links, LinkOwner, Referenced,
};
use super::product_summary;
use crate::models::{Id, NewTag, TagName, TagPatch};

const TAG_GRAPH: &str = r#"
    SELECT
        t.id,
        t.tag_name,
        p.id AS product_id,
        p.product_name,
        p.price,
        p.stock,
        p.category_id
    FROM tag t
    LEFT JOIN product_tag pt ON pt.tag_id = t.id
    LEFT JOIN product p ON p.id = pt.product_id
"#;

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, DbError> {
        let sql = format!("{TAG_GRAPH} ORDER BY t.id, p.id");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        Ok(fold_tags(rows)?)
    }

    pub async fn get(&self, id: Id) -> Result<Tag, DbError> {
        fetch_tag(self.pool, id)
            .await?
            .ok_or_else(|| DbError::not_found("tag", id))
    }

    /// Create a tag attached to the given products (atomic).
    pub async fn create(&self, new: NewTag) -> Result<Tag, DbError> {
        let mut tx = self.pool.begin().await?;

        ensure_exist(&mut tx, Referenced::Product, &new.product_ids).await?;

        let id: Id = sqlx::query_scalar("INSERT INTO tag (tag_name) VALUES ($1) RETURNING id")
            .bind(new.name.as_str())
            .fetch_one(&mut *tx)
            .await?;

        insert_links(&mut tx, LinkOwner::Tag(id), new.product_ids.as_slice()).await?;

        let tag = fetch_tag(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("tag", id))?;

        tx.commit().await?;
        Ok(tag)
    }

    /// Rename the tag and, when given, replace its product set (atomic).
    pub async fn update(&self, id: Id, patch: TagPatch) -> Result<Tag, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<Id> = sqlx::query_scalar(
            r#"
            UPDATE tag
            SET tag_name = COALESCE($2, tag_name)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.name.as_ref().map(TagName::as_str))
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(DbError::not_found("tag", id));
        }

        if let Some(product_ids) = &patch.product_ids {
            ensure_exist(&mut tx, Referenced::Product, product_ids).await?;
            replace_links(&mut tx, LinkOwner::Tag(id), product_ids).await?;
        }

        let tag = fetch_tag(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("tag", id))?;

        tx.commit().await?;
        Ok(tag)
    }

    /// Delete a tag and all of its product edges (atomic).
    pub async fn delete(&self, id: Id) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        delete_links(&mut tx, LinkOwner::Tag(id)).await?;

        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("tag", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn fetch_tag<'e, E>(executor: E, id: Id) -> Result<Option<Tag>, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{TAG_GRAPH} WHERE t.id = $1 ORDER BY p.id");
    let rows = sqlx::query(&sql).bind(id).fetch_all(executor).await?;
    Ok(fold_tags(rows)?.pop())
}

/// Collapse (tag, product) rows ordered by tag id.
fn fold_tags(rows: Vec<PgRow>) -> Result<Vec<Tag>, sqlx::Error> {
    let mut tags: Vec<Tag> = Vec::new();

    for row in rows {
        let id: Id = row.try_get("id")?;
        if tags.last().map(|t| t.id) != Some(id) {
            tags.push(Tag {
                id,
                tag_name: row.try_get("tag_name")?,
                products: Vec::new(),
            });
        }

        if let (Some(product), Some(tag)) = (product_summary(&row, None)?, tags.last_mut()) {
            tag.products.push(product);
        }
    }

    Ok(tags)
}
