//! Shared product_tag plumbing for the product and tag repositories
//!
//! All helpers take a `&mut PgConnection` so callers run them inside their
//! own transaction. SQL is selected from static strings per table; no
//! identifier is ever interpolated from input.

use std::collections::BTreeSet;

use sqlx::PgConnection;

use super::super::error::is_foreign_key_violation;
use super::super::DbError;
use crate::models::{AssociationDiff, Id, IdList, ValidationError};

/// Tables a write may reference by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Referenced {
    Category,
    Product,
    Tag,
}

impl Referenced {
    pub(crate) fn resource(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
            Self::Tag => "tag",
        }
    }

    fn lookup_sql(self) -> &'static str {
        match self {
            Self::Category => "SELECT id FROM category WHERE id = ANY($1) FOR KEY SHARE",
            Self::Product => "SELECT id FROM product WHERE id = ANY($1) FOR KEY SHARE",
            Self::Tag => "SELECT id FROM tag WHERE id = ANY($1) FOR KEY SHARE",
        }
    }

    /// Map a foreign-key violation to a validation error.
    ///
    /// Postgres does not say which row was missing, so a single id is
    /// reported as unknown and a longer list only as "one of".
    pub(crate) fn reference_error(self, err: sqlx::Error, ids: &[Id]) -> DbError {
        if !is_foreign_key_violation(&err) {
            return DbError::Sqlx(err);
        }

        match ids {
            [id] => ValidationError::UnknownReference {
                resource: self.resource(),
                ids: vec![*id],
            },
            _ => ValidationError::SomeReferenceMissing {
                resource: self.resource(),
                ids: ids.to_vec(),
            },
        }
        .into()
    }
}

/// Fail with `UnknownReference` unless every id exists in `table`.
///
/// The found rows are key-share locked until the transaction ends, so a
/// concurrent delete cannot remove them before the edges are written.
pub(crate) async fn ensure_exist(
    conn: &mut PgConnection,
    table: Referenced,
    ids: &IdList,
) -> Result<(), DbError> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: Vec<Id> = sqlx::query_scalar(table.lookup_sql())
        .bind(ids.as_slice())
        .fetch_all(&mut *conn)
        .await?;
    let found: BTreeSet<Id> = found.into_iter().collect();

    let missing = ids.missing_from(&found);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnknownReference {
            resource: table.resource(),
            ids: missing,
        }
        .into())
    }
}

/// The row on the fixed side of a product_tag edge set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkOwner {
    Product(Id),
    Tag(Id),
}

impl LinkOwner {
    fn id(self) -> Id {
        match self {
            Self::Product(id) | Self::Tag(id) => id,
        }
    }

    /// Table on the other end of the edges
    fn other(self) -> Referenced {
        match self {
            Self::Product(_) => Referenced::Tag,
            Self::Tag(_) => Referenced::Product,
        }
    }

    fn current_sql(self) -> &'static str {
        match self {
            Self::Product(_) => "SELECT tag_id FROM product_tag WHERE product_id = $1",
            Self::Tag(_) => "SELECT product_id FROM product_tag WHERE tag_id = $1",
        }
    }

    fn insert_sql(self) -> &'static str {
        match self {
            Self::Product(_) => {
                "INSERT INTO product_tag (product_id, tag_id) SELECT $1::int4, UNNEST($2::int4[])"
            }
            Self::Tag(_) => {
                "INSERT INTO product_tag (product_id, tag_id) SELECT UNNEST($2::int4[]), $1::int4"
            }
        }
    }

    fn delete_sql(self) -> &'static str {
        match self {
            Self::Product(_) => "DELETE FROM product_tag WHERE product_id = $1 AND tag_id = ANY($2)",
            Self::Tag(_) => "DELETE FROM product_tag WHERE tag_id = $1 AND product_id = ANY($2)",
        }
    }

    fn delete_all_sql(self) -> &'static str {
        match self {
            Self::Product(_) => "DELETE FROM product_tag WHERE product_id = $1",
            Self::Tag(_) => "DELETE FROM product_tag WHERE tag_id = $1",
        }
    }
}

/// Bulk-insert one edge per id.
pub(crate) async fn insert_links(
    conn: &mut PgConnection,
    owner: LinkOwner,
    ids: &[Id],
) -> Result<(), DbError> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(owner.insert_sql())
        .bind(owner.id())
        .bind(ids)
        .execute(&mut *conn)
        .await
        .map_err(|e| owner.other().reference_error(e, ids))?;

    Ok(())
}

/// Make the owner's edge set equal to `requested`, writing only the difference.
pub(crate) async fn replace_links(
    conn: &mut PgConnection,
    owner: LinkOwner,
    requested: &IdList,
) -> Result<AssociationDiff, DbError> {
    let current: Vec<Id> = sqlx::query_scalar(owner.current_sql())
        .bind(owner.id())
        .fetch_all(&mut *conn)
        .await?;

    let diff = AssociationDiff::between(&current, requested);

    if !diff.to_remove.is_empty() {
        sqlx::query(owner.delete_sql())
            .bind(owner.id())
            .bind(diff.to_remove.as_slice())
            .execute(&mut *conn)
            .await?;
    }

    insert_links(conn, owner, &diff.to_add).await?;

    tracing::debug!(
        ?owner,
        added = diff.to_add.len(),
        removed = diff.to_remove.len(),
        "replaced product_tag edges"
    );

    Ok(diff)
}

/// Remove every edge of the owner. Returns the number of rows deleted.
pub(crate) async fn delete_links(conn: &mut PgConnection, owner: LinkOwner) -> Result<u64, DbError> {
    let result = sqlx::query(owner.delete_all_sql())
        .bind(owner.id())
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_point_at_the_other_table() {
        assert_eq!(LinkOwner::Product(1).other(), Referenced::Tag);
        assert_eq!(LinkOwner::Tag(1).other(), Referenced::Product);
    }

    #[test]
    fn lookups_lock_found_rows() {
        for table in [Referenced::Category, Referenced::Product, Referenced::Tag] {
            assert!(table.lookup_sql().ends_with("FOR KEY SHARE"));
        }
    }

    #[test]
    fn non_fk_errors_pass_through() {
        let err = Referenced::Tag.reference_error(sqlx::Error::RowNotFound, &[1]);
        assert!(matches!(err, DbError::Sqlx(_)));
    }
}
