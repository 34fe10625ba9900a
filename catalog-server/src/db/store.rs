//! Storage abstraction used by the HTTP layer
//!
//! Every method that writes more than one table is atomic: either all of
//! its rows are written or none are. Reads return the full record graph.

use async_trait::async_trait;

use super::records::{Category, Product, Tag};
use super::DbError;
use crate::models::{
    CategoryPatch, Id, NewCategory, NewProduct, NewTag, ProductPatch, TagPatch,
};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the backing store answers queries.
    async fn ping(&self) -> Result<(), DbError>;

    async fn list_categories(&self) -> Result<Vec<Category>, DbError>;

    async fn get_category(&self, id: Id) -> Result<Category, DbError>;

    async fn create_category(&self, new: NewCategory) -> Result<Category, DbError>;

    async fn update_category(&self, id: Id, patch: CategoryPatch) -> Result<Category, DbError>;

    /// Delete a category. Fails with `Conflict` while products still reference it.
    async fn delete_category(&self, id: Id) -> Result<(), DbError>;

    async fn list_products(&self) -> Result<Vec<Product>, DbError>;

    async fn get_product(&self, id: Id) -> Result<Product, DbError>;

    /// Insert a product and its tag associations.
    ///
    /// Unknown category or tag identifiers fail with `Validation` and
    /// leave nothing behind.
    async fn create_product(&self, new: NewProduct) -> Result<Product, DbError>;

    /// Apply a partial update; a supplied tag list replaces the tag set.
    async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<Product, DbError>;

    /// Delete a product together with all of its tag associations.
    async fn delete_product(&self, id: Id) -> Result<(), DbError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, DbError>;

    async fn get_tag(&self, id: Id) -> Result<Tag, DbError>;

    /// Insert a tag and its product associations.
    async fn create_tag(&self, new: NewTag) -> Result<Tag, DbError>;

    /// Apply a partial update; a supplied product list replaces the product set.
    async fn update_tag(&self, id: Id, patch: TagPatch) -> Result<Tag, DbError>;

    /// Delete a tag together with all of its product associations.
    async fn delete_tag(&self, id: Id) -> Result<(), DbError>;
}
