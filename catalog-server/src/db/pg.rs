//! `CatalogStore` backed by Postgres

use async_trait::async_trait;
use sqlx::PgPool;

use super::records::{Category, Product, Tag};
use super::repos::{CategoryRepo, ProductRepo, TagRepo};
use super::{CatalogStore, DbError};
use crate::models::{
    CategoryPatch, Id, NewCategory, NewProduct, NewTag, ProductPatch, TagPatch,
};

/// Postgres store; cheap to clone (shares the pool)
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DbError> {
        CategoryRepo::new(&self.pool).list().await
    }

    async fn get_category(&self, id: Id) -> Result<Category, DbError> {
        CategoryRepo::new(&self.pool).get(id).await
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, DbError> {
        CategoryRepo::new(&self.pool).create(new).await
    }

    async fn update_category(&self, id: Id, patch: CategoryPatch) -> Result<Category, DbError> {
        CategoryRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_category(&self, id: Id) -> Result<(), DbError> {
        CategoryRepo::new(&self.pool).delete(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        ProductRepo::new(&self.pool).list().await
    }

    async fn get_product(&self, id: Id) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).get(id).await
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).create(new).await
    }

    async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_product(&self, id: Id) -> Result<(), DbError> {
        ProductRepo::new(&self.pool).delete(id).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, DbError> {
        TagRepo::new(&self.pool).list().await
    }

    async fn get_tag(&self, id: Id) -> Result<Tag, DbError> {
        TagRepo::new(&self.pool).get(id).await
    }

    async fn create_tag(&self, new: NewTag) -> Result<Tag, DbError> {
        TagRepo::new(&self.pool).create(new).await
    }

    async fn update_tag(&self, id: Id, patch: TagPatch) -> Result<Tag, DbError> {
        TagRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_tag(&self, id: Id) -> Result<(), DbError> {
        TagRepo::new(&self.pool).delete(id).await
    }
}
