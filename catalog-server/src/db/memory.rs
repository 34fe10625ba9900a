//! In-memory `CatalogStore`
//!
//! Same semantics as the Postgres store: ids come from per-table
//! sequences, categories with products cannot be deleted, and every write
//! validates all references before touching any table. Writes hold the
//! lock for their whole duration, which makes them atomic.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::records::{Category, CategoryRef, Product, ProductSummary, Tag, TagRef};
use super::{CatalogStore, DbError};
use crate::models::{
    AssociationDiff, CategoryPatch, Id, IdList, NewCategory, NewProduct, NewTag, ProductPatch,
    TagPatch, ValidationError,
};

#[derive(Debug, Clone)]
struct ProductRow {
    name: String,
    price: Decimal,
    stock: i32,
    category_id: Id,
}

#[derive(Debug, Default)]
struct Tables {
    category_seq: Id,
    product_seq: Id,
    tag_seq: Id,
    categories: BTreeMap<Id, String>,
    products: BTreeMap<Id, ProductRow>,
    tags: BTreeMap<Id, String>,
    /// (product_id, tag_id)
    product_tags: BTreeSet<(Id, Id)>,
}

fn next_id(seq: &mut Id) -> Id {
    *seq += 1;
    *seq
}

/// Fail with `UnknownReference` for every id not accepted by `exists`.
fn ensure(
    resource: &'static str,
    ids: &IdList,
    exists: impl Fn(&Id) -> bool,
) -> Result<(), DbError> {
    let missing: Vec<Id> = ids.as_slice().iter().copied().filter(|id| !exists(id)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnknownReference { resource, ids: missing }.into())
    }
}

impl Tables {
    fn summary(&self, id: Id) -> Option<ProductSummary> {
        self.products.get(&id).map(|row| ProductSummary {
            id,
            product_name: row.name.clone(),
            price: row.price,
            stock: row.stock,
            category_id: row.category_id,
        })
    }

    fn category(&self, id: Id) -> Option<Category> {
        let name = self.categories.get(&id)?;
        let products = self
            .products
            .iter()
            .filter(|(_, row)| row.category_id == id)
            .filter_map(|(pid, _)| self.summary(*pid))
            .collect();

        Some(Category {
            id,
            category_name: name.clone(),
            products,
        })
    }

    fn product(&self, id: Id) -> Option<Product> {
        let row = self.products.get(&id)?;
        let category_name = self.categories.get(&row.category_id)?;
        let tags = self
            .tags_of(id)
            .into_iter()
            .filter_map(|tag_id| {
                self.tags.get(&tag_id).map(|name| TagRef {
                    id: tag_id,
                    tag_name: name.clone(),
                })
            })
            .collect();

        Some(Product {
            id,
            product_name: row.name.clone(),
            price: row.price,
            stock: row.stock,
            category_id: row.category_id,
            category: CategoryRef {
                id: row.category_id,
                category_name: category_name.clone(),
            },
            tags,
        })
    }

    fn tag(&self, id: Id) -> Option<Tag> {
        let name = self.tags.get(&id)?;
        let mut product_ids = self.products_of(id);
        product_ids.sort_unstable();

        Some(Tag {
            id,
            tag_name: name.clone(),
            products: product_ids
                .into_iter()
                .filter_map(|pid| self.summary(pid))
                .collect(),
        })
    }

    fn tags_of(&self, product_id: Id) -> Vec<Id> {
        self.product_tags
            .range((product_id, Id::MIN)..=(product_id, Id::MAX))
            .map(|(_, tag_id)| *tag_id)
            .collect()
    }

    fn products_of(&self, tag_id: Id) -> Vec<Id> {
        self.product_tags
            .iter()
            .filter(|(_, t)| *t == tag_id)
            .map(|(p, _)| *p)
            .collect()
    }

    fn ensure_category(&self, id: Id) -> Result<(), DbError> {
        ensure("category", &IdList::new(vec![id]), |id| {
            self.categories.contains_key(id)
        })
    }

    fn ensure_tags(&self, ids: &IdList) -> Result<(), DbError> {
        ensure("tag", ids, |id| self.tags.contains_key(id))
    }

    fn ensure_products(&self, ids: &IdList) -> Result<(), DbError> {
        ensure("product", ids, |id| self.products.contains_key(id))
    }
}

/// Catalog held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored product_tag edges.
    pub async fn edge_count(&self) -> usize {
        self.tables.read().await.product_tags.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .keys()
            .filter_map(|id| tables.category(*id))
            .collect())
    }

    async fn get_category(&self, id: Id) -> Result<Category, DbError> {
        self.tables
            .read()
            .await
            .category(id)
            .ok_or_else(|| DbError::not_found("category", id))
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, DbError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.category_seq);
        tables.categories.insert(id, new.name.into_string());

        tables
            .category(id)
            .ok_or_else(|| DbError::not_found("category", id))
    }

    async fn update_category(&self, id: Id, patch: CategoryPatch) -> Result<Category, DbError> {
        let mut tables = self.tables.write().await;
        let name = tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("category", id))?;

        if let Some(new_name) = patch.name {
            *name = new_name.into_string();
        }

        tables
            .category(id)
            .ok_or_else(|| DbError::not_found("category", id))
    }

    async fn delete_category(&self, id: Id) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(DbError::not_found("category", id));
        }

        if tables.products.values().any(|row| row.category_id == id) {
            return Err(DbError::Conflict {
                message: format!("category '{}' still has products", id),
            });
        }

        tables.categories.remove(&id);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .keys()
            .filter_map(|id| tables.product(*id))
            .collect())
    }

    async fn get_product(&self, id: Id) -> Result<Product, DbError> {
        self.tables
            .read()
            .await
            .product(id)
            .ok_or_else(|| DbError::not_found("product", id))
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, DbError> {
        let mut tables = self.tables.write().await;

        tables.ensure_category(new.category_id)?;
        tables.ensure_tags(&new.tag_ids)?;

        let id = next_id(&mut tables.product_seq);
        tables.products.insert(
            id,
            ProductRow {
                name: new.name.into_string(),
                price: new.price.value(),
                stock: new.stock.value(),
                category_id: new.category_id,
            },
        );
        for tag_id in new.tag_ids.as_slice() {
            tables.product_tags.insert((id, *tag_id));
        }

        tables
            .product(id)
            .ok_or_else(|| DbError::not_found("product", id))
    }

    async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<Product, DbError> {
        let mut tables = self.tables.write().await;

        if !tables.products.contains_key(&id) {
            return Err(DbError::not_found("product", id));
        }
        if let Some(category_id) = patch.category_id {
            tables.ensure_category(category_id)?;
        }
        if let Some(tag_ids) = &patch.tag_ids {
            tables.ensure_tags(tag_ids)?;
        }

        // Nothing below can fail, so the write is all-or-nothing
        let diff = patch
            .tag_ids
            .as_ref()
            .map(|requested| AssociationDiff::between(&tables.tags_of(id), requested));

        if let Some(row) = tables.products.get_mut(&id) {
            if let Some(name) = patch.name {
                row.name = name.into_string();
            }
            if let Some(price) = patch.price {
                row.price = price.value();
            }
            if let Some(stock) = patch.stock {
                row.stock = stock.value();
            }
            if let Some(category_id) = patch.category_id {
                row.category_id = category_id;
            }
        }

        if let Some(diff) = diff {
            for tag_id in diff.to_remove {
                tables.product_tags.remove(&(id, tag_id));
            }
            for tag_id in diff.to_add {
                tables.product_tags.insert((id, tag_id));
            }
        }

        tables
            .product(id)
            .ok_or_else(|| DbError::not_found("product", id))
    }

    async fn delete_product(&self, id: Id) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Err(DbError::not_found("product", id));
        }

        tables.product_tags.retain(|(product_id, _)| *product_id != id);
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.keys().filter_map(|id| tables.tag(*id)).collect())
    }

    async fn get_tag(&self, id: Id) -> Result<Tag, DbError> {
        self.tables
            .read()
            .await
            .tag(id)
            .ok_or_else(|| DbError::not_found("tag", id))
    }

    async fn create_tag(&self, new: NewTag) -> Result<Tag, DbError> {
        let mut tables = self.tables.write().await;

        tables.ensure_products(&new.product_ids)?;

        let id = next_id(&mut tables.tag_seq);
        tables.tags.insert(id, new.name.into_string());
        for product_id in new.product_ids.as_slice() {
            tables.product_tags.insert((*product_id, id));
        }

        tables.tag(id).ok_or_else(|| DbError::not_found("tag", id))
    }

    async fn update_tag(&self, id: Id, patch: TagPatch) -> Result<Tag, DbError> {
        let mut tables = self.tables.write().await;

        if !tables.tags.contains_key(&id) {
            return Err(DbError::not_found("tag", id));
        }
        if let Some(product_ids) = &patch.product_ids {
            tables.ensure_products(product_ids)?;
        }

        if let Some(name) = patch.name {
            tables.tags.insert(id, name.into_string());
        }

        if let Some(requested) = &patch.product_ids {
            let diff = AssociationDiff::between(&tables.products_of(id), requested);
            for product_id in diff.to_remove {
                tables.product_tags.remove(&(product_id, id));
            }
            for product_id in diff.to_add {
                tables.product_tags.insert((product_id, id));
            }
        }

        tables.tag(id).ok_or_else(|| DbError::not_found("tag", id))
    }

    async fn delete_tag(&self, id: Id) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(DbError::not_found("tag", id));
        }

        tables.product_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryName, Price, ProductName, Stock, TagName};

    fn new_product(category_id: Id, tag_ids: Vec<Id>) -> NewProduct {
        NewProduct {
            name: ProductName::new("Atlas").unwrap(),
            price: Price::new(Decimal::new(10, 0)).unwrap(),
            stock: Stock::new(5).unwrap(),
            category_id,
            tag_ids: IdList::new(tag_ids),
        }
    }

    async fn seeded() -> (MemoryStore, Id, Id, Id) {
        let store = MemoryStore::new();
        let category = store
            .create_category(NewCategory {
                name: CategoryName::new("Books").unwrap(),
            })
            .await
            .unwrap();
        let a = store
            .create_tag(NewTag {
                name: TagName::new("a").unwrap(),
                product_ids: IdList::default(),
            })
            .await
            .unwrap();
        let b = store
            .create_tag(NewTag {
                name: TagName::new("b").unwrap(),
                product_ids: IdList::default(),
            })
            .await
            .unwrap();
        (store, category.id, a.id, b.id)
    }

    #[tokio::test]
    async fn ids_are_sequential_per_table() {
        let (store, category_id, a, b) = seeded().await;
        assert_eq!((category_id, a, b), (1, 1, 2));

        let product = store.create_product(new_product(category_id, vec![])).await.unwrap();
        assert_eq!(product.id, 1);
    }

    #[tokio::test]
    async fn unknown_tag_leaves_nothing_behind() {
        let (store, category_id, a, _) = seeded().await;

        let err = store
            .create_product(new_product(category_id, vec![a, 99]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::UnknownReference { resource: "tag", ref ids }) if ids == &vec![99]
        ));

        assert!(store.list_products().await.unwrap().is_empty());
        assert_eq!(store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let (store, category_id, a, _) = seeded().await;
        let product = store.create_product(new_product(category_id, vec![a])).await.unwrap();

        let patch = ProductPatch {
            stock: Some(Stock::new(0).unwrap()),
            tag_ids: Some(IdList::new(vec![42])),
            ..Default::default()
        };
        assert!(store.update_product(product.id, patch).await.is_err());

        let stored = store.get_product(product.id).await.unwrap();
        assert_eq!(stored.stock, 5);
        assert_eq!(stored.tag_ids(), vec![a]);
    }

    #[tokio::test]
    async fn tag_update_replaces_product_set() {
        let (store, category_id, a, _) = seeded().await;
        let p1 = store.create_product(new_product(category_id, vec![a])).await.unwrap();
        let p2 = store.create_product(new_product(category_id, vec![])).await.unwrap();

        let tag = store
            .update_tag(
                a,
                TagPatch {
                    name: None,
                    product_ids: Some(IdList::new(vec![p2.id])),
                },
            )
            .await
            .unwrap();

        assert_eq!(tag.tag_name, "a");
        assert_eq!(tag.product_ids(), vec![p2.id]);
        assert!(store.get_product(p1.id).await.unwrap().tags.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_tag_detaches_it() {
        let (store, category_id, a, b) = seeded().await;
        let product = store.create_product(new_product(category_id, vec![a, b])).await.unwrap();

        store.delete_tag(a).await.unwrap();

        assert_eq!(store.get_product(product.id).await.unwrap().tag_ids(), vec![b]);
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn category_with_products_is_a_conflict() {
        let (store, category_id, _, _) = seeded().await;
        store.create_product(new_product(category_id, vec![])).await.unwrap();

        assert!(matches!(
            store.delete_category(category_id).await.unwrap_err(),
            DbError::Conflict { .. }
        ));
        assert!(store.get_category(category_id).await.is_ok());
    }
}
