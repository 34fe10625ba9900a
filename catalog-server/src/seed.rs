//! Demo catalog
//!
//! Loaded through `CatalogStore`, so it exercises the same write paths as
//! the HTTP API and works against either store.

use rust_decimal::Decimal;

use crate::db::{CatalogStore, DbError};
use crate::models::{
    CategoryName, Id, IdList, NewCategory, NewProduct, NewTag, Price, ProductName, Stock,
    TagName,
};

const CATEGORIES: &[&str] = &["Shirts", "Shorts", "Music", "Hats", "Shoes"];

const TAGS: &[&str] = &[
    "rock music",
    "pop music",
    "blue",
    "red",
    "green",
    "white",
    "gold",
    "pop culture",
];

struct DemoProduct {
    name: &'static str,
    /// Price in cents
    cents: i64,
    stock: i32,
    /// Index into `CATEGORIES`
    category: usize,
    /// Indexes into `TAGS`
    tags: &'static [usize],
}

const PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Plain T-Shirt",
        cents: 1499,
        stock: 14,
        category: 0,
        tags: &[5, 6, 7],
    },
    DemoProduct {
        name: "Running Sneakers",
        cents: 9000,
        stock: 25,
        category: 4,
        tags: &[5],
    },
    DemoProduct {
        name: "Branded Baseball Hat",
        cents: 2299,
        stock: 12,
        category: 3,
        tags: &[0, 2, 3, 4],
    },
    DemoProduct {
        name: "Top 40 Music Compilation Vinyl Record",
        cents: 1299,
        stock: 50,
        category: 2,
        tags: &[0, 1, 7],
    },
    DemoProduct {
        name: "Cargo Shorts",
        cents: 2999,
        stock: 22,
        category: 1,
        tags: &[2],
    },
];

/// Row counts written by `seed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub tags: usize,
}

/// Insert the demo categories, tags and products.
pub async fn seed(store: &dyn CatalogStore) -> Result<SeedReport, DbError> {
    let mut category_ids: Vec<Id> = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let category = store
            .create_category(NewCategory {
                name: CategoryName::new(name)?,
            })
            .await?;
        category_ids.push(category.id);
    }

    let mut tag_ids: Vec<Id> = Vec::with_capacity(TAGS.len());
    for name in TAGS {
        let tag = store
            .create_tag(NewTag {
                name: TagName::new(name)?,
                product_ids: IdList::default(),
            })
            .await?;
        tag_ids.push(tag.id);
    }

    for demo in PRODUCTS {
        let product = store
            .create_product(NewProduct {
                name: ProductName::new(demo.name)?,
                price: Price::new(Decimal::new(demo.cents, 2))?,
                stock: Stock::new(demo.stock)?,
                category_id: category_ids[demo.category],
                tag_ids: IdList::new(demo.tags.iter().map(|i| tag_ids[*i]).collect()),
            })
            .await?;
        tracing::debug!(product_id = product.id, name = demo.name, "seeded product");
    }

    let report = SeedReport {
        categories: category_ids.len(),
        products: PRODUCTS.len(),
        tags: tag_ids.len(),
    };
    tracing::info!(?report, "demo catalog seeded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn seeds_full_graph() {
        let store = MemoryStore::new();
        let report = seed(&store).await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                categories: 5,
                products: 5,
                tags: 8
            }
        );

        let products = store.list_products().await.unwrap();
        let hat = products
            .iter()
            .find(|p| p.product_name == "Branded Baseball Hat")
            .unwrap();
        assert_eq!(hat.category.category_name, "Hats");
        assert_eq!(hat.price.to_string(), "22.99");
        assert_eq!(hat.tags.len(), 4);

        let shirts = store.get_category(1).await.unwrap();
        assert_eq!(shirts.products.len(), 1);
    }
}
