//! Record graphs returned by the store
//!
//! Products always carry their category and tags; categories and tags carry
//! product summaries. Join rows never appear in a response.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::Id;

/// Category as nested inside a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CategoryRef {
    pub id: Id,
    pub category_name: String,
}

/// Tag as nested inside a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TagRef {
    pub id: Id,
    pub tag_name: String,
}

/// Product as nested inside a category or a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ProductSummary {
    pub id: Id,
    pub product_name: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Id,
}

/// Category with the products it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Id,
    pub category_name: String,
    pub products: Vec<ProductSummary>,
}

/// Product with its category and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: Id,
    pub product_name: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Id,
    pub category: CategoryRef,
    pub tags: Vec<TagRef>,
}

impl Product {
    pub fn tag_ids(&self) -> Vec<Id> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

/// Tag with the products it is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: Id,
    pub tag_name: String,
    pub products: Vec<ProductSummary>,
}

impl Tag {
    pub fn product_ids(&self) -> Vec<Id> {
        self.products.iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_serializes_nested_graph() {
        let product = Product {
            id: 1,
            product_name: "Atlas".into(),
            price: Decimal::new(1000, 2),
            stock: 5,
            category_id: 2,
            category: CategoryRef {
                id: 2,
                category_name: "Books".into(),
            },
            tags: vec![TagRef {
                id: 3,
                tag_name: "maps".into(),
            }],
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "product_name": "Atlas",
                "price": "10.00",
                "stock": 5,
                "category_id": 2,
                "category": { "id": 2, "category_name": "Books" },
                "tags": [{ "id": 3, "tag_name": "maps" }]
            })
        );
    }
}
