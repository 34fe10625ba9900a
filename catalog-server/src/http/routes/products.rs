//! Product endpoints
//!
//! Create, update and delete each map to one atomic store write. Updates
//! are partial: a field is changed only when the request carries it, so
//! `"stock": 0` is applied rather than skipped.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::id_list;
use crate::db::Product;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{
    Id, NewProduct, Price, ProductName, ProductPatch, Stock, ValidationError,
};

/// Create/update product request
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    #[serde(alias = "name")]
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<Id>,
    #[serde(rename = "tagIds", alias = "tag_ids")]
    pub tag_ids: Option<Vec<Id>>,
}

impl TryFrom<ProductRequest> for NewProduct {
    type Error = ValidationError;

    fn try_from(req: ProductRequest) -> Result<Self, Self::Error> {
        let name = req.product_name.ok_or(ValidationError::Missing {
            field: "product_name",
        })?;
        let price = req.price.ok_or(ValidationError::Missing { field: "price" })?;
        let stock = req.stock.ok_or(ValidationError::Missing { field: "stock" })?;
        let category_id = req.category_id.ok_or(ValidationError::Missing {
            field: "category_id",
        })?;

        Ok(Self {
            name: ProductName::new(&name)?,
            price: Price::new(price)?,
            stock: Stock::new(stock)?,
            category_id,
            tag_ids: id_list(req.tag_ids).unwrap_or_default(),
        })
    }
}

impl TryFrom<ProductRequest> for ProductPatch {
    type Error = ValidationError;

    fn try_from(req: ProductRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.product_name.as_deref().map(ProductName::new).transpose()?,
            price: req.price.map(Price::new).transpose()?,
            stock: req.stock.map(Stock::new).transpose()?,
            category_id: req.category_id,
            tag_ids: id_list(req.tag_ids),
        })
    }
}

/// GET /products - list products with category and tags
async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.list_products().await?))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.store.get_product(id).await?))
}

/// POST /products - create a product with its tags
async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let new = NewProduct::try_from(req)?;
    let product = state.store.create_product(new).await?;

    tracing::info!(
        product_id = product.id,
        tags = product.tags.len(),
        "product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id} - partial update, tag list replaces the tag set
async fn update_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    // An unknown product is reported before any field error
    state.store.get_product(id).await?;

    let patch = ProductPatch::try_from(req)?;
    let product = state.store.update_product(id, patch).await?;

    tracing::info!(product_id = id, tags = product.tags.len(), "product updated");
    Ok(Json(product))
}

/// DELETE /products/{id}
async fn delete_product(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    state.store.delete_product(id).await?;

    tracing::info!(product_id = id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> ProductRequest {
        ProductRequest {
            product_name: Some("Atlas".into()),
            price: Some(Decimal::new(10, 0)),
            stock: Some(5),
            category_id: Some(1),
            tag_ids: None,
        }
    }

    #[test]
    fn create_reports_first_missing_field() {
        let req = ProductRequest {
            price: None,
            ..full_request()
        };
        assert_eq!(
            NewProduct::try_from(req).unwrap_err(),
            ValidationError::Missing { field: "price" }
        );

        let req = ProductRequest {
            category_id: None,
            ..full_request()
        };
        assert_eq!(
            NewProduct::try_from(req).unwrap_err(),
            ValidationError::Missing {
                field: "category_id"
            }
        );
    }

    #[test]
    fn create_accepts_zero_stock() {
        let req = ProductRequest {
            stock: Some(0),
            ..full_request()
        };
        let new = NewProduct::try_from(req).unwrap();
        assert_eq!(new.stock.value(), 0);
        assert!(new.tag_ids.is_empty());
    }

    #[test]
    fn patch_keeps_absent_fields_absent() {
        let patch = ProductPatch::try_from(ProductRequest::default()).unwrap();
        assert!(patch.name.is_none());
        assert!(patch.price.is_none());
        assert!(patch.stock.is_none());
        assert!(patch.category_id.is_none());
        assert!(patch.tag_ids.is_none());
    }

    #[test]
    fn patch_rejects_zero_price() {
        let req = ProductRequest {
            price: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(matches!(
            ProductPatch::try_from(req).unwrap_err(),
            ValidationError::OutOfRange { field: "price", .. }
        ));
    }

    #[test]
    fn deserializes_wire_names() {
        let req: ProductRequest = serde_json::from_str(
            r#"{"product_name": "Atlas", "price": 14.99, "stock": 3, "category_id": 2, "tagIds": [1, 1, 2]}"#,
        )
        .unwrap();

        assert_eq!(req.price, Some(Decimal::new(1499, 2)));
        let patch = ProductPatch::try_from(req).unwrap();
        assert_eq!(patch.tag_ids.unwrap().as_slice(), &[1, 2]);
    }

    #[test]
    fn empty_tag_list_is_present() {
        let req: ProductRequest = serde_json::from_str(r#"{"tagIds": []}"#).unwrap();
        let patch = ProductPatch::try_from(req).unwrap();
        assert_eq!(patch.tag_ids.map(|ids| ids.len()), Some(0));
    }
}
