//! Category endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::Category;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{CategoryName, CategoryPatch, NewCategory, ValidationError};

/// Create/update category request
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(alias = "name")]
    pub category_name: Option<String>,
}

impl TryFrom<CategoryRequest> for NewCategory {
    type Error = ValidationError;

    fn try_from(req: CategoryRequest) -> Result<Self, Self::Error> {
        let name = req.category_name.ok_or(ValidationError::Missing {
            field: "category_name",
        })?;
        Ok(Self {
            name: CategoryName::new(&name)?,
        })
    }
}

impl TryFrom<CategoryRequest> for CategoryPatch {
    type Error = ValidationError;

    fn try_from(req: CategoryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.category_name.as_deref().map(CategoryName::new).transpose()?,
        })
    }
}

/// Confirmation body for update and delete
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /categories - list categories with their products
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.list_categories().await?))
}

/// GET /categories/{id}
async fn get_category(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.store.get_category(id).await?))
}

/// POST /categories
async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let new = NewCategory::try_from(req)?;
    let category = state.store.create_category(new).await?;

    tracing::info!(category_id = category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/{id}
async fn update_category(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<CategoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.get_category(id).await?;

    let patch = CategoryPatch::try_from(req)?;
    state.store.update_category(id, patch).await?;

    Ok(Json(MessageResponse {
        message: "Category updated successfully",
    }))
}

/// DELETE /categories/{id}
async fn delete_category(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_category(id).await?;

    tracing::info!(category_id = id, "category deleted");
    Ok(Json(MessageResponse {
        message: "Category deleted successfully",
    }))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}
