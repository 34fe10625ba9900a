//! Tag endpoints
//!
//! A tag write carries its product set; both land in one transaction.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;

use super::id_list;
use crate::db::Tag;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{Id, NewTag, TagName, TagPatch, ValidationError};

/// Create/update tag request
#[derive(Debug, Default, Deserialize)]
pub struct TagRequest {
    #[serde(alias = "name")]
    pub tag_name: Option<String>,
    #[serde(rename = "productIds", alias = "product_ids")]
    pub product_ids: Option<Vec<Id>>,
}

impl TryFrom<TagRequest> for NewTag {
    type Error = ValidationError;

    fn try_from(req: TagRequest) -> Result<Self, Self::Error> {
        let name = req
            .tag_name
            .ok_or(ValidationError::Missing { field: "tag_name" })?;

        Ok(Self {
            name: TagName::new(&name)?,
            product_ids: id_list(req.product_ids).unwrap_or_default(),
        })
    }
}

impl TryFrom<TagRequest> for TagPatch {
    type Error = ValidationError;

    fn try_from(req: TagRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.tag_name.as_deref().map(TagName::new).transpose()?,
            product_ids: id_list(req.product_ids),
        })
    }
}

/// GET /tags - list tags with their products
async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.store.list_tags().await?))
}

/// GET /tags/{id}
async fn get_tag(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.store.get_tag(id).await?))
}

/// POST /tags
async fn create_tag(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<TagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let new = NewTag::try_from(req)?;
    let tag = state.store.create_tag(new).await?;

    tracing::info!(tag_id = tag.id, products = tag.products.len(), "tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /tags/{id}
async fn update_tag(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<TagRequest>,
) -> Result<Json<Tag>, ApiError> {
    state.store.get_tag(id).await?;

    let patch = TagPatch::try_from(req)?;
    Ok(Json(state.store.update_tag(id, patch).await?))
}

/// DELETE /tags/{id}
async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    state.store.delete_tag(id).await?;

    tracing::info!(tag_id = id, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Tag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route(
            "/tags/{id}",
            get(get_tag).put(update_tag).delete(delete_tag),
        )
}
