//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use homestyle_core::{Category, CategoryId};

use super::parse_id;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/categories`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.storage().get_categories().await?))
}

/// `GET /api/categories/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>> {
    let Some(id) = parse_id::<CategoryId>(&id) else {
        return Err(AppError::not_found("Category not found"));
    };
    state
        .storage()
        .get_category_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Category not found"))
}
