//! Product search.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use homestyle_core::Product;

use super::extract::ApiQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// `GET /api/search?q=`
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let q = query.q.as_deref().unwrap_or_default();
    if q.trim().is_empty() {
        return Err(AppError::bad_request("Search query is required"));
    }

    let results = state.storage().search_products(q).await?;
    tracing::debug!(query = q, count = results.len(), "Product search");
    Ok(Json(results))
}
