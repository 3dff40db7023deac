//! Review submission. Listing lives under the product routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use homestyle_core::{NewReview, ProductId, Review};

use super::extract::ApiJson;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    pub product_id: Option<ProductId>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// `POST /api/reviews`
#[instrument(skip(state))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ReviewForm>,
) -> Result<(StatusCode, Json<Review>)> {
    let (Some(product_id), Some(rating)) = (form.product_id, form.rating) else {
        return Err(AppError::bad_request("Product ID and rating are required"));
    };
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::bad_request("Rating must be between 1 and 5"));
    }
    if state.storage().get_product_by_id(product_id).await?.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let review = state
        .storage()
        .create_review(NewReview {
            user_id: user.id,
            product_id,
            rating,
            comment: form.comment.filter(|c| !c.trim().is_empty()),
        })
        .await?;
    tracing::info!(review_id = %review.id, %product_id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}
