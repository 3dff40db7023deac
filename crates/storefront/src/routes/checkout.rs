//! Checkout totals.

use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use homestyle_core::{CheckoutSummary, Coupon};

use super::extract::ApiJson;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub subtotal: Decimal,
    pub coupon_code: Option<String>,
}

/// `POST /api/checkout/summary`
///
/// Shipping, discount and total for a cart subtotal.
pub async fn summary(
    ApiJson(request): ApiJson<SummaryRequest>,
) -> Result<Json<CheckoutSummary>> {
    if request.subtotal.is_sign_negative() {
        return Err(AppError::bad_request("Subtotal must not be negative"));
    }
    let coupon = request
        .coupon_code
        .as_deref()
        .map(Coupon::parse)
        .transpose()
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    Ok(Json(CheckoutSummary::compute(request.subtotal, coupon)))
}
