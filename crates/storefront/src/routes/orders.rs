//! Order history and checkout.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use homestyle_core::{Order, OrderId, OrderWithItems};

use super::{extract::ApiJson, parse_id};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::orders::{OrderError, OrderService, PlaceOrder};
use crate::state::AppState;

/// `GET /api/orders`: the caller's orders.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.storage().get_orders(user.id).await?))
}

/// `GET /api/orders/{id}`
#[instrument(skip(state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderWithItems>> {
    let id = parse_id::<OrderId>(&id).ok_or(OrderError::NotFound)?;
    let order = OrderService::new(state.storage()).detail(user.id, id).await?;
    Ok(Json(order))
}

/// `POST /api/orders`
#[instrument(skip(state, request))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PlaceOrder>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    let order = OrderService::new(state.storage())
        .place(user.id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}
