//! Order management.
//!
//! There is no admin UI; fulfilment moves orders through their statuses here.

use thiserror::Error;

use homestyle_core::{OrderId, OrderStatus};
use homestyle_storefront::db::{DatabaseStorage, RepositoryError, Storage};

use super::CommandError;

#[derive(Debug, Error)]
pub enum OrderCommandError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Order {0} not found")]
    NotFound(OrderId),
}

/// Set the status of order `id`.
///
/// # Errors
///
/// Returns `OrderCommandError::NotFound` for an unknown ID.
pub async fn set_status(id: OrderId, status: OrderStatus) -> Result<(), OrderCommandError> {
    let storage = DatabaseStorage::new(super::connect().await?);

    let order = storage
        .update_order_status(id, status)
        .await?
        .ok_or(OrderCommandError::NotFound(id))?;

    tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
    Ok(())
}
