//! Checkout and order history.

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use homestyle_core::{
    NewOrder, OrderId, OrderLine, OrderStatus, OrderWithItems, ProductId, UserId, pricing,
};

use crate::db::{RepositoryError, Storage};

/// Errors from placing or reading orders. Display text is the client message.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order must contain at least one item")]
    Empty,

    #[error("Quantity for product {0} must be at least 1")]
    InvalidQuantity(ProductId),

    #[error("Price for product {0} must not be negative")]
    NegativePrice(ProductId),

    #[error("Order total must not be negative")]
    NegativeTotal,

    #[error("Order total is too large")]
    TotalOverflow,

    #[error("Order not found")]
    NotFound,

    /// The order exists but belongs to another user.
    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

impl OrderError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Empty
            | Self::InvalidQuantity(_)
            | Self::NegativePrice(_)
            | Self::NegativeTotal
            | Self::TotalOverflow => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of `POST /api/orders`: a cart snapshot plus shipping details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    /// Client-computed total. Defaults to subtotal plus shipping.
    pub total: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub payment_method: Option<String>,
}

impl PlaceOrder {
    /// Check the snapshot is placeable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: no items, a quantity below 1, a
    /// negative price, a negative total, or line totals too large to add up.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::Empty);
        }
        for line in &self.items {
            if line.quantity < 1 {
                return Err(OrderError::InvalidQuantity(line.product_id));
            }
            if line.price.is_sign_negative() {
                return Err(OrderError::NegativePrice(line.product_id));
            }
        }
        if self.total.is_some_and(|t| t.is_sign_negative()) {
            return Err(OrderError::NegativeTotal);
        }
        self.default_total()?;
        Ok(())
    }

    /// Subtotal of the submitted lines at their submitted prices.
    ///
    /// # Errors
    ///
    /// [`OrderError::TotalOverflow`] when the line totals do not fit in a
    /// [`Decimal`].
    pub fn subtotal(&self) -> Result<Decimal, OrderError> {
        pricing::subtotal(self.items.iter().map(|l| (l.price, l.quantity)))
            .ok_or(OrderError::TotalOverflow)
    }

    /// Subtotal plus shipping, used when the client sends no total.
    fn default_total(&self) -> Result<Decimal, OrderError> {
        let subtotal = self.subtotal()?;
        subtotal
            .checked_add(pricing::shipping_for(subtotal))
            .ok_or(OrderError::TotalOverflow)
    }

    fn into_parts(self, user_id: UserId) -> Result<(NewOrder, Vec<OrderLine>), OrderError> {
        let total = match self.total {
            Some(total) => total,
            None => self.default_total()?,
        };
        let order = NewOrder {
            user_id,
            total,
            status: OrderStatus::Pending,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            payment_method: self.payment_method,
        };
        Ok((order, self.items))
    }
}

/// Order operations for one storage backend.
pub struct OrderService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Place an order for `user_id`. New orders are always `pending`.
    ///
    /// # Errors
    ///
    /// Returns a validation error from [`PlaceOrder::validate`] or a
    /// repository error.
    pub async fn place(
        &self,
        user_id: UserId,
        request: PlaceOrder,
    ) -> Result<OrderWithItems, OrderError> {
        request.validate()?;
        let (order, lines) = request.into_parts(user_id)?;
        let (order, items) = self.storage.create_order_with_items(order, lines).await?;
        tracing::info!(order_id = %order.id, %user_id, total = %order.total, "Order placed");
        Ok(OrderWithItems { order, items })
    }

    /// An order with its items, if `user_id` owns it.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown ID, `Forbidden` for another user's order.
    pub async fn detail(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<OrderWithItems, OrderError> {
        let order = self
            .storage
            .get_order_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;
        if !order.is_owned_by(user_id) {
            return Err(OrderError::Forbidden);
        }
        let items = self.storage.get_order_items(order.id).await?;
        Ok(OrderWithItems { order, items })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemStorage;

    fn line(product: i32, quantity: i32, price: i64) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(product),
            quantity,
            price: Decimal::from(price),
        }
    }

    #[test]
    fn test_validate() {
        assert!(matches!(PlaceOrder::default().validate(), Err(OrderError::Empty)));

        let zero = PlaceOrder {
            items: vec![line(1, 0, 100)],
            ..PlaceOrder::default()
        };
        assert!(matches!(zero.validate(), Err(OrderError::InvalidQuantity(_))));

        let negative = PlaceOrder {
            items: vec![line(1, 1, -5)],
            ..PlaceOrder::default()
        };
        assert!(matches!(negative.validate(), Err(OrderError::NegativePrice(_))));

        let ok = PlaceOrder {
            items: vec![line(1, 2, 1400)],
            ..PlaceOrder::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[tokio::test]
    async fn test_oversized_lines_are_rejected() {
        let huge = OrderLine {
            product_id: ProductId::new(1),
            quantity: i32::MAX,
            price: Decimal::from(10_i128.pow(20)),
        };
        let request = PlaceOrder {
            total: Some(Decimal::from(100)),
            items: vec![huge],
            ..PlaceOrder::default()
        };
        assert!(matches!(request.validate(), Err(OrderError::TotalOverflow)));
        assert_eq!(OrderError::TotalOverflow.status(), StatusCode::BAD_REQUEST);

        let storage = MemStorage::new();
        let placed = OrderService::new(&storage).place(UserId::new(1), request).await;
        assert!(matches!(placed, Err(OrderError::TotalOverflow)));
        assert!(storage.get_orders(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_defaults_total_and_status() {
        let storage = MemStorage::new();
        let service = OrderService::new(&storage);
        let placed = service
            .place(
                UserId::new(1),
                PlaceOrder {
                    items: vec![line(1, 2, 1400), line(2, 1, 250)],
                    payment_method: Some("cod".to_string()),
                    ..PlaceOrder::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(placed.order.total, Decimal::from(3300));
        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.items.len(), 2);
    }

    #[tokio::test]
    async fn test_place_keeps_client_total() {
        let storage = MemStorage::new();
        let placed = OrderService::new(&storage)
            .place(
                UserId::new(1),
                PlaceOrder {
                    total: Some(Decimal::from(3050)),
                    items: vec![line(1, 2, 1400), line(2, 1, 250)],
                    ..PlaceOrder::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(placed.order.total, Decimal::from(3050));
    }

    #[tokio::test]
    async fn test_detail_enforces_ownership() {
        let storage = MemStorage::new();
        let service = OrderService::new(&storage);
        let placed = service
            .place(
                UserId::new(1),
                PlaceOrder {
                    items: vec![line(1, 1, 100)],
                    ..PlaceOrder::default()
                },
            )
            .await
            .unwrap();

        let mine = service.detail(UserId::new(1), placed.order.id).await.unwrap();
        assert_eq!(mine, placed);

        assert!(matches!(
            service.detail(UserId::new(2), placed.order.id).await,
            Err(OrderError::Forbidden)
        ));
        assert!(matches!(
            service.detail(UserId::new(1), OrderId::new(404)).await,
            Err(OrderError::NotFound)
        ));
    }
}
