//! Orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub payment_method: Option<String>,
}

impl Order {
    /// Build the stored record; `created_at` is stamped by the repository.
    #[must_use]
    pub fn from_new(id: OrderId, created_at: DateTime<Utc>, new: NewOrder) -> Self {
        Self {
            id,
            user_id: new.user_id,
            total: new.total,
            status: new.status,
            created_at,
            address: new.address,
            city: new.city,
            state: new.state,
            zip_code: new.zip_code,
            payment_method: new.payment_method,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    /// Free text such as `cod`, `card` or `upi`; no payment is taken.
    pub payment_method: Option<String>,
}

/// A line item. `price` is the unit price at the time of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    #[must_use]
    pub fn from_new(id: OrderItemId, new: NewOrderItem) -> Self {
        Self {
            id,
            order_id: new.order_id,
            product_id: new.product_id,
            quantity: new.quantity,
            price: new.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A line of a checkout snapshot, before the order it belongs to exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderLine {
    #[must_use]
    pub fn for_order(&self, order_id: OrderId) -> NewOrderItem {
        NewOrderItem {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// An order together with its line items, as returned by the order routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_with_items_flattens() {
        let order = Order::from_new(
            OrderId::new(3),
            Utc::now(),
            NewOrder {
                user_id: UserId::new(1),
                total: Decimal::from(3050),
                status: OrderStatus::Pending,
                address: Some("12 Perundurai Road".into()),
                city: Some("Erode".into()),
                state: Some("Tamil Nadu".into()),
                zip_code: Some("638011".into()),
                payment_method: Some("cod".into()),
            },
        );
        let line = OrderLine {
            product_id: ProductId::new(1),
            quantity: 2,
            price: Decimal::from(1400),
        };
        let item = OrderItem::from_new(OrderItemId::new(1), line.for_order(order.id));

        let json = serde_json::to_value(OrderWithItems {
            order,
            items: vec![item],
        })
        .unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["paymentMethod"], "cod");
        assert_eq!(json["items"][0]["orderId"], 3);
        assert_eq!(json["items"][0]["quantity"], 2);
    }
}
