//! Cart line items.

use homestyle_core::{OrderLine, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product snapshot and how many of it are in the cart.
///
/// The product is copied in full when added, so price changes on the server
/// are not seen until the item is removed and added again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
}

impl CartItem {
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.product.effective_price()
    }

    #[must_use]
    pub fn to_order_line(&self) -> OrderLine {
        OrderLine {
            product_id: self.product.id,
            quantity: self.quantity,
            price: self.unit_price(),
        }
    }
}
