//! The cart store: reducer plus persistence and notification side effects.

use homestyle_core::pricing::{self, CheckoutSummary, Coupon};
use homestyle_core::{OrderLine, Product, ProductId};
use rust_decimal::Decimal;

use crate::item::CartItem;
use crate::notify::Notifier;
use crate::reducer::{CartAction, reduce};
use crate::storage::CartStorage;

/// Cart state bound to a storage backend and a notification sink.
pub struct CartStore<S, N> {
    items: Vec<CartItem>,
    storage: S,
    notifier: N,
}

impl<S: CartStorage, N: Notifier> CartStore<S, N> {
    /// Restore the cart from `storage`.
    ///
    /// Unreadable saved data is logged and discarded, and the cart starts
    /// empty.
    pub fn load(storage: S, notifier: N) -> Self {
        let items = match storage.load() {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse cart data");
                if let Err(e) = storage.remove() {
                    tracing::warn!(error = %e, "Failed to remove corrupt cart data");
                }
                Vec::new()
            }
        };

        Self {
            items,
            storage,
            notifier,
        }
    }

    /// Apply an action. When the items change they are saved, then the
    /// notification is raised. A failed save is logged and otherwise ignored.
    pub fn dispatch(&mut self, action: CartAction) {
        let Some(notification) = reduce(&mut self.items, action) else {
            return;
        };

        if let Err(e) = self.storage.save(&self.items) {
            tracing::warn!(error = %e, "Failed to save cart");
        }
        self.notifier.notify(notification);
    }

    pub fn add_item(&mut self, product: Product, quantity: i32) {
        self.dispatch(CartAction::Add { product, quantity });
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        self.dispatch(CartAction::Remove(product_id));
    }

    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i32) {
        self.dispatch(CartAction::SetQuantity {
            product_id,
            quantity,
        });
    }

    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    /// Sum of line totals at the effective (sale-aware) unit price, or `None`
    /// if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn total_price(&self) -> Option<Decimal> {
        pricing::subtotal(self.items.iter().map(|i| (i.unit_price(), i.quantity)))
    }

    /// Snapshot of the cart as order lines for `POST /api/orders`.
    #[must_use]
    pub fn checkout_lines(&self) -> Vec<OrderLine> {
        self.items.iter().map(CartItem::to_order_line).collect()
    }

    #[must_use]
    pub fn checkout_summary(&self, coupon: Option<Coupon>) -> Option<CheckoutSummary> {
        self.total_price()
            .map(|subtotal| CheckoutSummary::compute(subtotal, coupon))
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}
