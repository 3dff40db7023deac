//! Cart transitions as a pure function over the item list.

use homestyle_core::{Product, ProductId};

use crate::item::CartItem;
use crate::notify::Notification;

/// A requested change to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add `quantity` of `product`, merging with an existing line.
    Add { product: Product, quantity: i32 },
    Remove(ProductId),
    /// Set the quantity of a line. Anything below 1 removes it.
    SetQuantity { product_id: ProductId, quantity: i32 },
    Clear,
}

/// Apply `action` to `items`.
///
/// Returns the notification for the transition, or `None` when the items were
/// left untouched (adding a non-positive quantity, or targeting a product that
/// is not in the cart).
pub fn reduce(items: &mut Vec<CartItem>, action: CartAction) -> Option<Notification> {
    match action {
        CartAction::Add { product, quantity } => add(items, product, quantity),
        CartAction::Remove(product_id) => remove(items, product_id),
        CartAction::SetQuantity {
            product_id,
            quantity,
        } if quantity < 1 => remove(items, product_id),
        CartAction::SetQuantity {
            product_id,
            quantity,
        } => {
            let item = items.iter_mut().find(|i| i.product_id() == product_id)?;
            item.quantity = quantity;
            Some(Notification::new(
                "Cart updated",
                format!("{} quantity set to {quantity}", item.product.name),
            ))
        }
        CartAction::Clear => {
            items.clear();
            Some(Notification::new(
                "Cart cleared",
                "All items have been removed from your cart",
            ))
        }
    }
}

fn add(items: &mut Vec<CartItem>, product: Product, quantity: i32) -> Option<Notification> {
    if quantity < 1 {
        return None;
    }

    if let Some(item) = items.iter_mut().find(|i| i.product_id() == product.id) {
        item.quantity = item.quantity.saturating_add(quantity);
        return Some(Notification::new(
            "Cart updated",
            format!("{} quantity increased to {}", product.name, item.quantity),
        ));
    }

    let notification = Notification::new(
        "Item added to cart",
        format!("{} added to your cart", product.name),
    );
    items.push(CartItem { product, quantity });
    Some(notification)
}

fn remove(items: &mut Vec<CartItem>, product_id: ProductId) -> Option<Notification> {
    let index = items.iter().position(|i| i.product_id() == product_id)?;
    let removed = items.remove(index);
    Some(Notification::new(
        "Item removed",
        format!("{} removed from your cart", removed.product.name),
    ))
}
