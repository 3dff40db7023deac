//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET  /api/categories                   - All categories
//! GET  /api/categories/{id}              - One category
//! GET  /api/products                     - Listing (optional filter/sort query)
//! GET  /api/products/featured            - Featured rail
//! GET  /api/products/new                 - New arrivals rail
//! GET  /api/products/bestseller          - Bestsellers rail
//! GET  /api/products/sale                - Sale rail
//! GET  /api/products/category/{id}       - Products in a category
//! GET  /api/products/{id}                - One product
//! GET  /api/products/{id}/reviews        - Reviews for a product
//! GET  /api/search?q=                    - Substring search
//!
//! # Checkout (orders require auth)
//! POST /api/checkout/summary             - Shipping, discount and total
//! GET  /api/orders                       - Caller's orders
//! POST /api/orders                       - Place an order
//! GET  /api/orders/{id}                  - Order with items (owner only)
//!
//! # Account (requires auth unless noted)
//! POST /api/reviews                      - Submit a review
//! GET  /api/profile                      - Profile
//! PUT  /api/profile                      - Update profile fields
//! GET  /api/user                         - Current user
//! POST /api/register                     - Register and log in (no auth)
//! POST /api/login                        - Log in (no auth)
//! POST /api/logout                       - Log out (no auth)
//! ```

pub mod auth;
pub mod categories;
pub mod checkout;
pub mod extract;
pub mod orders;
pub mod products;
pub mod profile;
pub mod reviews;
pub mod search;

use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Parse a path segment as an ID; `None` when it is not a number.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Catalog routes. Fixed paths are registered ahead of `/{id}`.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/new", get(products::new_arrivals))
        .route("/bestseller", get(products::bestsellers))
        .route("/sale", get(products::on_sale))
        .route("/category/{category_id}", get(products::by_category))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", get(products::reviews))
}

/// Category routes.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{id}", get(categories::show))
}

/// Order routes.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Login and registration, optionally behind the auth rate limiter.
pub fn auth_routes(rate_limited: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));
    if rate_limited {
        router.layer(auth_rate_limiter())
    } else {
        router
    }
}

/// Create all API routes.
pub fn routes(rate_limit_auth: bool) -> Router<AppState> {
    let api = Router::new()
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .route("/search", get(search::search))
        .nest("/orders", order_routes())
        .route("/checkout/summary", post(checkout::summary))
        .route("/reviews", post(reviews::create))
        .route("/profile", get(profile::show).put(profile::update))
        .route("/user", get(profile::show))
        .route("/logout", post(auth::logout))
        .merge(auth_routes(rate_limit_auth));

    Router::new().nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homestyle_core::ProductId;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id::<ProductId>("7"), Some(ProductId::new(7)));
        assert_eq!(parse_id::<ProductId>("abc"), None);
        assert_eq!(parse_id::<ProductId>(""), None);
    }
}
