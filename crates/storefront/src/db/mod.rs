//! Storage for the storefront.
//!
//! # Tables
//!
//! - `users` - Accounts (argon2 password hashes)
//! - `categories` - Flat product categories
//! - `products` - Catalog with merchandising flags
//! - `orders` / `order_items` - Checkout snapshots
//! - `reviews` - Append-only product reviews
//! - `tower_sessions.session` - Session store (created by the store itself)
//!
//! Two implementations of [`Storage`] exist: [`MemStorage`] keeps everything
//! in process, [`DatabaseStorage`] talks to `PostgreSQL`. Handlers only see
//! `Arc<dyn Storage>`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p homestyle-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;
pub mod seed;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use homestyle_core::{
    Category, CategoryId, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser,
    Order, OrderId, OrderItem, OrderLine, OrderStatus, Product, ProductFlag, ProductId, Review,
    User, UserId, UserUpdate,
};

pub use memory::MemStorage;
pub use postgres::DatabaseStorage;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation. Holds the offending field (`username`, `email`).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// The storefront repository.
///
/// Lookups return `Ok(None)` for a missing row; `Err` is reserved for
/// infrastructure failures and unique-key conflicts. Referential integrity
/// (that a product's category exists, that an order's products exist) is the
/// caller's concern.
#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    /// Shallow-merge `update` into an existing user. `Ok(None)` if `id` is unknown.
    async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError>;

    // Categories
    async fn get_categories(&self) -> Result<Vec<Category>, RepositoryError>;
    async fn get_category_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;
    async fn create_category(&self, category: NewCategory) -> Result<Category, RepositoryError>;

    // Products
    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn get_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError>;
    async fn get_products_by_flag(&self, flag: ProductFlag) -> Result<Vec<Product>, RepositoryError>;
    /// Case-insensitive substring match on name or description.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError>;
    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    // Orders
    async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;
    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
    /// Insert an order, stamping `created_at` with the current time.
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError>;
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;

    // Order items
    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError>;
    async fn create_order_item(&self, item: NewOrderItem) -> Result<OrderItem, RepositoryError>;

    /// Create an order and one item per line.
    ///
    /// The default runs the inserts one after another; implementations that
    /// can do so override it to make the whole checkout atomic.
    async fn create_order_with_items(
        &self,
        order: NewOrder,
        lines: Vec<OrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let order = self.create_order(order).await?;
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            items.push(self.create_order_item(line.for_order(order.id)).await?);
        }
        Ok((order, items))
    }

    // Reviews
    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError>;
    /// Insert a review, stamping `created_at` with the current time.
    async fn create_review(&self, review: NewReview) -> Result<Review, RepositoryError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
