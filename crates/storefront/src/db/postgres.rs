//! `PostgreSQL` storage backend.
//!
//! Queries are built at runtime (`sqlx::query_as`) and decoded through row
//! structs, so building the crate never needs a live database. Each operation
//! is a single statement except [`Storage::create_order_with_items`], which
//! runs inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use homestyle_core::{
    Category, CategoryId, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser,
    Order, OrderId, OrderItem, OrderItemId, OrderLine, OrderStatus, Product, ProductFlag,
    ProductId, Review, ReviewId, User, UserId, UserUpdate,
};

use super::{RepositoryError, Storage};

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, phone, \
                            address, city, state, zip_code";
const CATEGORY_COLUMNS: &str = "id, name, description, image";
const PRODUCT_COLUMNS: &str = "id, name, description, price, sale_price, image, category_id, \
                               rating, review_count, in_stock, is_featured, is_new, \
                               is_bestseller, is_sale";
const ORDER_COLUMNS: &str = "id, user_id, total, status, created_at, address, city, state, \
                             zip_code, payment_method";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";
const REVIEW_COLUMNS: &str = "id, user_id, product_id, rating, comment, created_at";

// =============================================================================
// Row types
// =============================================================================

#[derive(FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password_hash: r.password_hash,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            address: r.address,
            city: r.city,
            state: r.state,
            zip_code: r.zip_code,
        }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
    image: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            image: r.image,
        }
    }
}

#[derive(FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    sale_price: Option<Decimal>,
    image: String,
    category_id: CategoryId,
    rating: f64,
    review_count: i32,
    in_stock: bool,
    is_featured: bool,
    is_new: bool,
    is_bestseller: bool,
    is_sale: bool,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            sale_price: r.sale_price,
            image: r.image,
            category_id: r.category_id,
            rating: r.rating,
            review_count: r.review_count,
            in_stock: r.in_stock,
            is_featured: r.is_featured,
            is_new: r.is_new,
            is_bestseller: r.is_bestseller,
            is_sale: r.is_sale,
        }
    }
}

#[derive(FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    payment_method: Option<String>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let status = r.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", r.id))
        })?;
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            total: r.total,
            status,
            created_at: r.created_at,
            address: r.address,
            city: r.city,
            state: r.state,
            zip_code: r.zip_code,
            payment_method: r.payment_method,
        })
    }
}

#[derive(FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

#[derive(FromRow)]
struct ReviewRow {
    id: ReviewId,
    user_id: UserId,
    product_id: ProductId,
    rating: f64,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(r: ReviewRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            product_id: r.product_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Map unique violations on `users` to [`RepositoryError::Conflict`].
fn map_user_conflict(err: sqlx::Error) -> RepositoryError {
    let conflict = match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(match db_err.constraint() {
                Some(c) if c.contains("email") => "email",
                _ => "username",
            })
        }
        _ => None,
    };
    conflict.map_or(RepositoryError::Database(err), |field| {
        RepositoryError::Conflict(field.to_string())
    })
}

/// Build a `LIKE` pattern matching `query` anywhere, with wildcards escaped.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn orders_from_rows(rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
    rows.into_iter().map(Order::try_from).collect()
}

async fn insert_order(
    tx: &mut Transaction<'_, Postgres>,
    order: &NewOrder,
) -> Result<Order, RepositoryError> {
    let sql = format!(
        "INSERT INTO orders (user_id, total, status, created_at, address, city, state, zip_code, payment_method) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {ORDER_COLUMNS}"
    );
    let row: OrderRow = sqlx::query_as(&sql)
        .bind(order.user_id)
        .bind(order.total)
        .bind(order.status.as_str())
        .bind(Utc::now())
        .bind(&order.address)
        .bind(&order.city)
        .bind(&order.state)
        .bind(&order.zip_code)
        .bind(&order.payment_method)
        .fetch_one(&mut **tx)
        .await?;
    row.try_into()
}

async fn insert_order_item(
    tx: &mut Transaction<'_, Postgres>,
    item: &NewOrderItem,
) -> Result<OrderItem, RepositoryError> {
    let sql = format!(
        "INSERT INTO order_items (order_id, product_id, quantity, price) \
         VALUES ($1, $2, $3, $4) RETURNING {ORDER_ITEM_COLUMNS}"
    );
    let row: OrderItemRow = sqlx::query_as(&sql)
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&mut **tx)
        .await?;
    Ok(row.into())
}

// =============================================================================
// Storage
// =============================================================================

/// Storage backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct DatabaseStorage {
    pool: PgPool,
}

impl DatabaseStorage {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_products(
        &self,
        where_clause: &str,
        bind: Option<i32>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products {where_clause} ORDER BY id");
        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn fetch_user(&self, column: &str, value: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    #[tracing::instrument(skip(self))]
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("username", username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("email", email).await
    }

    #[tracing::instrument(skip_all, fields(username = %user.username))]
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, phone, address, city, state, zip_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {USER_COLUMNS}"
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(&user.city)
            .bind(&user.state)
            .bind(&user.zip_code)
            .fetch_one(&self.pool)
            .await
            .map_err(map_user_conflict)?;
        Ok(row.into())
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "UPDATE users SET \
               username = COALESCE($2, username), \
               email = COALESCE($3, email), \
               first_name = COALESCE($4, first_name), \
               last_name = COALESCE($5, last_name), \
               phone = COALESCE($6, phone), \
               address = COALESCE($7, address), \
               city = COALESCE($8, city), \
               state = COALESCE($9, state), \
               zip_code = COALESCE($10, zip_code) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&update.username)
            .bind(&update.email)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.phone)
            .bind(&update.address)
            .bind(&update.city)
            .bind(&update.state)
            .bind(&update.zip_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_user_conflict)?;
        Ok(row.map(User::from))
    }

    async fn get_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id");
        let rows: Vec<CategoryRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_category_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let row: Option<CategoryRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, RepositoryError> {
        let sql = format!(
            "INSERT INTO categories (name, description, image) VALUES ($1, $2, $3) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        let row: CategoryRow = sqlx::query_as(&sql)
            .bind(&category.name)
            .bind(&category.description)
            .bind(&category.image)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_products("", None).await
    }

    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn get_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_products("WHERE category_id = $1", Some(category_id.as_i32()))
            .await
    }

    async fn get_products_by_flag(&self, flag: ProductFlag) -> Result<Vec<Product>, RepositoryError> {
        let where_clause = format!("WHERE {} = TRUE", flag.column());
        self.fetch_products(&where_clause, None).await
    }

    #[tracing::instrument(skip(self))]
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE LOWER(name) LIKE $1 ESCAPE '\\' \
                OR LOWER(COALESCE(description, '')) LIKE $1 ESCAPE '\\' \
             ORDER BY id"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(contains_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (name, description, price, sale_price, image, category_id, rating, \
                                   review_count, in_stock, is_featured, is_new, is_bestseller, is_sale) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING {PRODUCT_COLUMNS}"
        );
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.sale_price)
            .bind(&product.image)
            .bind(product.category_id)
            .bind(product.rating)
            .bind(product.review_count)
            .bind(product.in_stock)
            .bind(product.is_featured)
            .bind(product.is_new)
            .bind(product.is_bestseller)
            .bind(product.is_sale)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY id");
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        orders_from_rows(rows)
    }

    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let order = insert_order(&mut tx, &order).await?;
        tx.commit().await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        );
        let rows: Vec<OrderItemRow> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn create_order_item(&self, item: NewOrderItem) -> Result<OrderItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let item = insert_order_item(&mut tx, &item).await?;
        tx.commit().await?;
        Ok(item)
    }

    #[tracing::instrument(skip_all, fields(user_id = %order.user_id, lines = lines.len()))]
    async fn create_order_with_items(
        &self,
        order: NewOrder,
        lines: Vec<OrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let order = insert_order(&mut tx, &order).await?;
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            items.push(insert_order_item(&mut tx, &line.for_order(order.id)).await?);
        }
        tx.commit().await?;
        Ok((order, items))
    }

    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY id");
        let rows: Vec<ReviewRow> = sqlx::query_as(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn create_review(&self, review: NewReview) -> Result<Review, RepositoryError> {
        let sql = format!(
            "INSERT INTO reviews (user_id, product_id, rating, comment, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        );
        let row: ReviewRow = sqlx::query_as(&sql)
            .bind(review.user_id)
            .bind(review.product_id)
            .bind(review.rating)
            .bind(&review.comment)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Sofa"), "%sofa%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
