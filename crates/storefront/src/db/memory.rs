//! In-process storage backend.
//!
//! Every table is a `BTreeMap` keyed by its serial ID, so a full scan returns
//! rows in insertion order, the same order `PostgreSQL` gives for `ORDER BY id`.
//! Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use homestyle_core::{
    Category, CategoryId, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser,
    Order, OrderId, OrderItem, OrderItemId, OrderLine, OrderStatus, Product, ProductFlag,
    ProductId, Review, ReviewId, User, UserId, UserUpdate, matches_search,
};

use super::{RepositoryError, Storage, seed};

/// Rows of one entity plus the next ID to hand out.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Reserve the next ID, build the row from it, and store it.
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    categories: Table<Category>,
    products: Table<Product>,
    orders: Table<Order>,
    order_items: Table<OrderItem>,
    reviews: Table<Review>,
}

impl Tables {
    /// Reject a username or email already held by a user other than `except`.
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<UserId>,
    ) -> Result<(), RepositoryError> {
        let others = || {
            self.users
                .rows
                .values()
                .filter(move |u| Some(u.id) != except)
        };
        if username.is_some_and(|name| others().any(|u| u.username == name)) {
            return Err(RepositoryError::Conflict("username".to_string()));
        }
        if email.is_some_and(|email| others().any(|u| u.email == email)) {
            return Err(RepositoryError::Conflict("email".to_string()));
        }
        Ok(())
    }

    fn insert_order(&mut self, order: NewOrder) -> Order {
        let created_at = Utc::now();
        self.orders
            .insert_with(|id| Order::from_new(OrderId::new(id), created_at, order))
    }

    fn insert_order_item(&mut self, item: NewOrderItem) -> OrderItem {
        self.order_items
            .insert_with(|id| OrderItem::from_new(OrderItemId::new(id), item))
    }
}

/// Storage backed by in-process tables behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    /// Empty storage; every table's IDs start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage preloaded with the sample catalog.
    #[must_use]
    pub fn with_sample_data() -> Self {
        let mut tables = Tables::default();
        for category in seed::categories() {
            tables
                .categories
                .insert_with(|id| Category::from_new(CategoryId::new(id), category));
        }
        for product in seed::products() {
            tables
                .products
                .insert_with(|id| Product::from_new(ProductId::new(id), product));
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(id.as_i32()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.filter(|u| u.username == username).into_iter().next())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.filter(|u| u.email == email).into_iter().next())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_unique(Some(&user.username), Some(&user.email), None)?;
        Ok(tables
            .users
            .insert_with(|id| User::from_new(UserId::new(id), user)))
    }

    async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.users.rows.contains_key(&id.as_i32()) {
            return Ok(None);
        }
        tables.check_unique(update.username.as_deref(), update.email.as_deref(), Some(id))?;

        let Some(user) = tables.users.rows.get_mut(&id.as_i32()) else {
            return Ok(None);
        };
        user.apply(update);
        Ok(Some(user.clone()))
    }

    async fn get_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.tables.read().await.categories.all())
    }

    async fn get_category_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.tables.read().await.categories.get(id.as_i32()))
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .categories
            .insert_with(|id| Category::from_new(CategoryId::new(id), category)))
    }

    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.all())
    }

    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(id.as_i32()))
    }

    async fn get_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.products.filter(|p| p.category_id == category_id))
    }

    async fn get_products_by_flag(&self, flag: ProductFlag) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.filter(|p| flag.matches(p)))
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.products.filter(|p| matches_search(p, query)))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .products
            .insert_with(|id| Product::from_new(ProductId::new(id), product)))
    }

    async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.filter(|o| o.user_id == user_id))
    }

    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables.read().await.orders.get(id.as_i32()))
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        Ok(self.tables.write().await.insert_order(order))
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.rows.get_mut(&id.as_i32()).map(|order| {
            order.status = status;
            order.clone()
        }))
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.order_items.filter(|i| i.order_id == order_id))
    }

    async fn create_order_item(&self, item: NewOrderItem) -> Result<OrderItem, RepositoryError> {
        Ok(self.tables.write().await.insert_order_item(item))
    }

    async fn create_order_with_items(
        &self,
        order: NewOrder,
        lines: Vec<OrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tables = self.tables.write().await;
        let order = tables.insert_order(order);
        let items = lines
            .iter()
            .map(|line| tables.insert_order_item(line.for_order(order.id)))
            .collect();
        Ok((order, items))
    }

    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.filter(|r| r.product_id == product_id))
    }

    async fn create_review(&self, review: NewReview) -> Result<Review, RepositoryError> {
        let created_at = Utc::now();
        let mut tables = self.tables.write().await;
        Ok(tables
            .reviews
            .insert_with(|id| Review::from_new(ReviewId::new(id), created_at, review)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            ..NewUser::default()
        }
    }

    fn new_order(user_id: UserId) -> NewOrder {
        NewOrder {
            user_id,
            total: Decimal::from(3050),
            status: OrderStatus::Pending,
            address: None,
            city: Some("Erode".to_string()),
            state: None,
            zip_code: None,
            payment_method: Some("cod".to_string()),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let storage = MemStorage::new();
        let a = storage.create_user(new_user("a", "a@example.com")).await.unwrap();
        let b = storage.create_user(new_user("b", "b@example.com")).await.unwrap();
        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));

        let category = storage
            .create_category(NewCategory {
                name: "Outdoor".to_string(),
                description: None,
                image: None,
            })
            .await
            .unwrap();
        assert_eq!(category.id, CategoryId::new(1));
    }

    #[tokio::test]
    async fn test_update_user_merges_and_misses() {
        let storage = MemStorage::new();
        let user = storage.create_user(new_user("a", "a@example.com")).await.unwrap();

        let updated = storage
            .update_user(
                user.id,
                UserUpdate {
                    city: Some("Erode".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.city.as_deref(), Some("Erode"));
        assert_eq!(updated.username, "a");

        let missing = storage
            .update_user(UserId::new(99), UserUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(storage.get_user(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let storage = MemStorage::new();
        storage.create_user(new_user("a", "a@example.com")).await.unwrap();
        let b = storage.create_user(new_user("b", "b@example.com")).await.unwrap();

        let dup_name = storage.create_user(new_user("a", "c@example.com")).await;
        assert!(matches!(dup_name, Err(RepositoryError::Conflict(f)) if f == "username"));

        let dup_email = storage.create_user(new_user("c", "a@example.com")).await;
        assert!(matches!(dup_email, Err(RepositoryError::Conflict(f)) if f == "email"));

        let steal = storage
            .update_user(
                b.id,
                UserUpdate {
                    email: Some("a@example.com".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await;
        assert!(matches!(steal, Err(RepositoryError::Conflict(_))));

        // Re-saving one's own values is fine.
        let same = storage
            .update_user(
                b.id,
                UserUpdate {
                    username: Some("b".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(same.is_some());
    }

    #[tokio::test]
    async fn test_sample_catalog() {
        let storage = MemStorage::with_sample_data();
        assert_eq!(storage.get_categories().await.unwrap().len(), 4);
        let products = storage.get_products().await.unwrap();
        assert_eq!(products.len(), 8);
        let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        for flag in [ProductFlag::Featured, ProductFlag::New, ProductFlag::Bestseller, ProductFlag::Sale] {
            let subset = storage.get_products_by_flag(flag).await.unwrap();
            assert_eq!(subset, products.iter().filter(|p| flag.matches(p)).cloned().collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_search_and_category() {
        let storage = MemStorage::with_sample_data();
        let hits = storage.search_products("MATTRESS").await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|p| matches_search(p, "mattress")));

        let in_cat = storage.get_products_by_category(CategoryId::new(2)).await.unwrap();
        assert!(in_cat.iter().all(|p| p.category_id == CategoryId::new(2)));
        assert!(storage.get_products_by_category(CategoryId::new(99)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_and_items() {
        let storage = MemStorage::new();
        let lines = vec![
            OrderLine {
                product_id: ProductId::new(1),
                quantity: 2,
                price: Decimal::from(1400),
            },
            OrderLine {
                product_id: ProductId::new(2),
                quantity: 1,
                price: Decimal::from(250),
            },
        ];
        let (order, items) = storage
            .create_order_with_items(new_order(UserId::new(1)), lines)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.order_id == order.id));
        assert_eq!(storage.get_order_items(order.id).await.unwrap(), items);

        storage.create_order(new_order(UserId::new(2))).await.unwrap();
        assert_eq!(storage.get_orders(UserId::new(1)).await.unwrap().len(), 1);

        let shipped = storage
            .update_order_status(order.id, OrderStatus::Shipped)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);
        assert!(
            storage
                .update_order_status(OrderId::new(42), OrderStatus::Shipped)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_reviews_are_stamped() {
        let storage = MemStorage::new();
        let before = Utc::now();
        let review = storage
            .create_review(NewReview {
                user_id: UserId::new(1),
                product_id: ProductId::new(3),
                rating: 5.0,
                comment: Some("Very comfortable".to_string()),
            })
            .await
            .unwrap();
        assert!(review.created_at >= before);
        assert_eq!(storage.get_reviews(ProductId::new(3)).await.unwrap(), vec![review]);
        assert!(storage.get_reviews(ProductId::new(4)).await.unwrap().is_empty());
    }
}
