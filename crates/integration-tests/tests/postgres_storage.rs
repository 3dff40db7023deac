//! `PostgreSQL` repository tests.
//!
//! These tests require a disposable database:
//!
//! ```bash
//! TEST_DATABASE_URL=postgres://localhost/homestyle_test \
//!     cargo test -p homestyle-integration-tests -- --ignored
//! ```
//!
//! Migrations are applied, then every table is truncated before each test.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;

use homestyle_core::{
    NewOrder, OrderLine, OrderStatus, ProductFlag, ProductId, UserId, UserUpdate,
};
use homestyle_storefront::db::seed::{SeedOutcome, TEST_USERNAME, seed_storage};
use homestyle_storefront::db::{DatabaseStorage, RepositoryError, Storage, create_pool};

async fn fresh_storage() -> DatabaseStorage {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    let pool: PgPool = create_pool(&SecretString::from(url)).await.unwrap();
    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .unwrap();
    sqlx::query(
        "TRUNCATE reviews, order_items, orders, products, categories, users RESTART IDENTITY",
    )
    .execute(&pool)
    .await
    .unwrap();
    DatabaseStorage::new(pool)
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_seed_and_catalog_queries() {
    let storage = fresh_storage().await;

    let outcome = seed_storage(&storage, "hash".to_string()).await.unwrap();
    assert_eq!(
        outcome,
        SeedOutcome::Seeded {
            categories: 4,
            products: 8
        }
    );
    assert_eq!(
        seed_storage(&storage, "hash".to_string()).await.unwrap(),
        SeedOutcome::Skipped
    );

    let sale = storage.get_products_by_flag(ProductFlag::Sale).await.unwrap();
    let sale_ids: Vec<i32> = sale.iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(sale_ids, vec![2, 5, 6, 8]);

    let sofa = storage.get_product_by_id(ProductId::new(1)).await.unwrap().unwrap();
    assert_eq!(sofa.price, Decimal::from(29999));
    assert_eq!(sofa.effective_price(), Decimal::from(34999));

    let hits = storage.search_products("MATTRESS").await.unwrap();
    assert_eq!(hits.len(), 4);
    assert!(storage.search_products("100%").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_user_uniqueness_and_update() {
    let storage = fresh_storage().await;
    seed_storage(&storage, "hash".to_string()).await.unwrap();

    let user = storage
        .get_user_by_username(TEST_USERNAME)
        .await
        .unwrap()
        .unwrap();

    let mut duplicate = homestyle_storefront::db::seed::test_user("hash".to_string());
    duplicate.email = "fresh@example.com".to_string();
    let err = storage.create_user(duplicate).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(ref f) if f == "username"));

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
    assert_eq!(updated.first_name.as_deref(), Some("Test"));

    assert!(
        storage
            .update_user(UserId::new(9999), UserUpdate::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_order_with_items_and_status() {
    let storage = fresh_storage().await;
    seed_storage(&storage, "hash".to_string()).await.unwrap();
    let user = storage
        .get_user_by_username(TEST_USERNAME)
        .await
        .unwrap()
        .unwrap();

    let (order, items) = storage
        .create_order_with_items(
            NewOrder {
                user_id: user.id,
                total: Decimal::from(69998),
                status: OrderStatus::Pending,
                address: Some("12 Brough Road".to_string()),
                city: Some("Erode".to_string()),
                state: None,
                zip_code: None,
                payment_method: Some("cod".to_string()),
            },
            vec![OrderLine {
                product_id: ProductId::new(1),
                quantity: 2,
                price: Decimal::from(34999),
            }],
        )
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(storage.get_order_items(order.id).await.unwrap(), items);
    assert_eq!(storage.get_orders(user.id).await.unwrap(), vec![order.clone()]);

    let shipped = storage
        .update_order_status(order.id, OrderStatus::Shipped)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
}
