//! Seed the sample catalog and the demo account.

use homestyle_storefront::db::DatabaseStorage;
use homestyle_storefront::db::seed::{SeedOutcome, TEST_PASSWORD, TEST_USERNAME, seed_storage};
use homestyle_storefront::services::auth::hash_password;

/// Insert the sample data unless categories already exist.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn sample_data() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let storage = DatabaseStorage::new(pool);

    tracing::info!("Starting database seeding...");
    match seed_storage(&storage, hash_password(TEST_PASSWORD)?).await? {
        SeedOutcome::Skipped => tracing::info!("Categories already present; nothing to do"),
        SeedOutcome::Seeded {
            categories,
            products,
        } => {
            tracing::info!(categories, products, "Seeding complete!");
            tracing::info!("Demo login: {TEST_USERNAME} / {TEST_PASSWORD}");
        }
    }
    Ok(())
}
