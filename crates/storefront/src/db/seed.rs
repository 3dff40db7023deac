//! Sample catalog shared by the in-memory backend and `hs-cli seed`.

use rust_decimal::Decimal;

use homestyle_core::{CategoryId, NewCategory, NewProduct, NewUser};

use super::{RepositoryError, Storage};

/// Username of the account created by [`seed_storage`].
pub const TEST_USERNAME: &str = "testuser";
pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";

const CATEGORIES: [(&str, &str, &str); 4] = [
    (
        "Furniture",
        "Quality furniture for your home",
        "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
    ),
    (
        "Mattresses",
        "Premium mattresses for better sleep",
        "https://images.unsplash.com/photo-1505693416388-ac5ce068fe85?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
    ),
    (
        "Home Decor",
        "Beautiful decorative items for your home",
        "https://images.unsplash.com/photo-1513519245088-0e12902e5a38?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
    ),
    (
        "Lighting",
        "Illuminate your space with our lighting collection",
        "https://images.unsplash.com/photo-1507473885765-e6ed057f782c?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
    ),
];

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    sale_price: i64,
    image: &'static str,
    category_id: i32,
    rating: f64,
    review_count: i32,
    /// featured, new, bestseller, sale
    flags: [bool; 4],
}

const PRODUCTS: [SampleProduct; 8] = [
    SampleProduct {
        name: "Modern Luxe Sofa",
        description: "Premium comfort with elegant design",
        price: 29999,
        sale_price: 34999,
        image: "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
        category_id: 1,
        rating: 4.5,
        review_count: 24,
        flags: [true, true, false, false],
    },
    SampleProduct {
        name: "Orthopedic Memory Foam Mattress",
        description: "Superior support for better sleep",
        price: 12499,
        sale_price: 15999,
        image: "https://images.unsplash.com/photo-1505693416388-ac5ce068fe85?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
        category_id: 2,
        rating: 5.0,
        review_count: 36,
        flags: [true, false, false, true],
    },
    SampleProduct {
        name: "Wooden Coffee Table",
        description: "Handcrafted solid wood design",
        price: 8999,
        sale_price: 10499,
        image: "https://images.unsplash.com/photo-1538688525198-9b88f6f53126?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
        category_id: 1,
        rating: 4.0,
        review_count: 18,
        flags: [true, false, false, false],
    },
    SampleProduct {
        name: "Decorative Ceramic Vase",
        description: "Elegant addition to any home",
        price: 1299,
        sale_price: 1899,
        image: "https://images.unsplash.com/photo-1513519245088-0e12902e5a38?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
        category_id: 3,
        rating: 4.5,
        review_count: 42,
        flags: [true, false, true, false],
    },
    SampleProduct {
        name: "Premium Spring Mattress",
        description: "Luxurious comfort with pocket springs",
        price: 18999,
        sale_price: 22999,
        image: "https://images.unsplash.com/photo-1631046263435-ef4dc319cca8?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=300&q=80",
        category_id: 2,
        rating: 4.7,
        review_count: 29,
        flags: [false, false, true, true],
    },
    SampleProduct {
        name: "Natural Latex Mattress",
        description: "Eco-friendly and sustainable comfort",
        price: 21999,
        sale_price: 25999,
        image: "https://images.unsplash.com/photo-1567016432779-094069958ea5?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=300&q=80",
        category_id: 2,
        rating: 4.8,
        review_count: 31,
        flags: [false, true, false, true],
    },
    SampleProduct {
        name: "Gel Memory Foam Mattress",
        description: "Cooling technology for better sleep",
        price: 19999,
        sale_price: 23999,
        image: "https://images.unsplash.com/photo-1592229505726-ca121723b8ef?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=300&q=80",
        category_id: 2,
        rating: 4.6,
        review_count: 24,
        flags: [true, false, false, false],
    },
    SampleProduct {
        name: "Pendant Ceiling Light",
        description: "Modern design with warm illumination",
        price: 2999,
        sale_price: 4299,
        image: "https://images.unsplash.com/photo-1507473885765-e6ed057f782c?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&h=500&q=80",
        category_id: 4,
        rating: 4.3,
        review_count: 15,
        flags: [false, true, false, true],
    },
];

/// The four sample categories, in ID order.
#[must_use]
pub fn categories() -> Vec<NewCategory> {
    CATEGORIES
        .iter()
        .map(|&(name, description, image)| NewCategory {
            name: name.to_string(),
            description: Some(description.to_string()),
            image: Some(image.to_string()),
        })
        .collect()
}

/// The eight sample products, in ID order.
#[must_use]
pub fn products() -> Vec<NewProduct> {
    PRODUCTS
        .iter()
        .map(|p| {
            let [is_featured, is_new, is_bestseller, is_sale] = p.flags;
            NewProduct {
                name: p.name.to_string(),
                description: Some(p.description.to_string()),
                price: Decimal::from(p.price),
                sale_price: Some(Decimal::from(p.sale_price)),
                image: p.image.to_string(),
                category_id: CategoryId::new(p.category_id),
                rating: p.rating,
                review_count: p.review_count,
                in_stock: true,
                is_featured,
                is_new,
                is_bestseller,
                is_sale,
            }
        })
        .collect()
}

/// The demo account. `password_hash` must be a hash of [`TEST_PASSWORD`].
#[must_use]
pub fn test_user(password_hash: String) -> NewUser {
    NewUser {
        username: TEST_USERNAME.to_string(),
        email: TEST_EMAIL.to_string(),
        password_hash,
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        ..NewUser::default()
    }
}

/// What [`seed_storage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Categories already existed; nothing was written.
    Skipped,
    Seeded { categories: usize, products: usize },
}

/// Insert the sample catalog and the demo account unless categories exist.
///
/// # Errors
///
/// Returns the first repository error; earlier inserts are not rolled back.
pub async fn seed_storage(
    storage: &dyn Storage,
    password_hash: String,
) -> Result<SeedOutcome, RepositoryError> {
    if !storage.get_categories().await?.is_empty() {
        tracing::info!("Database already contains data, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let categories = categories();
    let category_count = categories.len();
    for category in categories {
        storage.create_category(category).await?;
    }
    tracing::info!(count = category_count, "Added categories");

    let products = products();
    let product_count = products.len();
    for product in products {
        storage.create_product(product).await?;
    }
    tracing::info!(count = product_count, "Added products");

    storage.create_user(test_user(password_hash)).await?;
    tracing::info!(username = TEST_USERNAME, "Added test user");

    Ok(SeedOutcome::Seeded {
        categories: category_count,
        products: product_count,
    })
}
