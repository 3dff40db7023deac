//! Categories and products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ProductId};

/// A product category. The catalog is flat: no parent/child links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Category {
    #[must_use]
    pub fn from_new(id: CategoryId, new: NewCategory) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            image: new.image,
        }
    }
}

/// A catalog product.
///
/// `sale_price` is the price actually charged when present (see
/// [`Product::effective_price`]); `price` is shown struck through. In the
/// shipped catalog data `sale_price` is the larger number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub image: String,
    /// Not enforced as a foreign key.
    pub category_id: CategoryId,
    pub rating: f64,
    pub review_count: i32,
    pub in_stock: bool,
    pub is_featured: bool,
    pub is_new: bool,
    pub is_bestseller: bool,
    pub is_sale: bool,
}

impl Product {
    #[must_use]
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            sale_price: new.sale_price,
            image: new.image,
            category_id: new.category_id,
            rating: new.rating,
            review_count: new.review_count,
            in_stock: new.in_stock,
            is_featured: new.is_featured,
            is_new: new.is_new,
            is_bestseller: new.is_bestseller,
            is_sale: new.is_sale,
        }
    }

    /// The unit price charged at checkout: `sale_price` when set, else `price`.
    ///
    /// A zero sale price counts as unset.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price
            .filter(|sale| !sale.is_zero())
            .unwrap_or(self.price)
    }
}

const fn default_true() -> bool {
    true
}

/// Fields for creating a product. Defaulted columns may be omitted in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    pub image: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub is_sale: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: i64, sale: Option<i64>) -> Product {
        let new: NewProduct = serde_json::from_value(serde_json::json!({
            "name": "Modern Luxe Sofa",
            "price": price,
            "salePrice": sale,
            "image": "sofa.jpg",
            "categoryId": 1,
        }))
        .unwrap();
        Product::from_new(ProductId::new(1), new)
    }

    #[test]
    fn test_new_product_defaults() {
        let p = product(1000, None);
        assert!(p.in_stock);
        assert!(!p.is_featured && !p.is_new && !p.is_bestseller && !p.is_sale);
        assert_eq!(p.review_count, 0);
        assert!(p.rating.abs() < f64::EPSILON);
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        assert_eq!(product(1000, Some(1400)).effective_price(), Decimal::from(1400));
        assert_eq!(product(1000, None).effective_price(), Decimal::from(1000));
        assert_eq!(product(1000, Some(0)).effective_price(), Decimal::from(1000));
    }

    #[test]
    fn test_prices_serialize_as_numbers() {
        let json = serde_json::to_value(product(29999, Some(34999))).unwrap();
        assert!(json["price"].is_number());
        assert!(json["salePrice"].is_number());
        assert_eq!(json["categoryId"], 1);
    }
}
