//! Derived catalog views: flag subsets, search matching, filters and sorting.
//!
//! These are pure functions over product slices. Repository backends use
//! [`ProductFlag::matches`] and [`matches_search`] for their scans, and the
//! listing route applies [`ProductFilter`] and [`SortOption`] on top.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::Product;
use crate::types::CategoryId;

/// Boolean merchandising flags that define the home page product rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFlag {
    Featured,
    New,
    Bestseller,
    Sale,
}

impl ProductFlag {
    #[must_use]
    pub const fn matches(self, product: &Product) -> bool {
        match self {
            Self::Featured => product.is_featured,
            Self::New => product.is_new,
            Self::Bestseller => product.is_bestseller,
            Self::Sale => product.is_sale,
        }
    }

    /// Column holding this flag in the `products` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Featured => "is_featured",
            Self::New => "is_new",
            Self::Bestseller => "is_bestseller",
            Self::Sale => "is_sale",
        }
    }
}

/// Case-insensitive substring match against name or description.
///
/// `query` is expected to be non-blank; callers reject blank searches.
#[must_use]
pub fn matches_search(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

/// Listing sort order.
///
/// `Newest` and `Featured` are stable partitions on a flag, not orderings by
/// date or rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Newest,
    Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option: {0}")]
pub struct SortOptionError(pub String);

impl std::str::FromStr for SortOption {
    type Err = SortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price_low" => Ok(Self::PriceLow),
            "price_high" => Ok(Self::PriceHigh),
            "newest" => Ok(Self::Newest),
            "rating" => Ok(Self::Rating),
            other => Err(SortOptionError(other.to_owned())),
        }
    }
}

impl SortOption {
    /// Reorder `products` in place. Every variant keeps ties in input order.
    pub fn apply(self, products: &mut Vec<Product>) {
        match self {
            Self::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            Self::Newest => partition_first(products, |p| p.is_new),
            Self::Featured => partition_first(products, |p| p.is_featured),
        }
    }
}

fn partition_first(products: &mut Vec<Product>, pred: impl Fn(&Product) -> bool) {
    let (mut first, rest): (Vec<_>, Vec<_>) = products.drain(..).partition(|p| pred(p));
    first.extend(rest);
    *products = first;
}

/// Listing filters. Boolean filters only narrow when set to `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub in_stock: bool,
    pub is_sale: bool,
    pub is_new: bool,
    pub is_bestseller: bool,
    /// Inclusive lower bound on `price`.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on `price`.
    pub max_price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, p: &Product) -> bool {
        (!self.in_stock || p.in_stock)
            && (!self.is_sale || p.is_sale)
            && (!self.is_new || p.is_new)
            && (!self.is_bestseller || p.is_bestseller)
            && self.min_price.is_none_or(|min| p.price >= min)
            && self.max_price.is_none_or(|max| p.price <= max)
            && self.category_id.is_none_or(|c| p.category_id == c)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, products: &mut Vec<Product>) {
        products.retain(|p| self.matches(p));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::NewProduct;
    use crate::types::ProductId;

    fn product(id: i32, name: &str, price: i64, rating: f64) -> Product {
        Product::from_new(
            ProductId::new(id),
            NewProduct {
                name: name.to_owned(),
                description: Some(format!("{name} for your home")),
                price: Decimal::from(price),
                sale_price: None,
                image: format!("{id}.jpg"),
                category_id: CategoryId::new(1),
                rating,
                review_count: 0,
                in_stock: true,
                is_featured: false,
                is_new: false,
                is_bestseller: false,
                is_sale: false,
            },
        )
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let mut sofa = product(1, "Modern Luxe Sofa", 100, 4.0);
        sofa.description = Some("Pairs well with any MATTRESS".into());
        let lamp = product(2, "Pendant Light", 100, 4.0);
        let bed = product(3, "Latex Mattress", 100, 4.0);

        assert!(matches_search(&sofa, "mattress"));
        assert!(!matches_search(&lamp, "mattress"));
        assert!(matches_search(&bed, "MATTRESS"));
    }

    #[test]
    fn test_search_without_description() {
        let mut p = product(1, "Vase", 10, 0.0);
        p.description = None;
        assert!(matches_search(&p, "vas"));
        assert!(!matches_search(&p, "home"));
    }

    #[test]
    fn test_price_sorts_are_stable() {
        let mut items = vec![
            product(1, "a", 300, 0.0),
            product(2, "b", 100, 0.0),
            product(3, "c", 300, 0.0),
            product(4, "d", 200, 0.0),
        ];
        SortOption::PriceLow.apply(&mut items);
        assert_eq!(ids(&items), vec![2, 4, 1, 3]);

        SortOption::PriceHigh.apply(&mut items);
        assert_eq!(ids(&items), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_rating_sort_descending() {
        let mut items = vec![
            product(1, "a", 1, 4.5),
            product(2, "b", 1, 5.0),
            product(3, "c", 1, 4.5),
        ];
        SortOption::Rating.apply(&mut items);
        assert_eq!(ids(&items), vec![2, 1, 3]);
    }

    #[test]
    fn test_newest_and_featured_are_partitions() {
        let mut items: Vec<_> = (1..=5).map(|i| product(i, "x", 1, 0.0)).collect();
        items[1].is_new = true;
        items[3].is_new = true;
        items[4].is_featured = true;

        let mut newest = items.clone();
        SortOption::Newest.apply(&mut newest);
        assert_eq!(ids(&newest), vec![2, 4, 1, 3, 5]);

        SortOption::Featured.apply(&mut items);
        assert_eq!(ids(&items), vec![5, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!("price_low".parse::<SortOption>().unwrap(), SortOption::PriceLow);
        assert_eq!(SortOption::default(), SortOption::Featured);
        assert!("cheapest".parse::<SortOption>().is_err());
    }

    #[test]
    fn test_filter() {
        let mut items: Vec<_> = (1..=4).map(|i| product(i, "x", i64::from(i) * 1000, 0.0)).collect();
        items[0].in_stock = false;
        items[2].is_sale = true;
        items[3].category_id = CategoryId::new(2);

        let mut in_stock = items.clone();
        ProductFilter {
            in_stock: true,
            ..ProductFilter::default()
        }
        .apply(&mut in_stock);
        assert_eq!(ids(&in_stock), vec![2, 3, 4]);

        let mut ranged = items.clone();
        ProductFilter {
            min_price: Some(Decimal::from(2000)),
            max_price: Some(Decimal::from(3000)),
            ..ProductFilter::default()
        }
        .apply(&mut ranged);
        assert_eq!(ids(&ranged), vec![2, 3]);

        let mut sale_in_cat = items.clone();
        ProductFilter {
            is_sale: true,
            category_id: Some(CategoryId::new(1)),
            ..ProductFilter::default()
        }
        .apply(&mut sale_in_cat);
        assert_eq!(ids(&sale_in_cat), vec![3]);

        assert!(ProductFilter::default().is_empty());
    }

    #[test]
    fn test_flags() {
        let mut p = product(1, "x", 1, 0.0);
        p.is_bestseller = true;
        assert!(ProductFlag::Bestseller.matches(&p));
        assert!(!ProductFlag::Sale.matches(&p));
        assert_eq!(ProductFlag::New.column(), "is_new");
    }
}
