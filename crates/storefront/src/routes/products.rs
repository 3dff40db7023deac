//! Product route handlers.
//!
//! The flag and category routes return storage order. The plain listing
//! additionally accepts the catalog page's filter and sort controls as query
//! parameters; without any it also returns storage order.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use homestyle_core::{CategoryId, Product, ProductFilter, ProductFlag, ProductId, Review, SortOption};

use super::{extract::ApiQuery, parse_id};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for `GET /api/products`. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub sort: Option<String>,
    pub in_stock: Option<String>,
    pub is_sale: Option<String>,
    pub is_new: Option<String>,
    pub is_bestseller: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub category_id: Option<String>,
}

impl ListingQuery {
    /// Parse into a filter and an optional sort.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first malformed parameter.
    pub fn parse(&self) -> Result<(ProductFilter, Option<SortOption>)> {
        let filter = ProductFilter {
            in_stock: flag_param("inStock", self.in_stock.as_deref())?,
            is_sale: flag_param("isSale", self.is_sale.as_deref())?,
            is_new: flag_param("isNew", self.is_new.as_deref())?,
            is_bestseller: flag_param("isBestseller", self.is_bestseller.as_deref())?,
            min_price: value_param::<Decimal>("minPrice", self.min_price.as_deref())?,
            max_price: value_param::<Decimal>("maxPrice", self.max_price.as_deref())?,
            category_id: value_param::<CategoryId>("categoryId", self.category_id.as_deref())?,
        };
        let sort = value_param::<SortOption>("sort", self.sort.as_deref())?;
        Ok((filter, sort))
    }
}

fn flag_param(name: &str, raw: Option<&str>) -> Result<bool> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(AppError::bad_request(format!(
            "Invalid {name}: expected true or false, got `{other}`"
        ))),
    }
}

fn value_param<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("Invalid {name}: `{value}`"))),
    }
}

/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> Result<Json<Vec<Product>>> {
    let (filter, sort) = query.parse()?;
    let mut products = state.storage().get_products().await?;
    if !filter.is_empty() {
        filter.apply(&mut products);
    }
    if let Some(sort) = sort {
        sort.apply(&mut products);
    }
    Ok(Json(products))
}

async fn by_flag(state: &AppState, flag: ProductFlag) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.storage().get_products_by_flag(flag).await?))
}

/// `GET /api/products/featured`
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    by_flag(&state, ProductFlag::Featured).await
}

/// `GET /api/products/new`
pub async fn new_arrivals(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    by_flag(&state, ProductFlag::New).await
}

/// `GET /api/products/bestseller`
pub async fn bestsellers(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    by_flag(&state, ProductFlag::Bestseller).await
}

/// `GET /api/products/sale`
pub async fn on_sale(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    by_flag(&state, ProductFlag::Sale).await
}

/// `GET /api/products/category/{categoryId}`
///
/// An unparseable ID matches nothing.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let Some(category_id) = parse_id::<CategoryId>(&category_id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(
        state.storage().get_products_by_category(category_id).await?,
    ))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let Some(id) = parse_id::<ProductId>(&id) else {
        return Err(AppError::not_found("Product not found"));
    };
    state
        .storage()
        .get_product_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product not found"))
}

/// `GET /api/products/{id}/reviews`
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>> {
    let Some(id) = parse_id::<ProductId>(&id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.storage().get_reviews(id).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_a_no_op() {
        let (filter, sort) = ListingQuery::default().parse().unwrap();
        assert!(filter.is_empty());
        assert_eq!(sort, None);
    }

    #[test]
    fn test_query_parses_filters_and_sort() {
        let query = ListingQuery {
            sort: Some("price_high".to_string()),
            in_stock: Some("true".to_string()),
            is_sale: Some("0".to_string()),
            min_price: Some("1000".to_string()),
            category_id: Some("2".to_string()),
            ..ListingQuery::default()
        };
        let (filter, sort) = query.parse().unwrap();
        assert_eq!(sort, Some(SortOption::PriceHigh));
        assert!(filter.in_stock);
        assert!(!filter.is_sale);
        assert_eq!(filter.min_price, Some(Decimal::from(1000)));
        assert_eq!(filter.category_id, Some(CategoryId::new(2)));
    }

    #[test]
    fn test_query_rejects_garbage() {
        let bad_sort = ListingQuery {
            sort: Some("cheapest".to_string()),
            ..ListingQuery::default()
        };
        assert!(matches!(bad_sort.parse(), Err(AppError::BadRequest(_))));

        let bad_flag = ListingQuery {
            is_new: Some("yes".to_string()),
            ..ListingQuery::default()
        };
        assert!(matches!(bad_flag.parse(), Err(AppError::BadRequest(_))));
    }
}
