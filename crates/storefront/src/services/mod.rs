//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `orders` - Checkout validation and order assembly

pub mod auth;
pub mod orders;
