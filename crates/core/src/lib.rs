//! Homestyle Core - shared types and catalog rules.
//!
//! Used by every Homestyle component:
//! - `storefront` - the JSON API server
//! - `cart` - client-side cart state
//! - `cli` - migrations, seeding and order maintenance
//!
//! # Architecture
//!
//! The core crate has no I/O: no database access, no HTTP, no files. The
//! optional `postgres` feature only adds `sqlx` encode/decode impls for the
//! ID and status types.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails and order statuses
//! - [`entities`] - Stored records and their insert/update shapes
//! - [`listing`] - Product flags, search matching, filters and sort orders
//! - [`pricing`] - Shipping, coupons and checkout totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entities;
pub mod listing;
pub mod pricing;
pub mod types;

pub use entities::*;
pub use listing::{ProductFilter, ProductFlag, SortOption, SortOptionError, matches_search};
pub use pricing::{CheckoutSummary, Coupon, CouponError};
pub use types::*;
