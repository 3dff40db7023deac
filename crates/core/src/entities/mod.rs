//! Entity schema for the storefront.
//!
//! Each persisted record kind has a read type (with its repository-assigned
//! ID) and a `New*` insert type. Field names serialize as camelCase, which is
//! what the browser client sends and expects.

pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use catalog::{Category, NewCategory, NewProduct, Product};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderLine, OrderWithItems};
pub use review::{NewReview, Review};
pub use user::{NewUser, User, UserProfile, UserUpdate};
