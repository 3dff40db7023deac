//! Request-scoped models that are not storage entities.
//!
//! Stored records live in `homestyle_core::entities`.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
