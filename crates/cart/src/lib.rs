//! Homestyle Cart - client-side cart state.
//!
//! The cart lives entirely on the client and only meets the server at
//! checkout, when [`CartStore::checkout_lines`] snapshots it into order lines.
//!
//! State changes go through a pure reducer ([`reduce`]). The [`CartStore`]
//! wraps it with the two side effects every transition has: writing the new
//! items to [`CartStorage`] and raising a [`Notification`].
//!
//! ```rust
//! use homestyle_cart::{CartStore, MemoryStorage, RecordingNotifier};
//!
//! let mut cart = CartStore::load(MemoryStorage::default(), RecordingNotifier::default());
//! assert_eq!(cart.item_count(), 0);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod item;
pub mod notify;
pub mod reducer;
pub mod storage;
pub mod store;

pub use item::CartItem;
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use reducer::{CartAction, reduce};
pub use storage::{CART_STORAGE_KEY, CartStorage, CartStorageError, JsonFileStorage, MemoryStorage};
pub use store::CartStore;
