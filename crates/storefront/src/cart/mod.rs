//! Shopping cart state.
//!
//! [`CartStore`] is the single owner of the in-progress order. Callers change
//! the cart only through its operations, which keep two invariants: one line
//! item per product id, and every quantity at least 1. Totals are computed on
//! read. The item list is mirrored into a [`LocalStorage`] backend under
//! [`CART_STORAGE_KEY`] so a cart survives restarts.

pub mod error;
pub mod storage;
pub mod store;

pub use error::{CartError, PersistError};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, SharedStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore, CartSummary, QuantityChange, load_items, save_items};
