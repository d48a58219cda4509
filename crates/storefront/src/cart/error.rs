//! Cart error types.

use puppyracer_core::ProductId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::storage::StorageError;

/// Validation failures for cart operations.
///
/// A rejected operation leaves the cart untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Product id is missing")]
    MissingProductId,

    #[error("Invalid product id: {0}")]
    InvalidProductId(ProductId),

    #[error("Invalid price for product {id}: {price}")]
    InvalidPrice { id: ProductId, price: Decimal },

    #[error("Invalid quantity for product {id}: {quantity}")]
    InvalidQuantity { id: ProductId, quantity: i64 },
}

/// Failures at the persistence boundary.
///
/// The cart store logs these and carries on with its in-memory state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
