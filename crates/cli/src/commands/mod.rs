//! Command implementations for `pr-cli`.

pub mod cart;
pub mod products;

use puppyracer_core::ProductId;
use puppyracer_storefront::cart::{CartError, StorageError};
use puppyracer_storefront::catalog::CatalogError;
use puppyracer_storefront::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
