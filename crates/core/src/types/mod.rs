//! Core types for Puppyracer.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartLineItem, ProductInput};
pub use id::*;
pub use price::{FLAT_SHIPPING_FEE, MAX_PRICE, format_price, is_valid_price};
pub use product::Product;
