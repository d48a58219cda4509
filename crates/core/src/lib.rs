//! Puppyracer Core - Shared types library.
//!
//! This crate provides common types used across all Puppyracer components:
//! - `storefront` - Cart store, product catalog and JSON API
//! - `cli` - Command-line driver for the cart and catalog
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, cart line items and catalog products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
