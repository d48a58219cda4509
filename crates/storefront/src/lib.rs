//! Puppyracer Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the server binary and the CLI.
//!
//! - [`cart`] - Cart store and its local storage backends
//! - [`catalog`] - Read-only product catalog
//! - [`routes`] - JSON API over the cart and catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with request tracing.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
