//! Integration tests for Puppyracer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p puppyracer-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart store behavior across operation sequences and
//!   persistence backends
//! - `cart_api` - Storefront HTTP API driven in-process through the router
//!
//! No external services are needed: the API tests call the router directly
//! and storage lives in memory or in a temporary directory.

use std::str::FromStr;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use puppyracer_core::{ProductId, ProductInput};
use puppyracer_storefront::cart::MemoryStorage;
use puppyracer_storefront::catalog::{Catalog, CatalogError};
use puppyracer_storefront::config::StorefrontConfig;
use puppyracer_storefront::state::AppState;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

/// Response bodies larger than this are a test failure.
const BODY_LIMIT: usize = 1024 * 1024;

/// Parse a decimal literal.
///
/// # Panics
///
/// Panics if `s` is not a decimal number.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A fully specified product input.
#[must_use]
pub fn product(id: i32, name: &str, price: &str) -> ProductInput {
    ProductInput::new(ProductId::new(id))
        .with_name(name)
        .with_price(dec(price))
        .with_image(format!("/static/product_pics/{id}.png"))
}

/// Build the storefront router over in-memory storage.
///
/// The returned storage shares its contents with the one the router's cart
/// writes to.
///
/// # Errors
///
/// Returns an error if the built-in catalog fails to load.
pub fn test_app() -> Result<(Router, MemoryStorage), CatalogError> {
    let storage = MemoryStorage::new();
    Ok((app_with_storage(storage.clone())?, storage))
}

/// Build the storefront router over the given in-memory storage.
///
/// # Errors
///
/// Returns an error if the built-in catalog fails to load.
pub fn app_with_storage(storage: MemoryStorage) -> Result<Router, CatalogError> {
    let state = AppState::new(StorefrontConfig::default(), Catalog::builtin()?, storage);
    Ok(puppyracer_storefront::app(state))
}

/// Send a GET request and return `(status, json_body)`.
///
/// Non-JSON bodies come back as a JSON string.
///
/// # Panics
///
/// Panics if the request cannot be built or the router fails.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request build should succeed");
    send(app, request).await
}

/// Send a POST request with a JSON body and return `(status, json_body)`.
///
/// # Panics
///
/// Panics if the request cannot be built or the router fails.
pub async fn post(app: &Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request build should succeed");
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(request)
        .await
        .expect("app should handle request");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("response body should be readable");
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}
