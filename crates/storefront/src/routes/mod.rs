//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//!
//! # Catalog
//! GET  /api/products                 - Product listing (?q= to search)
//! GET  /api/products/{id}            - Product detail
//! GET  /api/categories               - Category slugs
//! GET  /api/categories/{category}    - Products in a category (?q= to search)
//!
//! # Cart
//! GET  /api/cart                     - Cart items and totals
//! GET  /api/cart/count               - Cart count badge
//! GET  /api/cart/items/{id}          - Single cart line
//! POST /api/cart/add                 - Add a product
//! POST /api/cart/increase            - Increase a line's quantity
//! POST /api/cart/decrease            - Decrease a line's quantity
//! POST /api/cart/update              - Set a line's quantity
//! POST /api/cart/remove              - Remove a line
//! POST /api/cart/clear               - Empty the cart
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::categories))
        .route("/{category}", get(products::category))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/items/{id}", get(cart::item))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/cart", cart_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
