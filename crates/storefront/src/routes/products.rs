//! Product and category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use puppyracer_core::{Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Search query parameters (`?q=`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// List products, optionally filtered by `?q=`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Product>> {
    Json(owned(state.catalog().search(&query.q)))
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List category slugs.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
}

/// List products in a category, optionally filtered by `?q=`.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let catalog = state.catalog();
    let known = catalog
        .categories()
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&category));
    if !known {
        return Err(AppError::NotFound(format!("category {category}")));
    }

    Ok(Json(owned(catalog.filter(Some(&category), &query.q))))
}

fn owned(products: Vec<&Product>) -> Vec<Product> {
    products.into_iter().cloned().collect()
}
