//! Cart route handlers.
//!
//! Every handler runs exactly one cart operation under the state's cart lock
//! and answers with JSON. Mutations respond with the whole cart so the UI can
//! re-render totals without a second request.

use axum::{
    Json,
    extract::{Path, State},
};
use puppyracer_core::{CartLineItem, ProductId, ProductInput};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartStore, CartSummary, LocalStorage, QuantityChange};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart display data: line items plus derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    #[serde(flatten)]
    pub summary: CartSummary,
}

impl<S: LocalStorage> From<&CartStore<S>> for CartView {
    fn from(cart: &CartStore<S>) -> Self {
        Self {
            items: cart.items().to_vec(),
            summary: cart.summary(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Request naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub id: ProductId,
}

/// Set-quantity request. Fractional quantities are floored.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub id: ProductId,
    pub quantity: f64,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(state.with_cart(|cart| CartView::from(&*cart)))
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let count = state.with_cart(|cart| cart.item_count());
    Json(CartCount { count })
}

/// Get a single cart line.
#[instrument(skip(state))]
pub async fn item(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CartLineItem>> {
    state
        .with_cart(|cart| cart.get_item(id).cloned())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id} is not in the cart")))
}

/// Add a product to the cart.
///
/// Products posted without an image get the catalog's image for that id.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<Json<CartView>> {
    let mut input = input;
    if input.image.is_none() {
        if let Some(id) = input.id {
            input.image = Some(state.catalog().image_for(id).to_owned());
        }
    }

    let (item, view) = state.with_cart(|cart| {
        let item = cart.add_to_cart(input)?;
        Ok::<_, AppError>((item, CartView::from(&*cart)))
    })?;

    let id = item.id.to_string();
    let quantity = item.quantity.to_string();
    let data = [("product_id", id.as_str()), ("quantity", quantity.as_str())];
    add_breadcrumb("cart", "Added product to cart", Some(data.as_slice()));

    Ok(Json(view))
}

/// Increase a line's quantity by one.
#[instrument(skip(state))]
pub async fn increase(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Json<CartView> {
    Json(state.with_cart(|cart| {
        log_change(request.id, cart.increase_quantity(request.id));
        CartView::from(&*cart)
    }))
}

/// Decrease a line's quantity by one, removing it at zero.
#[instrument(skip(state))]
pub async fn decrease(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Json<CartView> {
    Json(state.with_cart(|cart| {
        log_change(request.id, cart.decrease_quantity(request.id));
        CartView::from(&*cart)
    }))
}

/// Set a line's quantity. Anything below 1 removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    if !request.quantity.is_finite() {
        return Err(AppError::BadRequest("quantity must be a number".to_string()));
    }
    #[allow(clippy::cast_possible_truncation)] // Float-to-int casts saturate
    let quantity = request.quantity.floor() as i64;

    Ok(Json(state.with_cart(|cart| {
        log_change(request.id, cart.update_quantity(request.id, quantity));
        CartView::from(&*cart)
    })))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Json<CartView> {
    Json(state.with_cart(|cart| {
        if cart.remove_from_cart(request.id).is_some() {
            add_breadcrumb("cart", "Removed product from cart", None);
        }
        CartView::from(&*cart)
    }))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    Json(state.with_cart(|cart| {
        cart.clear_cart();
        CartView::from(&*cart)
    }))
}

fn log_change(id: ProductId, change: QuantityChange) {
    if change == QuantityChange::NotFound {
        tracing::debug!(product_id = %id, "Quantity change for product not in cart");
    }
}
