//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add two of product 4 and show the cart
//! pr-cli cart add 4 -q 2
//! pr-cli cart show
//!
//! # Adjust quantities
//! pr-cli cart increase 4
//! pr-cli cart set 4 5
//! pr-cli cart set 4 0      # removes the line
//!
//! # Empty the cart
//! pr-cli cart clear
//! ```
//!
//! The cart is read from and written to the same storage directory the
//! storefront server uses (`PUPPYRACER_STORAGE_DIR`, or `--storage-dir`).

use puppyracer_core::{CartLineItem, ProductId, format_price};
use puppyracer_storefront::cart::{CartStore, FileStorage, LocalStorage, QuantityChange};
use puppyracer_storefront::catalog::Catalog;
use tracing::info;

use super::CommandError;

/// Open the cart persisted under `storage_dir`.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be created.
pub fn open(storage_dir: &std::path::Path) -> Result<CartStore<FileStorage>, CommandError> {
    let storage = FileStorage::open(storage_dir)?;
    Ok(CartStore::open(storage))
}

/// Add `quantity` of a catalog product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog or the cart rejects
/// the input.
pub fn add<S: LocalStorage>(
    cart: &mut CartStore<S>,
    catalog: &Catalog,
    id: ProductId,
    quantity: u32,
) -> Result<CartLineItem, CommandError> {
    let product = catalog.get(id).ok_or(CommandError::UnknownProduct(id))?;

    let mut input = product.to_cart_input(quantity);
    if input.image.is_none() {
        input.image = Some(catalog.image_for(id).to_owned());
    }

    let item = cart.add_to_cart(input)?;
    info!("Added {quantity} x {} (now {} in cart)", item.name, item.quantity);
    Ok(item)
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn remove<S: LocalStorage>(
    cart: &mut CartStore<S>,
    id: ProductId,
) -> Result<CartLineItem, CommandError> {
    let item = cart.remove_from_cart(id).ok_or(CommandError::NotInCart(id))?;
    info!("Removed {}", item.name);
    Ok(item)
}

/// Increase a line's quantity by one.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn increase<S: LocalStorage>(
    cart: &mut CartStore<S>,
    id: ProductId,
) -> Result<QuantityChange, CommandError> {
    report_change(id, cart.increase_quantity(id))
}

/// Decrease a line's quantity by one, removing it at zero.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn decrease<S: LocalStorage>(
    cart: &mut CartStore<S>,
    id: ProductId,
) -> Result<QuantityChange, CommandError> {
    report_change(id, cart.decrease_quantity(id))
}

/// Set a line's quantity; anything below 1 removes it.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn set<S: LocalStorage>(
    cart: &mut CartStore<S>,
    id: ProductId,
    quantity: i64,
) -> Result<QuantityChange, CommandError> {
    report_change(id, cart.update_quantity(id, quantity))
}

/// Empty the cart.
pub fn clear<S: LocalStorage>(cart: &mut CartStore<S>) {
    cart.clear_cart();
    info!("Cart cleared");
}

/// Log the cart's lines and totals.
pub fn show<S: LocalStorage>(cart: &CartStore<S>) {
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!("Cart");
    info!("====");
    for item in cart.items() {
        info!(
            "  [{}] {} x {} @ {} = {}",
            item.id,
            item.quantity,
            item.name,
            format_price(item.price),
            format_price(item.line_total())
        );
    }

    let summary = cart.summary();
    info!("Items:    {}", summary.item_count);
    info!("Subtotal: {}", format_price(summary.subtotal));
    info!("Shipping: {}", format_price(summary.shipping_cost));
    info!("Total:    {}", format_price(summary.total));
}

fn report_change(id: ProductId, change: QuantityChange) -> Result<QuantityChange, CommandError> {
    match change {
        QuantityChange::Updated(quantity) => info!("Product {id} quantity is now {quantity}"),
        QuantityChange::Removed => info!("Product {id} removed from cart"),
        QuantityChange::NotFound => return Err(CommandError::NotInCart(id)),
    }
    Ok(change)
}
