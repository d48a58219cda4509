//! The cart store: line items, mutations, derived totals, persistence.

use puppyracer_core::{
    CartLineItem, FLAT_SHIPPING_FEE, ProductId, ProductInput, is_valid_price, price,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::{CartError, PersistError};
use super::storage::LocalStorage;

/// Storage key under which the cart's item list is persisted.
pub const CART_STORAGE_KEY: &str = "puppyracer-cart";

/// Outcome of a quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The item is still in the cart with this quantity.
    Updated(u32),
    /// The item was removed from the cart.
    Removed,
    /// No item with that id was in the cart.
    NotFound,
}

/// Snapshot of the cart's derived totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: u64,
    #[serde(with = "price::number")]
    pub subtotal: Decimal,
    #[serde(with = "price::number")]
    pub shipping_cost: Decimal,
    #[serde(with = "price::number")]
    pub total: Decimal,
    pub is_empty: bool,
}

/// Cart state for one running application.
///
/// Construct one with [`CartStore::open`] at startup and hand it (or a handle
/// to it) to whatever drives the cart. Every operation that changes the cart
/// writes the full item list to storage; storage failures are logged and
/// never surface to callers.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartLineItem>,
    storage: S,
}

impl<S: LocalStorage> CartStore<S> {
    /// Open the cart, restoring any items previously saved in `storage`.
    ///
    /// A missing or unreadable saved cart yields an empty cart.
    pub fn open(storage: S) -> Self {
        let items = match load_items(&storage) {
            Ok(items) => {
                if !items.is_empty() {
                    debug!(items = items.len(), "Restored cart from storage");
                }
                items
            }
            Err(e) => {
                warn!(error = %e, "Failed to restore cart, starting empty");
                Vec::new()
            }
        };

        Self { items, storage }
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The storage backend this cart persists to.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a product, or increase its quantity if it is already in the cart.
    ///
    /// Price is normalized to a decimal (missing means free) and quantity
    /// defaults to 1. When the product is already present only the quantity
    /// changes; the stored name and price are kept.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] without touching the cart if the id is missing
    /// or not positive, the price is not a valid price (see
    /// [`is_valid_price`]), the quantity is outside `1..=u32::MAX`, or the
    /// cart total would no longer fit in a [`Decimal`].
    pub fn add_to_cart(&mut self, product: ProductInput) -> Result<CartLineItem, CartError> {
        let validated = validate(&product).inspect_err(|e| {
            warn!(error = %e, ?product, "Rejected add to cart");
        })?;
        let Validated {
            id,
            price,
            quantity,
        } = validated;

        let unit_price = self.get_item(id).map_or(price, |existing| existing.price);
        if self.checked_total_after_adding(unit_price, quantity).is_none() {
            let err = CartError::InvalidQuantity {
                id,
                quantity: i64::from(quantity),
            };
            warn!(error = %err, "Rejected add to cart, total would overflow");
            return Err(err);
        }

        let item = if let Some(existing) = self.find_mut(id) {
            let previous = existing.quantity;
            existing.quantity = existing.quantity.saturating_add(quantity);
            debug!(
                product_id = %id,
                previous,
                added = quantity,
                quantity = existing.quantity,
                "Merged product into existing cart line"
            );
            existing.clone()
        } else {
            let item = CartLineItem {
                id,
                name: product.display_name().unwrap_or_default().to_owned(),
                price,
                image: product.image.unwrap_or_default(),
                description: product.description,
                category: product.category,
                quantity,
            };
            debug!(product_id = %id, quantity, "Added new cart line");
            self.items.push(item.clone());
            item
        };

        self.persist();
        Ok(item)
    }

    /// Remove the line item for `id`, returning it if it was present.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Option<CartLineItem> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        debug!(product_id = %id, "Removed cart line");
        self.persist();
        Some(removed)
    }

    /// Add one to the quantity of `id`.
    pub fn increase_quantity(&mut self, id: ProductId) -> QuantityChange {
        let Some(item) = self.find_mut(id) else {
            return QuantityChange::NotFound;
        };
        item.quantity = item.quantity.saturating_add(1);
        let quantity = item.quantity;
        debug!(product_id = %id, quantity, "Increased cart quantity");
        self.persist();
        QuantityChange::Updated(quantity)
    }

    /// Subtract one from the quantity of `id`, removing the item instead of
    /// letting its quantity reach zero.
    pub fn decrease_quantity(&mut self, id: ProductId) -> QuantityChange {
        let Some(item) = self.find_mut(id) else {
            return QuantityChange::NotFound;
        };
        if item.quantity > 1 {
            item.quantity -= 1;
            let quantity = item.quantity;
            debug!(product_id = %id, quantity, "Decreased cart quantity");
            self.persist();
            QuantityChange::Updated(quantity)
        } else {
            self.remove_from_cart(id);
            QuantityChange::Removed
        }
    }

    /// Set the quantity of `id`.
    ///
    /// Anything below 1 removes the item. Values above `u32::MAX` are clamped.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> QuantityChange {
        if quantity < 1 {
            return match self.remove_from_cart(id) {
                Some(_) => QuantityChange::Removed,
                None => QuantityChange::NotFound,
            };
        }

        let Some(item) = self.find_mut(id) else {
            return QuantityChange::NotFound;
        };
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if item.quantity == quantity {
            return QuantityChange::Updated(quantity);
        }
        item.quantity = quantity;
        debug!(product_id = %id, quantity, "Set cart quantity");
        self.persist();
        QuantityChange::Updated(quantity)
    }

    /// Remove every item.
    pub fn clear_cart(&mut self) {
        let lines = self.items.len();
        self.items.clear();
        debug!(lines, "Cleared cart");
        self.persist();
    }

    /// The line item for `id`, if present.
    #[must_use]
    pub fn get_item(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    // =========================================================================
    // Derived totals
    // =========================================================================

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Flat shipping fee, waived while the cart is empty.
    #[must_use]
    pub fn shipping_cost(&self) -> Decimal {
        if self.is_empty() {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_FEE
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal().saturating_add(self.shipping_cost())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All derived totals at once.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count(),
            subtotal: self.subtotal(),
            shipping_cost: self.shipping_cost(),
            total: self.total(),
            is_empty: self.is_empty(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Cart total once `quantity` more units at `unit_price` are added, or
    /// `None` if any step overflows.
    fn checked_total_after_adding(&self, unit_price: Decimal, quantity: u32) -> Option<Decimal> {
        let added = unit_price.checked_mul(Decimal::from(quantity))?;
        self.items
            .iter()
            .try_fold(added, |sum, item| sum.checked_add(item.checked_line_total()?))?
            .checked_add(FLAT_SHIPPING_FEE)
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn persist(&self) {
        if let Err(e) = save_items(&self.storage, &self.items) {
            warn!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }
}

struct Validated {
    id: ProductId,
    price: Decimal,
    quantity: u32,
}

fn validate(product: &ProductInput) -> Result<Validated, CartError> {
    let id = product.id.ok_or(CartError::MissingProductId)?;
    if !id.is_valid() {
        return Err(CartError::InvalidProductId(id));
    }

    let price = product.price.unwrap_or(Decimal::ZERO);
    if !is_valid_price(price) {
        return Err(CartError::InvalidPrice { id, price });
    }

    let requested = product.quantity.unwrap_or(1);
    let quantity = u32::try_from(requested)
        .ok()
        .filter(|&q| q >= 1)
        .ok_or(CartError::InvalidQuantity {
            id,
            quantity: requested,
        })?;

    Ok(Validated {
        id,
        price,
        quantity,
    })
}

// =============================================================================
// Persistence boundary
// =============================================================================

/// Write `items` to `storage` under [`CART_STORAGE_KEY`].
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub fn save_items<S: LocalStorage>(storage: &S, items: &[CartLineItem]) -> Result<(), PersistError> {
    let json = serde_json::to_string(items)?;
    storage.set_item(CART_STORAGE_KEY, &json)?;
    Ok(())
}

/// Read the saved item list from `storage`.
///
/// A missing key is an empty cart. Saved data is sanitized on the way in:
/// entries with zero quantity, a non-positive id, or an invalid price are
/// dropped, and repeated ids are merged by summing their quantities.
///
/// # Errors
///
/// Returns an error if the storage read fails or the value is not a valid
/// item list.
pub fn load_items<S: LocalStorage>(storage: &S) -> Result<Vec<CartLineItem>, PersistError> {
    let Some(raw) = storage.get_item(CART_STORAGE_KEY)? else {
        return Ok(Vec::new());
    };
    let saved: Vec<CartLineItem> = serde_json::from_str(&raw)?;
    let saved_lines = saved.len();

    let mut items: Vec<CartLineItem> = Vec::with_capacity(saved_lines);
    for item in saved {
        if item.quantity == 0 || !item.id.is_valid() || !is_valid_price(item.price) {
            continue;
        }
        if let Some(existing) = items.iter_mut().find(|existing| existing.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }

    if items.len() != saved_lines {
        warn!(
            saved = saved_lines,
            kept = items.len(),
            "Saved cart contained invalid or duplicate lines"
        );
    }

    Ok(items)
}
