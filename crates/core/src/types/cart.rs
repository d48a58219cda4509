//! Cart line items and the product payload callers hand to the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price;

/// One entry in the cart: a distinct product and how many of it were ordered.
///
/// This is also the persisted record format; a stored cart is a JSON array of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unit price.
    #[serde(with = "price::number")]
    pub price: Decimal,
    /// Image URL or asset path.
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Price of this line (`price * quantity`), saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Price of this line, or `None` if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Product-like object supplied to the cart's add operation.
///
/// Every field is optional at the type level so that malformed input reaches
/// the cart's validation instead of failing during deserialization. `title`
/// is accepted as a fallback for `name`, matching catalog payloads that use
/// either key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub title: Option<String>,
    /// Unit price; numbers and numeric strings are both accepted.
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Defaults to 1 when absent.
    pub quantity: Option<i64>,
}

impl ProductInput {
    /// Start an input for the given product.
    #[must_use]
    pub fn new(id: ProductId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// The display name, preferring `name` over `title`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.title.as_deref())
    }
}
