//! Catalog product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::ProductInput;
use super::id::ProductId;
use super::price;

/// A product offered in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Display name (`title` is accepted as an alias in catalog files).
    #[serde(alias = "title")]
    pub name: String,
    #[serde(with = "price::number")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category slug (e.g. `leinen`, `snacks`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Build the payload for adding `quantity` of this product to a cart.
    #[must_use]
    pub fn to_cart_input(&self, quantity: u32) -> ProductInput {
        ProductInput {
            id: Some(self.id),
            name: Some(self.name.clone()),
            title: None,
            price: Some(self.price),
            image: self.image.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            quantity: Some(i64::from(quantity)),
        }
    }
}
