//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! pr-cli products list
//! pr-cli products list --category leinen --search leder
//! pr-cli products show 4
//! ```

use puppyracer_core::{Product, ProductId, format_price};
use puppyracer_storefront::catalog::Catalog;
use tracing::info;

use super::CommandError;

/// List products, optionally narrowed by category and search query.
pub fn list<'a>(catalog: &'a Catalog, category: Option<&str>, search: &str) -> Vec<&'a Product> {
    let products = catalog.filter(category, search);

    if products.is_empty() {
        info!("No products found");
        return products;
    }

    for product in &products {
        info!(
            "  [{}] {} - {} ({})",
            product.id,
            product.name,
            format_price(product.price),
            product.category.as_deref().unwrap_or("-")
        );
    }
    info!("{} product(s)", products.len());
    products
}

/// Show a single product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog.
pub fn show(catalog: &Catalog, id: ProductId) -> Result<&Product, CommandError> {
    let product = catalog.get(id).ok_or(CommandError::UnknownProduct(id))?;

    info!("{} ({})", product.name, product.id);
    info!("  Price:    {}", format_price(product.price));
    if let Some(category) = &product.category {
        info!("  Category: {category}");
    }
    info!("  Image:    {}", catalog.image_for(id));
    if let Some(description) = &product.description {
        info!("  {description}");
    }
    Ok(product)
}
