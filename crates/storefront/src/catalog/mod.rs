//! Read-only product catalog.
//!
//! The storefront ships with a built-in catalog (`catalog.yaml`, embedded at
//! compile time). A deployment can replace it with its own YAML file of the
//! same shape.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use puppyracer_core::{Product, ProductId, is_valid_price};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),

    #[error("Invalid product id in catalog: {0}")]
    InvalidId(ProductId),

    #[error("Invalid price for product {0} in catalog")]
    InvalidPrice(ProductId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    default_image: String,
    products: Vec<Product>,
}

/// The set of products the storefront offers.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    default_image: String,
}

impl Catalog {
    /// Load the catalog embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded YAML is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load a catalog from `path`, or the built-in one when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Loaded catalog from file"
        );
        Ok(catalog)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, product ids are repeated
    /// or not positive, or a price is not a valid cart price.
    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;

        let mut seen = BTreeSet::new();
        for product in &file.products {
            if !product.id.is_valid() {
                return Err(CatalogError::InvalidId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !is_valid_price(product.price) {
                return Err(CatalogError::InvalidPrice(product.id));
            }
        }

        Ok(Self {
            products: file.products,
            default_image: file.default_image,
        })
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products in `category` (case-insensitive).
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.filter(Some(category), "")
    }

    /// Products whose name, description, or category contains `query`
    /// (case-insensitive). A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        self.filter(None, query)
    }

    /// Products matching both an optional category and a search query.
    #[must_use]
    pub fn filter(&self, category: Option<&str>, query: &str) -> Vec<&Product> {
        let category = category.map(str::to_lowercase);
        let query = query.trim().to_lowercase();

        self.products
            .iter()
            .filter(|product| {
                category.as_deref().is_none_or(|wanted| {
                    product
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase() == wanted)
                })
            })
            .filter(|product| query.is_empty() || matches_query(product, &query))
            .collect()
    }

    /// Distinct category slugs, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.products
            .iter()
            .filter_map(|product| product.category.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Image for `id`, falling back to the catalog's default image for
    /// unknown products and products without one.
    #[must_use]
    pub fn image_for(&self, id: ProductId) -> &str {
        self.get(id)
            .and_then(|product| product.image.as_deref())
            .unwrap_or(&self.default_image)
    }
}

fn matches_query(product: &Product, query: &str) -> bool {
    let fields = [
        Some(product.name.as_str()),
        product.description.as_deref(),
        product.category.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(query))
}
