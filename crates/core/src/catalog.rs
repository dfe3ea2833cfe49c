//! Product records and catalog loading.
//!
//! The catalog is a read-only JSON document with the product list under a
//! `products` key. It is parsed and validated once, at the boundary, so the
//! filter and the cart ledger only ever see well-formed products.

use core::fmt;
use core::str::FromStr;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::filter::{FilterCriteria, filter_products};
use crate::types::{Price, ProductId};

/// Highest allowed rating.
pub const MAX_RATING: f32 = 5.0;

/// Errors that can occur when loading a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The document is not valid JSON or is missing required fields.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Two products share an identifier.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    /// A product has a blank name.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    /// A product lists no sizes.
    #[error("product {0} has no sizes")]
    NoSizes(ProductId),
    /// A product's rating is outside 0-5.
    #[error("product {id} has rating {rating}, expected 0-5")]
    RatingOutOfRange {
        /// Offending product.
        id: ProductId,
        /// Rating as found in the catalog.
        rating: f32,
    },
}

/// Target audience of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Unisex,
    Kids,
}

impl Gender {
    /// The tag as it appears in catalog files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Unisex => "Unisex",
            Self::Kids => "Kids",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Case-insensitive, so query strings like `?gender=men` work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "unisex" => Ok(Self::Unisex),
            "kids" => Ok(Self::Kids),
            _ => Err(format!("invalid gender: {s}")),
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub category: String,
    pub gender: Gender,
    #[serde(default)]
    pub rating: f32,
    /// Available sizes in display order. Never empty once loaded.
    pub sizes: Vec<String>,
    /// Primary image.
    pub image: String,
    /// Gallery images. Falls back to the primary image when the catalog omits it.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Whether `size` is one of this product's sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// The first listed size, used when adding straight from a listing.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// Capture the fields a cart line keeps.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    /// Five-glyph star rating from the floored rating, e.g. `★★★★☆` for 4.6.
    #[must_use]
    pub fn star_rating(&self) -> String {
        // rating is validated to 0..=5 on load
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let full = self.rating.clamp(0.0, MAX_RATING).floor() as usize;
        let mut stars = "★".repeat(full);
        stars.push_str(&"☆".repeat(5 - full));
        stars
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName(self.id));
        }
        if self.sizes.is_empty() {
            return Err(CatalogError::NoSizes(self.id));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(CatalogError::RatingOutOfRange {
                id: self.id,
                rating: self.rating,
            });
        }
        Ok(())
    }
}

/// The product fields a cart line captures at add-time.
///
/// Prices in a cart do not follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
}

#[derive(Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

/// The validated, read-only product list for a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from already-parsed products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for the first product that has a duplicate
    /// id, a blank name, no sizes, or a rating outside 0-5.
    pub fn new(mut products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &mut products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            product.validate()?;
            if product.images.is_empty() {
                product.images.push(product.image.clone());
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog document (`{"products": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the document is malformed or a
    /// product is missing a required field, otherwise the validation errors
    /// of [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.products)
    }

    /// All products in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The first `n` products, as shown on the landing page.
    #[must_use]
    pub fn featured(&self, n: usize) -> &[Product] {
        self.products.get(..n).unwrap_or(&self.products)
    }

    /// Products matching `criteria`, in source order.
    #[must_use]
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Product> {
        filter_products(&self.products, criteria)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
