//! Catalog filtering.
//!
//! A product is shown when it passes every active predicate: free-text
//! search, category, gender, and maximum price. Inactive predicates (empty
//! search, empty sets, no price bound) accept everything, so the default
//! criteria return the whole catalog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Gender, Product};
use crate::types::Price;

/// What the shopper is currently filtering by.
///
/// ```
/// use ampkicks_core::{FilterCriteria, Gender, Price};
///
/// let criteria = FilterCriteria::default()
///     .with_search("runner")
///     .with_gender(Gender::Women)
///     .with_max_price(Price::new(6000));
/// assert!(!criteria.is_unrestricted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of name, description, or category.
    #[serde(default)]
    pub search: String,
    /// Accepted categories. Empty accepts all.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Accepted genders. Empty accepts all.
    #[serde(default)]
    pub genders: BTreeSet<Gender>,
    /// Inclusive upper bound on price. `None` accepts all.
    #[serde(default)]
    pub max_price: Option<Price>,
}

impl FilterCriteria {
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.genders.insert(gender);
        self
    }

    #[must_use]
    pub const fn with_max_price(mut self, max_price: Price) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// True when no predicate is active.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.search.is_empty()
            && self.categories.is_empty()
            && self.genders.is_empty()
            && self.max_price.is_none()
    }

    /// Whether `product` passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_with_needle(product, &self.search.to_lowercase())
    }

    fn matches_with_needle(&self, product: &Product, needle: &str) -> bool {
        matches_search(product, needle)
            && (self.categories.is_empty() || self.categories.contains(&product.category))
            && (self.genders.is_empty() || self.genders.contains(&product.gender))
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

fn matches_search(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
}

/// Products matching `criteria`, preserving their relative order.
///
/// An empty result is a normal outcome, not an error.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let needle = criteria.search.to_lowercase();
    products
        .iter()
        .filter(|product| criteria.matches_with_needle(product, &needle))
        .collect()
}
