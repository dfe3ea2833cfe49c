//! Catalog commands.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ampkicks_core::{Catalog, CatalogError, FilterCriteria, Gender, Price, Product};
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The catalog file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is malformed or has an invalid product.
    #[error("Invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// A `--gender` value is not a known gender.
    #[error("{0}. Valid genders: men, women, unisex, kids")]
    InvalidGender(String),
}

fn load(path: &Path) -> Result<Catalog, CatalogCommandError> {
    let json = fs::read_to_string(path).map_err(|source| CatalogCommandError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| CatalogCommandError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Build filter criteria from command-line arguments.
///
/// # Errors
///
/// Returns [`CatalogCommandError::InvalidGender`] for an unknown gender.
pub fn criteria(
    query: Option<String>,
    categories: Vec<String>,
    genders: &[String],
    max_price: Option<u64>,
) -> Result<FilterCriteria, CatalogCommandError> {
    let mut criteria = FilterCriteria::default();
    if let Some(query) = query {
        criteria = criteria.with_search(query);
    }
    for category in categories {
        criteria = criteria.with_category(category);
    }
    for gender in genders {
        let gender: Gender = gender.parse().map_err(CatalogCommandError::InvalidGender)?;
        criteria = criteria.with_gender(gender);
    }
    if let Some(max_price) = max_price {
        criteria = criteria.with_max_price(Price::new(max_price));
    }
    Ok(criteria)
}

/// Validate a catalog file and print a summary.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn validate(path: &Path) -> Result<(), CatalogCommandError> {
    let catalog = load(path)?;
    tracing::info!(path = %path.display(), products = catalog.len(), "Catalog is valid");

    #[allow(clippy::print_stdout)]
    {
        print!("{}", summarize(&catalog));
    }
    Ok(())
}

/// Print the products of a catalog file that match `criteria`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn search(path: &Path, criteria: &FilterCriteria) -> Result<(), CatalogCommandError> {
    let catalog = load(path)?;
    let matches = catalog.filter(criteria);

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render_products(&matches));
    }
    Ok(())
}

fn summarize(catalog: &Catalog) -> String {
    let mut out = format!("OK: {} products\n", catalog.len());
    for gender in [Gender::Men, Gender::Women, Gender::Unisex, Gender::Kids] {
        let count = catalog
            .products()
            .iter()
            .filter(|p| p.gender == gender)
            .count();
        if count > 0 {
            let _ = writeln!(out, "  {gender}: {count}");
        }
    }
    out
}

fn render_products(products: &[&Product]) -> String {
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:>10}  {:<12} {:<7} {}",
            product.id,
            product.name,
            product.price.to_string(),
            product.category,
            product.gender.as_str(),
            product.star_rating(),
        );
    }
    let _ = writeln!(out, "{} product(s)", products.len());
    out
}
