//! Product route handlers.

use ampkicks_core::{FilterCriteria, Gender, Price, Product, ProductId};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::{PathParam, QueryParams};
use crate::state::AppState;

/// Number of products shown on the home page.
pub const FEATURED_COUNT: usize = 8;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Price,
    pub price_display: String,
    pub category: String,
    pub gender: Gender,
    pub rating: f32,
    pub stars: String,
    pub sizes: Vec<String>,
    pub image: String,
    pub images: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            description: product.description.clone(),
            price: product.price,
            price_display: product.price.to_string(),
            category: product.category.clone(),
            gender: product.gender,
            rating: product.rating,
            stars: product.star_rating(),
            sizes: product.sizes.clone(),
            image: product.image.clone(),
            images: product.images.clone(),
        }
    }
}

/// A page of products.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub count: usize,
    pub products: Vec<ProductView>,
}

impl<'a> FromIterator<&'a Product> for ProductListView {
    fn from_iter<I: IntoIterator<Item = &'a Product>>(iter: I) -> Self {
        let products: Vec<ProductView> = iter.into_iter().map(ProductView::from).collect();
        Self {
            count: products.len(),
            products,
        }
    }
}

/// Listing query parameters.
///
/// `category` and `gender` take comma-separated lists; a product matches if
/// it is in any of the listed values.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub gender: Option<String>,
    pub max_price: Option<u64>,
}

impl TryFrom<ProductQuery> for FilterCriteria {
    type Error = AppError;

    fn try_from(query: ProductQuery) -> Result<Self> {
        let mut criteria = Self::default();

        if let Some(q) = query.q {
            criteria = criteria.with_search(q);
        }
        for category in split_list(query.category.as_deref()) {
            criteria = criteria.with_category(category);
        }
        for gender in split_list(query.gender.as_deref()) {
            let gender = gender.parse::<Gender>().map_err(AppError::BadRequest)?;
            criteria = criteria.with_gender(gender);
        }
        if let Some(max) = query.max_price {
            criteria = criteria.with_max_price(Price::new(max));
        }

        Ok(criteria)
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// List products matching the query, in catalog order.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> Result<Json<ProductListView>> {
    let criteria = FilterCriteria::try_from(query)?;
    let list: ProductListView = state.catalog().filter(&criteria).into_iter().collect();

    tracing::debug!(count = list.count, "Filtered products");
    Ok(Json(list))
}

/// The first products in the catalog.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<ProductListView> {
    Json(state.catalog().featured(FEATURED_COUNT).iter().collect())
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<u32>,
) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_criteria() {
        let query = ProductQuery {
            q: Some("runner".to_string()),
            category: Some("Running, Basketball,".to_string()),
            gender: Some("men,women".to_string()),
            max_price: Some(5000),
        };
        let criteria = FilterCriteria::try_from(query).unwrap();

        let expected = FilterCriteria::default()
            .with_search("runner")
            .with_category("Running")
            .with_category("Basketball")
            .with_gender(Gender::Men)
            .with_gender(Gender::Women)
            .with_max_price(Price::new(5000));
        assert_eq!(criteria, expected);
    }

    #[test]
    fn test_empty_query_is_unrestricted() {
        let criteria = FilterCriteria::try_from(ProductQuery::default()).unwrap();
        assert!(criteria.is_unrestricted());
    }

    #[test]
    fn test_unknown_gender_is_bad_request() {
        let query = ProductQuery {
            gender: Some("robots".to_string()),
            ..ProductQuery::default()
        };
        assert!(matches!(
            FilterCriteria::try_from(query),
            Err(AppError::BadRequest(_))
        ));
    }
}
