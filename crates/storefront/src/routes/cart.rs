//! Cart route handlers.
//!
//! Each handler holds the session lock for its whole load, mutate, save
//! cycle, so concurrent requests see each other's writes in order.

use ampkicks_core::{Cart, LineItem, Price, ProductId, Quantity};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;

/// Largest quantity accepted by a single add.
pub const MAX_QUANTITY_PER_ADD: u32 = 10;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    /// Position of the line; the handle for update and remove.
    pub index: usize,
    #[serde(flatten)]
    pub line: LineItem,
    pub line_total: Price,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| CartItemView {
                    index,
                    line: line.clone(),
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            total: totals.total,
            item_count: cart.item_count(),
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Defaults to the product's first size.
    pub size: Option<String>,
    /// Defaults to one.
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub delta: i32,
}

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let cart = state
        .with_session(|session| Ok(session.load_cart()?))
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// The product and size are resolved against the catalog before the cart is
/// touched.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    let product = state
        .catalog()
        .get(request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let size = match request.size {
        Some(size) if product.offers_size(&size) => size,
        Some(size) => {
            return Err(AppError::BadRequest(format!(
                "size {size} is not available for {}",
                product.name
            )));
        }
        None => product
            .default_size()
            .map(String::from)
            .ok_or_else(|| AppError::Internal(format!("product {} has no sizes", product.id)))?,
    };

    let quantity = parse_add_quantity(request.quantity)?;
    let snapshot = product.snapshot();
    let product_id = product.id;

    let line_size = size.clone();
    let (cart, index) = state
        .with_session(move |session| {
            let mut cart = session.load_cart()?;
            let index = cart.add_item(snapshot, line_size, quantity);
            session.save_cart(&cart)?;
            Ok((cart, index))
        })
        .await?;

    let product_id_text = product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("product_id", product_id_text.as_str()), ("size", size.as_str())]),
    );
    tracing::info!(%product_id, %size, %quantity, index, "Added item to cart");

    Ok((StatusCode::CREATED, Json(CartView::from(&cart))))
}

fn parse_add_quantity(quantity: Option<u32>) -> Result<Quantity> {
    let Some(n) = quantity else {
        return Ok(Quantity::ONE);
    };
    if n > MAX_QUANTITY_PER_ADD {
        return Err(AppError::BadRequest(format!(
            "quantity must be between 1 and {MAX_QUANTITY_PER_ADD}"
        )));
    }
    Quantity::new(n).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Change a line's quantity by a signed delta.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    PathParam(index): PathParam<usize>,
    JsonBody(request): JsonBody<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let delta = request.delta;
    let (cart, quantity) = state
        .with_session(move |session| {
            let mut cart = session.load_cart()?;
            let quantity = cart.update_quantity(index, delta)?;
            session.save_cart(&cart)?;
            Ok((cart, quantity))
        })
        .await?;

    tracing::info!(index, delta, %quantity, "Updated cart quantity");
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    PathParam(index): PathParam<usize>,
) -> Result<Json<CartView>> {
    let (cart, removed) = state
        .with_session(move |session| {
            let mut cart = session.load_cart()?;
            let removed = cart.remove_item(index)?;
            session.save_cart(&cart)?;
            Ok((cart, removed))
        })
        .await?;

    add_breadcrumb("cart", "Removed item from cart", None);
    tracing::info!(index, product_id = %removed.product_id, "Removed item from cart");
    Ok(Json(CartView::from(&cart)))
}

/// Total units in the cart, for the header badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<CartCountView>> {
    let cart = state
        .with_session(|session| Ok(session.load_cart()?))
        .await?;
    Ok(Json(CartCountView {
        count: cart.item_count(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_quantity_bounds() {
        assert_eq!(parse_add_quantity(None).unwrap(), Quantity::ONE);
        assert_eq!(parse_add_quantity(Some(10)).unwrap().get(), 10);
        assert!(matches!(
            parse_add_quantity(Some(0)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_add_quantity(Some(11)),
            Err(AppError::BadRequest(_))
        ));
    }
}
