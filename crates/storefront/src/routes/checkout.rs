//! Checkout and order history handlers.

use ampkicks_core::{CheckoutForm, Order};
use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::extract::JsonBody;
use crate::state::AppState;

/// Place an order from the current cart.
///
/// The order and the emptied cart are written together. On any failure,
/// validation or storage, neither the cart nor the history changes.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<CheckoutForm>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .with_session(move |session| {
            let cart = session.load_cart()?;
            let (order, emptied) = cart.checkout(&form).inspect_err(|e| {
                tracing::info!(error = %e, "Checkout rejected");
            })?;
            session.record_order(&order, &emptied)?;
            Ok(order)
        })
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.order_number.as_str())]),
    );
    tracing::info!(
        order_number = %order.order_number,
        items = order.items.len(),
        total = %order.total,
        payment_method = %order.customer.payment_method,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// Orders placed so far, oldest first.
#[instrument(skip(state))]
pub async fn orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = state
        .with_session(|session| Ok(session.orders()?))
        .await?;
    Ok(Json(orders))
}
