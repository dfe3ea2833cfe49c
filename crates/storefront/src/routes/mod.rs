//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Health check
//!
//! # Products
//! GET    /api/products             - Filtered product listing
//! GET    /api/products/featured    - Featured products
//! GET    /api/products/{id}        - Product detail
//!
//! # Cart
//! GET    /api/cart                 - Cart lines and totals
//! POST   /api/cart/items           - Add a product in a size
//! PATCH  /api/cart/items/{index}   - Change a line's quantity by a delta
//! DELETE /api/cart/items/{index}   - Remove a line
//! GET    /api/cart/count           - Cart badge count
//!
//! # Checkout
//! POST   /api/checkout             - Place an order from the cart
//! GET    /api/orders               - Order history
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{index}", patch(cart::update).delete(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::place_order))
        .route("/api/orders", get(checkout::orders))
}
