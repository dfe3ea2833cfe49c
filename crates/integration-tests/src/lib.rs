//! Integration tests for AmpKicks.
//!
//! Tests drive the storefront router in-process through
//! [`tower::ServiceExt::oneshot`]; no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ampkicks-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Product listing, filtering, and detail
//! - `cart` - Cart ledger over HTTP
//! - `checkout` - Order placement and history, including persistence

use std::path::Path;

use ampkicks_core::Catalog;
use ampkicks_storefront::build_app;
use ampkicks_storefront::config::StorefrontConfig;
use ampkicks_storefront::state::AppState;
use ampkicks_storefront::store::{FileStore, KeyValueStore, MemoryStore};
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

/// Catalog used by every test.
pub const CATALOG_JSON: &str = r#"{"products": [
    {"id": 1, "name": "Velocity Runner", "description": "Lightweight daily trainer",
     "price": 5000, "category": "running", "gender": "Men", "rating": 4.6,
     "sizes": ["8", "9", "10"], "image": "/static/1.jpg"},
    {"id": 2, "name": "Cloudline Glide", "description": "Soft cushioned runner",
     "price": 6000, "category": "running", "gender": "Women", "rating": 4.8,
     "sizes": ["6", "7"], "image": "/static/2.jpg"},
    {"id": 3, "name": "Hardwood Elite", "description": "High-top with ankle support",
     "price": 8000, "category": "basketball", "gender": "Men", "rating": 4.4,
     "sizes": ["9", "10", "11"], "image": "/static/3.jpg"},
    {"id": 4, "name": "Street Classic", "description": "Leather low-top",
     "price": 3000, "category": "casual", "gender": "Unisex", "rating": 3.9,
     "sizes": ["7", "8", "9"], "image": "/static/4.jpg"},
    {"id": 5, "name": "Mini Sprinter", "description": "Strap runner for kids",
     "price": 2000, "category": "running", "gender": "Kids", "rating": 4.5,
     "sizes": ["2", "3"], "image": "/static/5.jpg"}
]}"#;

/// A storefront wired to the test catalog.
///
/// Clones share one session, so requests made through the same context see
/// each other's cart and orders.
#[derive(Clone)]
pub struct TestContext {
    state: AppState,
}

impl TestContext {
    /// Storefront with an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Storefront persisting to a store file at `path`.
    #[must_use]
    pub fn with_file_store(path: &Path) -> Self {
        Self::with_store(Box::new(
            FileStore::open(path).expect("Failed to open file store"),
        ))
    }

    /// Storefront over an arbitrary store.
    #[must_use]
    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        let catalog = Catalog::from_json(CATALOG_JSON).expect("Test catalog is invalid");
        Self {
            state: AppState::new(StorefrontConfig::default(), catalog, store),
        }
    }

    /// Send a request and return the status and decoded JSON body.
    ///
    /// Non-JSON bodies decode as [`Value::Null`].
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = build_app(self.state.clone())
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
