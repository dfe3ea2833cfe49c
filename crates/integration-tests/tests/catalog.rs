//! Integration tests for product listing and detail.

use ampkicks_integration_tests::TestContext;
use axum::http::StatusCode;
use serde_json::Value;

fn ids(body: &Value) -> Vec<u64> {
    body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .filter_map(|p| p["id"].as_u64())
        .collect()
}

#[tokio::test]
async fn test_unfiltered_listing_keeps_catalog_order() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/api/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(ids(&body), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_search_is_case_insensitive_over_name_description_and_category() {
    let ctx = TestContext::new();

    let (_, body) = ctx.get("/api/products?q=RUNNER").await;
    assert_eq!(ids(&body), vec![1, 2, 5]);

    let (_, body) = ctx.get("/api/products?q=ankle").await;
    assert_eq!(ids(&body), vec![3]);

    let (_, body) = ctx.get("/api/products?q=basketball").await;
    assert_eq!(ids(&body), vec![3]);
}

#[tokio::test]
async fn test_filters_combine() {
    let ctx = TestContext::new();

    let (_, body) = ctx.get("/api/products?category=running,casual&gender=men,unisex").await;
    assert_eq!(ids(&body), vec![1, 4]);

    let (_, body) = ctx.get("/api/products?category=running&max_price=5000").await;
    assert_eq!(ids(&body), vec![1, 5]);

    let (_, body) = ctx.get("/api/products?q=zzz").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_max_price_is_inclusive() {
    let ctx = TestContext::new();
    let (_, body) = ctx.get("/api/products?max_price=3000").await;
    assert_eq!(ids(&body), vec![4, 5]);
}

#[tokio::test]
async fn test_unknown_gender_is_rejected() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/api/products?gender=robots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_featured_returns_leading_products() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/api/products/featured").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_product_detail() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/products/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Hardwood Elite");
    assert_eq!(body["price"], 8000);
    assert_eq!(body["price_display"], "₱8,000");
    assert_eq!(body["stars"], "★★★★☆");
    assert_eq!(body["images"], serde_json::json!(["/static/3.jpg"]));

    let (status, _) = ctx.get("/api/products/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
