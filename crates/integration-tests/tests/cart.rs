//! Integration tests for the cart API.

use ampkicks_integration_tests::TestContext;
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn add(ctx: &TestContext, body: Value) -> (StatusCode, Value) {
    ctx.post("/api/cart/items", body).await
}

#[tokio::test]
async fn test_new_cart_is_empty() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/api/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["item_count"], 0);
}

#[tokio::test]
async fn test_same_product_and_size_merge() {
    let ctx = TestContext::new();

    let (status, _) = add(&ctx, json!({"product_id": 1, "size": "9", "quantity": 2})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = add(&ctx, json!({"product_id": 1, "size": "9", "quantity": 3})).await;

    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 5);
    assert_eq!(body["items"][0]["line_total"], 25_000);
    assert_eq!(body["subtotal"], 25_000);
    assert_eq!(body["shipping"], 0);
    assert_eq!(body["total"], 25_000);
}

#[tokio::test]
async fn test_different_sizes_are_separate_lines() {
    let ctx = TestContext::new();

    add(&ctx, json!({"product_id": 1, "size": "9"})).await;
    let (_, body) = add(&ctx, json!({"product_id": 1, "size": "10"})).await;

    assert_eq!(body["items"][0]["size"], "9");
    assert_eq!(body["items"][1]["size"], "10");
    assert_eq!(body["items"][1]["index"], 1);
    assert_eq!(body["item_count"], 2);
}

#[tokio::test]
async fn test_missing_size_uses_first_size() {
    let ctx = TestContext::new();
    let (_, body) = add(&ctx, json!({"product_id": 3})).await;

    assert_eq!(body["items"][0]["size"], "9");
    assert_eq!(body["items"][0]["quantity"], 1);
    assert_eq!(body["items"][0]["name"], "Hardwood Elite");
}

#[tokio::test]
async fn test_add_rejects_bad_input_without_touching_cart() {
    let ctx = TestContext::new();

    let (status, _) = add(&ctx, json!({"product_id": 99})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = add(&ctx, json!({"product_id": 1, "size": "13"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = add(&ctx, json!({"product_id": 1, "quantity": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = add(&ctx, json!({"product_id": 1, "quantity": 11})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = ctx.get("/api/cart").await;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_update_quantity_never_drops_below_one() {
    let ctx = TestContext::new();
    add(&ctx, json!({"product_id": 2, "size": "7", "quantity": 2})).await;

    let (status, body) = ctx.patch("/api/cart/items/0", json!({"delta": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], 3);

    let (_, body) = ctx.patch("/api/cart/items/0", json!({"delta": -10})).await;
    assert_eq!(body["items"][0]["quantity"], 1);
    assert_eq!(body["total"], 6000);
}

#[tokio::test]
async fn test_remove_shifts_later_lines() {
    let ctx = TestContext::new();
    add(&ctx, json!({"product_id": 1})).await;
    add(&ctx, json!({"product_id": 2})).await;
    add(&ctx, json!({"product_id": 4})).await;

    let (status, body) = ctx.delete("/api/cart/items/1").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["items"][0]["id"], 1);
    assert_eq!(body["items"][1]["id"], 4);
    assert_eq!(body["items"][1]["index"], 1);
}

#[tokio::test]
async fn test_out_of_range_index_leaves_cart_unchanged() {
    let ctx = TestContext::new();
    add(&ctx, json!({"product_id": 1, "quantity": 2})).await;

    let (status, body) = ctx.patch("/api/cart/items/5", json!({"delta": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());

    let (status, _) = ctx.delete("/api/cart/items/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = ctx.get("/api/cart").await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_count_sums_quantities() {
    let ctx = TestContext::new();
    add(&ctx, json!({"product_id": 1, "quantity": 2})).await;
    add(&ctx, json!({"product_id": 5, "quantity": 3})).await;

    let (status, body) = ctx.get("/api/cart/count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
}

#[tokio::test]
async fn test_cart_keeps_price_from_add_time() {
    let ctx = TestContext::new();
    let (_, body) = add(&ctx, json!({"product_id": 1})).await;

    assert_eq!(body["items"][0]["price"], 5000);
    assert_eq!(body["items"][0]["image"], "/static/1.jpg");
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let ctx = TestContext::new();
    add(&ctx, json!({"product_id": 1})).await;

    let (status, body) = add(&ctx, json!({"product_id": "abc"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, body) = ctx.delete("/api/cart/items/-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, body) = ctx.patch("/api/cart/items/0", json!({"delta": "up"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, body) = ctx.get("/api/products?max_price=cheap").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (_, cart) = ctx.get("/api/cart").await;
    assert_eq!(cart["items"][0]["quantity"], 1);
}
