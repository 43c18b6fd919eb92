//! Request validation tests that never reach the database.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{invoice_body, offline_router, two_items};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
    let response = offline_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn declared_total_far_from_items_is_rejected() {
    let (status, body) = post_json(
        "/api/v1/invoices/with-items",
        invoice_body(json!({ "total_amount": 500000, "items": two_items() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Total mismatch"));
    assert!(message.contains("357000"));
}

#[tokio::test]
async fn departure_before_arrival_is_rejected() {
    let (status, _) = post_json(
        "/api/v1/invoices/with-items",
        invoice_body(json!({
            "arrival_date": "2025-01-20",
            "departure_date": "2025-01-15",
            "items": two_items()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_item_list_fails_validation() {
    let (status, body) = post_json(
        "/api/v1/invoices/with-items",
        invoice_body(json!({ "items": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn negative_item_price_fails_validation() {
    let (status, _) = post_json(
        "/api/v1/invoices/with-items",
        invoice_body(json!({
            "items": [{ "description": "Noche", "quantity": 1, "unit_price": -5 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn item_amount_too_wide_to_store_fails_validation() {
    let (status, body) = post_json(
        "/api/v1/invoices/with-items",
        invoice_body(json!({
            "items": [{
                "description": "Noche",
                "quantity": "10000000000000000000",
                "unit_price": "10000000000000000000"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn derived_item_amount_past_storage_range_is_rejected() {
    let (status, body) = post_json(
        "/api/v1/invoices/with-items",
        invoice_body(json!({
            "items": [{
                "description": "Noche",
                "quantity": "100000000000000",
                "unit_price": "100000000000000"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Item amounts must be less than"));
}

#[tokio::test]
async fn tax_rate_above_hundred_fails_validation() {
    let (status, _) = post_json(
        "/api/v1/invoices/1/items",
        json!({ "description": "Noche", "quantity": 1, "unit_price": 10, "tax_rate": 150 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn blank_invoice_number_fails_validation() {
    let (status, _) = post_json(
        "/api/v1/invoices",
        invoice_body(json!({ "invoice_number": "", "total_amount": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let response = offline_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn readiness_reports_unavailable_database() {
    let response = offline_router()
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Service unavailable");
}
