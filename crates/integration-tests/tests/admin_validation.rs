//! Integration tests for the admin validation endpoints.
//!
//! These drive the full router, so they also cover the body limit, the
//! request ID echo, and the security headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use isp_portal::config::PortalConfig;
use isp_portal_integration_tests::{app, app_with, json_body, post_json, post_raw};
use serde_json::{Value, json};

const SUBSCRIBER: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
const PARENT: &str = "1b4e28ba-2fa1-41d2-883f-0016d3cca427";

fn issue_messages(body: &Value) -> Vec<(String, String)> {
    body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| {
            (
                issue["path"].as_str().unwrap().to_string(),
                issue["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn pair(path: &str, message: &str) -> (String, String) {
    (path.to_string(), message.to_string())
}

// =============================================================================
// Locations
// =============================================================================

#[tokio::test]
async fn test_location_defaults_to_area() {
    let response = post_json(
        app(),
        "/api/admin/locations/validate",
        &json!({ "name": "Dhanmondi", "parentId": PARENT }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "valid": true,
            "data": { "name": "Dhanmondi", "type": "AREA", "parentId": PARENT }
        })
    );
}

#[tokio::test]
async fn test_location_short_name_rejected() {
    let response = post_json(app(), "/api/admin/locations/validate", &json!({ "name": "D" })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["valid"], json!(false));
    assert_eq!(
        issue_messages(&body),
        vec![pair("name", "Location name must be at least 2 characters")]
    );
}

#[tokio::test]
async fn test_location_update_applies_no_defaults() {
    let response = post_json(
        app(),
        &format!("/api/admin/locations/{PARENT}/validate"),
        &json!({ "parentId": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "valid": true, "data": { "parentId": null } })
    );
}

// =============================================================================
// Payment Gateways
// =============================================================================

#[tokio::test]
async fn test_gateway_secrets_are_redacted() {
    let response = post_json(
        app(),
        "/api/admin/payment-gateways/validate",
        &json!({
            "provider": "BKASH",
            "name": "bKash Merchant",
            "apiKey": "live-key-123",
            "apiSecret": "live-secret-456",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["data"],
        json!({
            "provider": "BKASH",
            "name": "bKash Merchant",
            "apiKey": "[REDACTED]",
            "apiSecret": "[REDACTED]",
            "isTestMode": true,
        })
    );
    assert!(!body.to_string().contains("live-secret-456"));
}

#[tokio::test]
async fn test_gateway_reports_every_issue() {
    let response = post_json(
        app(),
        "/api/admin/payment-gateways/validate",
        &json!({ "provider": "VISA", "name": "x", "apiKey": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let issues = issue_messages(&json_body(response).await);
    let paths: Vec<&str> = issues.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, ["provider", "name", "apiKey", "apiSecret"]);
    assert_eq!(issues[1].1, "Gateway name must be at least 2 characters");
    assert_eq!(issues[2].1, "API key is required");
}

// =============================================================================
// Payments
// =============================================================================

#[tokio::test]
async fn test_payment_accepted_with_default_status() {
    let response = post_json(
        app(),
        "/api/admin/payments/validate",
        &json!({ "subscriberId": SUBSCRIBER, "amount": 500, "method": "CASH" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], json!("COMPLETED"));
    assert_eq!(body["data"]["amount"], json!("500"));
    assert_eq!(body["data"]["subscriberId"], json!(SUBSCRIBER));
}

#[tokio::test]
async fn test_payment_zero_amount_and_bad_subscriber() {
    let response = post_json(
        app(),
        "/api/admin/payments/validate",
        &json!({ "subscriberId": "not-a-uuid", "amount": 0, "method": "CASH" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        issue_messages(&json_body(response).await),
        vec![
            pair("subscriberId", "Invalid subscriber"),
            pair("amount", "Amount must be positive"),
        ]
    );
}

#[tokio::test]
async fn test_payment_update_with_bad_id_is_bad_request() {
    let response = post_json(
        app(),
        "/api/admin/payments/12/validate",
        &json!({ "amount": "10" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = post_raw(app(), "/api/admin/locations/validate", "{\"name\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let config = PortalConfig {
        action_body_limit: "1kb".parse().unwrap(),
        ..PortalConfig::default()
    };
    let notes = "x".repeat(4096);
    let response = post_json(
        app_with(config),
        "/api/admin/payments/validate",
        &json!({ "subscriberId": SUBSCRIBER, "amount": 1, "method": "CASH", "notes": notes }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let response = post_json(app(), "/api/admin/locations/validate", &json!({})).await;
    let headers = response.headers();

    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(
        headers["content-security-policy"]
            .to_str()
            .unwrap()
            .contains("https://*.amazonaws.com")
    );
}
