//! Admin validation route handlers.
//!
//! Admin forms post their payload here before saving so the UI can show
//! field-level messages. Each record has a create check and an update check;
//! the update check takes the record ID from the path.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
};
use isp_portal_core::validation::{
    LocationUpdate, NewLocation, NewPayment, NewPaymentGateway, PaymentGatewayUpdate,
    PaymentUpdate,
};
use isp_portal_core::{LocationId, PaymentGatewayId, PaymentId, Schema};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Successful validation response body.
#[derive(Debug, Serialize)]
pub struct Validated {
    pub valid: bool,
    pub data: Value,
}

/// Run schema `S` over a JSON body.
fn check<S>(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Json<Validated>>
where
    S: Schema + Serialize,
{
    let Json(input) = body?;
    let record = S::parse(&input)?;
    let data = serde_json::to_value(&record)
        .map_err(|e| AppError::Internal(format!("Failed to serialize validated record: {e}")))?;

    Ok(Json(Validated { valid: true, data }))
}

/// Parse a record ID path segment.
fn record_id<T: FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid record id: {raw}")))
}

// =============================================================================
// Locations
// =============================================================================

/// Validate a new location.
pub async fn validate_new_location(
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Validated>> {
    check::<NewLocation>(body)
}

/// Validate changes to an existing location.
pub async fn validate_location_update(
    Path(id): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Validated>> {
    let id: LocationId = record_id(&id)?;
    tracing::debug!(location_id = %id, "Validating location update");
    check::<LocationUpdate>(body)
}

// =============================================================================
// Payment Gateways
// =============================================================================

/// Validate a new payment gateway. Credentials come back redacted.
pub async fn validate_new_payment_gateway(
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Validated>> {
    check::<NewPaymentGateway>(body)
}

/// Validate changes to an existing payment gateway.
pub async fn validate_payment_gateway_update(
    Path(id): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Validated>> {
    let id: PaymentGatewayId = record_id(&id)?;
    tracing::debug!(gateway_id = %id, "Validating payment gateway update");
    check::<PaymentGatewayUpdate>(body)
}

// =============================================================================
// Payments
// =============================================================================

/// Validate a new payment.
pub async fn validate_new_payment(
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Validated>> {
    check::<NewPayment>(body)
}

/// Validate changes to an existing payment.
pub async fn validate_payment_update(
    Path(id): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Validated>> {
    let id: PaymentId = record_id(&id)?;
    tracing::debug!(payment_id = %id, "Validating payment update");
    check::<PaymentUpdate>(body)
}
