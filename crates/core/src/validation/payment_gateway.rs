//! Payment gateway credential schemas.
//!
//! Credentials are wrapped in [`SecretString`] as soon as they are read, so a
//! parsed gateway can be logged or echoed back without leaking keys.

use secrecy::SecretString;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::fields::{Fields, Rule, Slot};
use super::{Schema, ValidationError};
use crate::types::GatewayProvider;

const NAME_TOO_SHORT: &str = "Gateway name must be at least 2 characters";
const API_KEY_REQUIRED: &str = "API key is required";
const API_SECRET_REQUIRED: &str = "API secret is required";

/// Placeholder written wherever a credential would be serialized.
pub const REDACTED: &str = "[REDACTED]";

/// A payment gateway to be created.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentGateway {
    pub provider: GatewayProvider,
    pub name: String,
    #[serde(serialize_with = "redact")]
    pub api_key: SecretString,
    #[serde(serialize_with = "redact")]
    pub api_secret: SecretString,
    #[serde(
        serialize_with = "redact_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_secret: Option<SecretString>,
    /// Defaults to `true` so a freshly added gateway never moves real money.
    pub is_test_mode: bool,
}

impl std::fmt::Debug for NewPaymentGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewPaymentGateway")
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("api_key", &REDACTED)
            .field("api_secret", &REDACTED)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| REDACTED),
            )
            .field("is_test_mode", &self.is_test_mode)
            .finish()
    }
}

/// Changes to an existing gateway. Absent fields are left untouched.
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentGatewayUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<GatewayProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        serialize_with = "redact_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<SecretString>,
    #[serde(
        serialize_with = "redact_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_secret: Option<SecretString>,
    #[serde(
        serialize_with = "redact_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_secret: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_test_mode: Option<bool>,
}

impl std::fmt::Debug for PaymentGatewayUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |secret: &Option<SecretString>| secret.as_ref().map(|_| REDACTED);
        f.debug_struct("PaymentGatewayUpdate")
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("api_key", &redacted(&self.api_key))
            .field("api_secret", &redacted(&self.api_secret))
            .field("webhook_secret", &redacted(&self.webhook_secret))
            .field("is_test_mode", &self.is_test_mode)
            .finish()
    }
}

fn redact<S: Serializer>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}

#[allow(clippy::ref_option)] // signature dictated by serde(serialize_with)
fn redact_optional<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_str(REDACTED),
        None => serializer.serialize_none(),
    }
}

fn gateway_name(slot: Slot<'_>) -> Rule<String> {
    slot.min_chars(2, NAME_TOO_SHORT)
}

fn api_key(slot: Slot<'_>) -> Rule<SecretString> {
    slot.min_chars(1, API_KEY_REQUIRED).map(SecretString::from)
}

fn api_secret(slot: Slot<'_>) -> Rule<SecretString> {
    slot.min_chars(1, API_SECRET_REQUIRED).map(SecretString::from)
}

fn webhook_secret(slot: Slot<'_>) -> Rule<Option<SecretString>> {
    Ok(slot.optional_str()?.map(SecretString::from))
}

impl Schema for NewPaymentGateway {
    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::of(input)?;
        let provider = fields.check("provider", Slot::required_enum);
        let name = fields.check("name", gateway_name);
        let api_key = fields.check("apiKey", api_key);
        let api_secret = fields.check("apiSecret", api_secret);
        let webhook_secret = fields.check("webhookSecret", webhook_secret);
        let is_test_mode = fields.check("isTestMode", |s| s.bool_or(true));

        match (
            provider,
            name,
            api_key,
            api_secret,
            webhook_secret,
            is_test_mode,
        ) {
            (
                Some(provider),
                Some(name),
                Some(api_key),
                Some(api_secret),
                Some(webhook_secret),
                Some(is_test_mode),
            ) => fields.finish(Self {
                provider,
                name,
                api_key,
                api_secret,
                webhook_secret,
                is_test_mode,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

impl Schema for PaymentGatewayUpdate {
    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::of(input)?;
        let provider = fields.check("provider", |s| s.if_present(Slot::required_enum));
        let name = fields.check("name", |s| s.if_present(gateway_name));
        let api_key = fields.check("apiKey", |s| s.if_present(api_key));
        let api_secret = fields.check("apiSecret", |s| s.if_present(api_secret));
        let webhook_secret = fields.check("webhookSecret", webhook_secret);
        let is_test_mode = fields.check("isTestMode", |s| s.if_present(Slot::required_bool));

        match (
            provider,
            name,
            api_key,
            api_secret,
            webhook_secret,
            is_test_mode,
        ) {
            (
                Some(provider),
                Some(name),
                Some(api_key),
                Some(api_secret),
                Some(webhook_secret),
                Some(is_test_mode),
            ) => fields.finish(Self {
                provider,
                name,
                api_key,
                api_secret,
                webhook_secret,
                is_test_mode,
            }),
            _ => Err(fields.into_error()),
        }
    }
}
