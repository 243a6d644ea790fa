//! Subscriber payment schemas.

use serde::Serialize;
use serde_json::Value;

use super::fields::{Fields, Rule, Slot};
use super::{Schema, ValidationError};
use crate::types::{InvoiceId, PaymentMethod, PaymentStatus, PositiveAmount, SubscriberId};

const INVALID_SUBSCRIBER: &str = "Invalid subscriber";
const INVALID_INVOICE: &str = "Invalid invoice";
const AMOUNT_NOT_POSITIVE: &str = "Amount must be positive";
const AMOUNT_OUT_OF_RANGE: &str = "Amount is out of range";

/// A payment to be recorded against a subscriber.
///
/// Whether `invoice_id` actually belongs to `subscriber_id` is not checked
/// here; that needs the invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub subscriber_id: SubscriberId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,
    pub amount: PositiveAmount,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Defaults to [`PaymentStatus::Completed`].
    pub status: PaymentStatus,
}

/// Changes to a recorded payment. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<SubscriberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<PositiveAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

fn subscriber_ref(slot: Slot<'_>) -> Rule<SubscriberId> {
    slot.uuid(INVALID_SUBSCRIBER).map(SubscriberId::new)
}

fn invoice_ref(slot: Slot<'_>) -> Rule<Option<InvoiceId>> {
    slot.if_present(|s| s.uuid(INVALID_INVOICE).map(InvoiceId::new))
}

fn payment_amount(slot: Slot<'_>) -> Rule<PositiveAmount> {
    slot.positive_amount(AMOUNT_NOT_POSITIVE, AMOUNT_OUT_OF_RANGE)
}

fn optional_text(slot: Slot<'_>) -> Rule<Option<String>> {
    Ok(slot.optional_str()?.map(str::to_owned))
}

impl Schema for NewPayment {
    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::of(input)?;
        let subscriber_id = fields.check("subscriberId", subscriber_ref);
        let invoice_id = fields.check("invoiceId", invoice_ref);
        let amount = fields.check("amount", payment_amount);
        let method = fields.check("method", Slot::required_enum);
        let transaction_id = fields.check("transactionId", optional_text);
        let notes = fields.check("notes", optional_text);
        let status = fields.check("status", |s| s.enum_or(PaymentStatus::default()));

        match (
            subscriber_id,
            invoice_id,
            amount,
            method,
            transaction_id,
            notes,
            status,
        ) {
            (
                Some(subscriber_id),
                Some(invoice_id),
                Some(amount),
                Some(method),
                Some(transaction_id),
                Some(notes),
                Some(status),
            ) => fields.finish(Self {
                subscriber_id,
                invoice_id,
                amount,
                method,
                transaction_id,
                notes,
                status,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

impl Schema for PaymentUpdate {
    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::of(input)?;
        let subscriber_id = fields.check("subscriberId", |s| s.if_present(subscriber_ref));
        let invoice_id = fields.check("invoiceId", invoice_ref);
        let amount = fields.check("amount", |s| s.if_present(payment_amount));
        let method = fields.check("method", |s| s.if_present(Slot::required_enum));
        let transaction_id = fields.check("transactionId", optional_text);
        let notes = fields.check("notes", optional_text);
        let status = fields.check("status", |s| s.if_present(Slot::required_enum));

        match (
            subscriber_id,
            invoice_id,
            amount,
            method,
            transaction_id,
            notes,
            status,
        ) {
            (
                Some(subscriber_id),
                Some(invoice_id),
                Some(amount),
                Some(method),
                Some(transaction_id),
                Some(notes),
                Some(status),
            ) => fields.finish(Self {
                subscriber_id,
                invoice_id,
                amount,
                method,
                transaction_id,
                notes,
                status,
            }),
            _ => Err(fields.into_error()),
        }
    }
}
