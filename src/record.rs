//! Invoice record data model.
//!
//! An [`InvoiceRecord`] is assembled once per generation request by an
//! external collaborator (transaction lookup, user/project resolution) and
//! is read-only inside this crate. The composer renders whatever it is
//! given: arithmetic invariants (`total == subtotal + tax`, line totals)
//! are upstream's responsibility. Field names serialize in camelCase to
//! match the upstream wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One side of the billing relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    /// Stable identifier assigned upstream.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Postal address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// On-chain wallet address. Only rendered for the freelancer (payee).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

/// Summary of the project the invoice bills against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Stable identifier assigned upstream.
    pub id: String,
    /// Project title.
    pub title: String,
    /// Free-form description; wrapped to a fixed width when rendered.
    pub description: String,
}

/// One billable unit within an invoice.
///
/// Sequence order in [`InvoiceRecord::items`] is the rendering order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// What was billed.
    pub description: String,
    /// Non-negative unit count.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: f64,
    /// Line total as computed upstream (rendered as given).
    pub total: f64,
}

/// The full structured description of a billable transaction used to render
/// a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Invoice identifier; embedded in default output filenames.
    pub id: String,
    /// Human-facing invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub created_at: DateTime<Utc>,
    /// Expiration date, if the invoice has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Identifier of the settling transaction.
    pub transaction_id: String,
    /// On-chain hash of the settling transaction.
    pub transaction_hash: String,
    /// Settled amount.
    pub amount: f64,
    /// Currency code. Opaque; unknown codes degrade gracefully in the
    /// formatter.
    pub currency: String,
    /// Status code. Opaque; unknown codes pass through the formatter.
    pub status: String,

    /// Payer.
    pub client: Party,
    /// Payee.
    pub freelancer: Party,
    /// Project being billed.
    pub project: ProjectSummary,

    /// Billable units, in rendering order.
    pub items: Vec<LineItem>,

    /// Sum of line totals.
    pub subtotal: f64,
    /// Tax amount, if taxed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    /// Tax rate in percent, if taxed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    /// Grand total.
    pub total: f64,
}
