//! Receipt models and DTOs.
//!
//! Maps to the `receipts` and `line_items` tables from migration 0001.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;

use receiptvault_core::analytics::SpendRecord;
use receiptvault_core::receipt::{LineItem, ReceiptDraft};
use receiptvault_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A row from the `receipts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Receipt {
    pub id: DbId,
    pub bill_id: String,
    pub vendor: String,
    pub category: String,
    /// Stored as text; format is judged by the validation engine.
    pub date: String,
    pub subtotal: Option<f64>,
    pub tax: f64,
    pub amount: f64,
    pub created_at: Timestamp,
}

/// A row from the `line_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineItemRow {
    pub id: DbId,
    pub receipt_id: DbId,
    pub name: String,
    pub quantity: f64,
    pub price: f64,
}

impl Receipt {
    /// Rebuild the draft shape for re-validation of a stored record.
    pub fn to_draft(&self) -> ReceiptDraft {
        ReceiptDraft {
            bill_id: Some(self.bill_id.clone()),
            vendor: Some(self.vendor.clone()),
            date: Some(self.date.clone()),
            amount: Some(json!(self.amount)),
            tax: Some(json!(self.tax)),
            subtotal: self.subtotal.map(|s| json!(s)),
            category: Some(self.category.clone()),
            items: Vec::new(),
        }
    }

    /// The analytics view of this row.
    pub fn to_spend_record(&self) -> SpendRecord {
        SpendRecord {
            date: self.date.clone(),
            vendor: self.vendor.clone(),
            category: self.category.clone(),
            amount: self.amount,
            tax: self.tax,
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for inserting a validated-or-not receipt. Numeric fields are already
/// coerced; a draft that passed the required-fields gate always maps.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceipt {
    pub bill_id: String,
    pub vendor: String,
    pub category: String,
    pub date: String,
    pub subtotal: Option<f64>,
    pub tax: f64,
    pub amount: f64,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

// ---------------------------------------------------------------------------
// Query filters
// ---------------------------------------------------------------------------

/// Substring filters for the stored-receipts listing. Numeric fields filter
/// on their text rendering, matching the dashboard's type-to-filter boxes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptFilter {
    pub bill_id: Option<String>,
    pub vendor: Option<String>,
    pub subtotal: Option<String>,
    pub tax: Option<String>,
    pub amount: Option<String>,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Store-wide totals for the dashboard header.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SpendingTotals {
    pub total_spend: f64,
    pub total_tax: f64,
    pub receipt_count: i64,
}
