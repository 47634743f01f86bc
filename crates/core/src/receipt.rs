//! Receipt draft types and lenient numeric coercion.
//!
//! A [`ReceiptDraft`] is a candidate record as produced by OCR or AI
//! extraction. Fields may be absent or malformed; that is expected input
//! for the validation engine, not an error condition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Currency symbol used in human-readable amounts.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Default category assigned when extraction finds none.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A candidate receipt record prior to validation.
///
/// `amount`, `tax`, and `subtotal` are kept as raw JSON values because
/// extraction output routinely delivers numbers as strings (or garbage);
/// coercion happens inside the validation engine, never at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptDraft {
    pub bill_id: Option<String>,
    pub vendor: Option<String>,
    /// Expected `YYYY-MM-DD`; validated, never assumed.
    pub date: Option<String>,
    pub amount: Option<Value>,
    pub tax: Option<Value>,
    pub subtotal: Option<Value>,
    pub category: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// A single extracted line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub price: f64,
}

impl ReceiptDraft {
    /// The category to store: extracted value or the default.
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

/// Coerce a raw JSON value to `f64`, falling back to `0.0`.
///
/// Numbers pass through; numeric strings are parsed; everything else
/// (missing, null, booleans, unparseable text) coerces to `0.0`. Bad
/// extraction output must degrade into a diagnosable rule failure, not
/// a deserialization fault.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Whether a raw JSON field counts as present for the required-fields rule.
///
/// Explicit `null` is treated the same as absent.
pub fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}
