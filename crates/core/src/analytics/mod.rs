//! Spending analytics over stored receipts.
//!
//! All computations are pure functions over [`SpendRecord`] slices; the
//! caller (normally the API layer) loads rows and maps them in. Records
//! whose dates fail to parse are skipped rather than rejected; analytics
//! inherit the validator's lenient posture toward dirty extraction data.

pub mod budget;
pub mod forecast;
pub mod subscriptions;
pub mod summary;

use chrono::NaiveDate;
use serde::Serialize;

/// The analytics view of one stored receipt.
#[derive(Debug, Clone, Serialize)]
pub struct SpendRecord {
    /// `YYYY-MM-DD` as stored; parsed on demand.
    pub date: String,
    pub vendor: String,
    pub category: String,
    pub amount: f64,
    pub tax: f64,
}

impl SpendRecord {
    /// Parse the stored date, if well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}
