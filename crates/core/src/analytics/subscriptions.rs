//! Recurring-payment (subscription) detection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::SpendRecord;

/// Minimum receipts from one vendor before a pattern is considered.
pub const MIN_OCCURRENCES: usize = 3;
/// Accepted mean gap between charges, in days (roughly monthly).
pub const MIN_GAP_DAYS: f64 = 20.0;
pub const MAX_GAP_DAYS: f64 = 40.0;
/// Maximum relative deviation of any charge from the vendor's mean amount.
pub const AMOUNT_TOLERANCE: f64 = 0.15;

/// A vendor charging a near-constant amount on a roughly monthly cadence.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub vendor: String,
    pub occurrences: usize,
    pub average_amount: f64,
    pub average_gap_days: f64,
}

/// Detect subscription-like vendors.
///
/// A vendor qualifies with at least [`MIN_OCCURRENCES`] dated receipts whose
/// amounts all sit within [`AMOUNT_TOLERANCE`] of their mean and whose mean
/// charge interval falls in `[MIN_GAP_DAYS, MAX_GAP_DAYS]`. Receipts with
/// unparseable dates are ignored.
pub fn detect_subscriptions(records: &[SpendRecord]) -> Vec<Subscription> {
    let mut by_vendor: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.parsed_date() {
            by_vendor
                .entry(record.vendor.as_str())
                .or_default()
                .push((date, record.amount));
        }
    }

    let mut subscriptions = Vec::new();
    for (vendor, mut charges) in by_vendor {
        if charges.len() < MIN_OCCURRENCES {
            continue;
        }
        charges.sort_by_key(|(date, _)| *date);

        let mean_amount =
            charges.iter().map(|(_, amount)| amount).sum::<f64>() / charges.len() as f64;
        if mean_amount <= 0.0 {
            continue;
        }
        let amounts_stable = charges
            .iter()
            .all(|(_, amount)| ((amount - mean_amount) / mean_amount).abs() <= AMOUNT_TOLERANCE);
        if !amounts_stable {
            continue;
        }

        let gaps: Vec<f64> = charges
            .windows(2)
            .map(|pair| (pair[1].0 - pair[0].0).num_days() as f64)
            .collect();
        let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        if !(MIN_GAP_DAYS..=MAX_GAP_DAYS).contains(&mean_gap) {
            continue;
        }

        subscriptions.push(Subscription {
            vendor: vendor.to_string(),
            occurrences: charges.len(),
            average_amount: mean_amount,
            average_gap_days: mean_gap,
        });
    }

    subscriptions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, vendor: &str, amount: f64) -> SpendRecord {
        SpendRecord {
            date: date.to_string(),
            vendor: vendor.to_string(),
            category: "Misc".to_string(),
            amount,
            tax: 0.0,
        }
    }

    #[test]
    fn detects_monthly_constant_charge() {
        let records = vec![
            record("2024-01-10", "StreamCo", 499.0),
            record("2024-02-10", "StreamCo", 499.0),
            record("2024-03-11", "StreamCo", 499.0),
        ];
        let subs = detect_subscriptions(&records);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].vendor, "StreamCo");
        assert_eq!(subs[0].occurrences, 3);
        assert!((subs[0].average_amount - 499.0).abs() < 1e-9);
    }

    #[test]
    fn ignores_vendors_with_too_few_charges() {
        let records = vec![
            record("2024-01-10", "StreamCo", 499.0),
            record("2024-02-10", "StreamCo", 499.0),
        ];
        assert!(detect_subscriptions(&records).is_empty());
    }

    #[test]
    fn rejects_unstable_amounts() {
        let records = vec![
            record("2024-01-10", "Grocer", 120.0),
            record("2024-02-10", "Grocer", 870.0),
            record("2024-03-10", "Grocer", 45.0),
        ];
        assert!(detect_subscriptions(&records).is_empty());
    }

    #[test]
    fn rejects_non_monthly_cadence() {
        // Weekly charges: mean gap ~7 days.
        let records = vec![
            record("2024-01-01", "Cafe", 150.0),
            record("2024-01-08", "Cafe", 150.0),
            record("2024-01-15", "Cafe", 150.0),
            record("2024-01-22", "Cafe", 150.0),
        ];
        assert!(detect_subscriptions(&records).is_empty());
    }
}
