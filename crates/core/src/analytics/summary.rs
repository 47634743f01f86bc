//! Aggregate spending figures: KPIs, category/vendor breakdowns, time series.

use std::collections::BTreeMap;

use serde::Serialize;

use super::SpendRecord;

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

/// Key performance indicators over a set of receipts.
#[derive(Debug, Clone, Serialize)]
pub struct SpendingSummary {
    pub total_spend: f64,
    pub total_tax: f64,
    pub receipt_count: usize,
    pub average_amount: f64,
    pub top_category: Option<CategoryTotal>,
}

/// Compute KPIs for the dashboard and analytics headers.
pub fn spending_summary(records: &[SpendRecord]) -> SpendingSummary {
    let total_spend: f64 = records.iter().map(|r| r.amount).sum();
    let total_tax: f64 = records.iter().map(|r| r.tax).sum();
    let receipt_count = records.len();
    let average_amount = if receipt_count > 0 {
        total_spend / receipt_count as f64
    } else {
        0.0
    };
    let top_category = category_totals(records).into_iter().next();

    SpendingSummary {
        total_spend,
        total_tax,
        receipt_count,
        average_amount,
        top_category,
    }
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

/// Total spend for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Total spend for one vendor.
#[derive(Debug, Clone, Serialize)]
pub struct VendorTotal {
    pub vendor: String,
    pub total: f64,
}

/// Per-category spend, largest first.
pub fn category_totals(records: &[SpendRecord]) -> Vec<CategoryTotal> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *by_category.entry(record.category.as_str()).or_default() += record.amount;
    }

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// The `limit` highest-spend vendors, largest first.
pub fn top_vendors(records: &[SpendRecord], limit: usize) -> Vec<VendorTotal> {
    let mut by_vendor: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *by_vendor.entry(record.vendor.as_str()).or_default() += record.amount;
    }

    let mut totals: Vec<VendorTotal> = by_vendor
        .into_iter()
        .map(|(vendor, total)| VendorTotal {
            vendor: vendor.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(limit);
    totals
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One bucket of a spend time series (daily or monthly).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for monthly.
    pub period: String,
    pub total: f64,
}

/// Spend summed per calendar month, ascending. Unparseable dates are skipped.
pub fn monthly_totals(records: &[SpendRecord]) -> Vec<PeriodTotal> {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.parsed_date() {
            let month = date.format("%Y-%m").to_string();
            *by_month.entry(month).or_default() += record.amount;
        }
    }
    by_month
        .into_iter()
        .map(|(period, total)| PeriodTotal { period, total })
        .collect()
}

/// Spend summed per day, ascending. Unparseable dates are skipped.
pub fn daily_totals(records: &[SpendRecord]) -> Vec<PeriodTotal> {
    let mut by_day: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.parsed_date() {
            *by_day.entry(date.format("%Y-%m-%d").to_string()).or_default() += record.amount;
        }
    }
    by_day
        .into_iter()
        .map(|(period, total)| PeriodTotal { period, total })
        .collect()
}

/// Trailing moving average over a series.
///
/// Entry `i` averages the last `window` values ending at `i`; the first
/// `window - 1` entries average what is available so the output length
/// always matches the input.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = i.saturating_sub(window - 1);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, vendor: &str, category: &str, amount: f64) -> SpendRecord {
        SpendRecord {
            date: date.to_string(),
            vendor: vendor.to_string(),
            category: category.to_string(),
            amount,
            tax: amount * 0.08,
        }
    }

    #[test]
    fn summary_over_empty_set_is_all_zero() {
        let summary = spending_summary(&[]);
        assert_eq!(summary.receipt_count, 0);
        assert_eq!(summary.total_spend, 0.0);
        assert_eq!(summary.average_amount, 0.0);
        assert!(summary.top_category.is_none());
    }

    #[test]
    fn summary_computes_totals_and_top_category() {
        let records = vec![
            record("2024-01-05", "Grocer", "Food", 100.0),
            record("2024-01-12", "Grocer", "Food", 200.0),
            record("2024-01-20", "Garage", "Auto", 50.0),
        ];
        let summary = spending_summary(&records);

        assert_eq!(summary.receipt_count, 3);
        assert!((summary.total_spend - 350.0).abs() < 1e-9);
        assert!((summary.average_amount - 350.0 / 3.0).abs() < 1e-9);
        let top = summary.top_category.unwrap();
        assert_eq!(top.category, "Food");
        assert!((top.total - 300.0).abs() < 1e-9);
    }

    #[test]
    fn top_vendors_orders_and_truncates() {
        let records = vec![
            record("2024-01-01", "A", "Misc", 10.0),
            record("2024-01-02", "B", "Misc", 30.0),
            record("2024-01-03", "C", "Misc", 20.0),
        ];
        let top = top_vendors(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].vendor, "B");
        assert_eq!(top[1].vendor, "C");
    }

    #[test]
    fn monthly_totals_bucket_and_skip_bad_dates() {
        let records = vec![
            record("2024-01-05", "A", "Misc", 10.0),
            record("2024-01-25", "A", "Misc", 15.0),
            record("2024-02-01", "A", "Misc", 7.0),
            record("not-a-date", "A", "Misc", 999.0),
        ];
        let months = monthly_totals(&records);
        assert_eq!(
            months,
            vec![
                PeriodTotal {
                    period: "2024-01".to_string(),
                    total: 25.0
                },
                PeriodTotal {
                    period: "2024-02".to_string(),
                    total: 7.0
                },
            ]
        );
    }

    #[test]
    fn moving_average_uses_partial_windows_at_the_start() {
        let values = [10.0, 20.0, 30.0, 40.0];
        let ma = moving_average(&values, 2);
        assert_eq!(ma, vec![10.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn moving_average_window_larger_than_series() {
        let values = [10.0, 20.0];
        let ma = moving_average(&values, 7);
        assert_eq!(ma, vec![10.0, 15.0]);
    }
}
