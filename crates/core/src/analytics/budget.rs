//! Monthly budget burn-rate tracking.

use serde::Serialize;

use super::forecast::project_month_spend;

/// Where the current month stands against its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Projected month-end spend stays within the budget.
    OnTrack,
    /// Budget not yet exceeded, but the run rate projects past it.
    Warning,
    /// Spend has already passed the budget.
    OverBudget,
}

/// Burn-rate snapshot for the current month.
#[derive(Debug, Clone, Serialize)]
pub struct BurnRate {
    /// Spend so far as a percentage of the budget.
    pub percent_used: f64,
    /// Projected month-end spend at the current run rate.
    pub projected: f64,
    pub status: BudgetStatus,
}

/// Days in a calendar month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let start = chrono::NaiveDate::from_ymd_opt(year, month, 1);
    let end = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days() as u32,
        _ => 30,
    }
}

/// Compute the burn rate, or `None` when the inputs cannot support one
/// (non-positive budget or no elapsed days).
pub fn burn_rate(
    spent: f64,
    budget: f64,
    days_elapsed: u32,
    days_in_month: u32,
) -> Option<BurnRate> {
    if budget <= 0.0 || days_elapsed == 0 {
        return None;
    }

    let percent_used = spent / budget * 100.0;
    let projected = project_month_spend(spent, days_elapsed, days_in_month);
    let status = if spent > budget {
        BudgetStatus::OverBudget
    } else if projected > budget {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    };

    Some(BurnRate {
        percent_used,
        projected,
        status,
    })
}
