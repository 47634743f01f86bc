//! Validation report and rule result types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rule titles (fixed evaluation order)
// ---------------------------------------------------------------------------

pub const RULE_REQUIRED_FIELDS: &str = "Required Fields";
pub const RULE_DATE_FORMAT: &str = "Date Format";
pub const RULE_TOTAL: &str = "Total Validation";
pub const RULE_TAX_RATE: &str = "Tax Rate Validation";
pub const RULE_DUPLICATE: &str = "Duplicate Detection";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Success,
    Error,
}

/// One rule's diagnostic entry in a validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResult {
    pub title: String,
    pub status: RuleStatus,
    pub message: String,
}

impl RuleResult {
    pub fn success(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            status: RuleStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            status: RuleStatus::Error,
            message: message.into(),
        }
    }
}

/// Aggregated outcome of one validation run.
///
/// `passed` holds iff every entry in `results` has status `success`.
/// Reports are transient: built per call, rendered by the caller, never
/// persisted as their own store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub results: Vec<RuleResult>,
}

impl ValidationReport {
    /// Build a report from collected results, deriving `passed`.
    pub fn from_results(results: Vec<RuleResult>) -> Self {
        let passed = results.iter().all(|r| r.status == RuleStatus::Success);
        Self { passed, results }
    }

    /// Find a rule result by title.
    pub fn rule(&self, title: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.title == title)
    }
}
