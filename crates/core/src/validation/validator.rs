//! Rule evaluator for receipt drafts: pure logic, no database access.
//!
//! Rules run in a fixed order: Required Fields, Date Format, Total
//! Validation, Tax Rate Validation, Duplicate Detection. Only the
//! required-fields gate short-circuits; every other rule is evaluated
//! unconditionally so a report always covers the full rule set.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::receipt::{coerce_amount, is_present, ReceiptDraft, CURRENCY_SYMBOL};

use super::report::{
    RuleResult, ValidationReport, RULE_DATE_FORMAT, RULE_DUPLICATE, RULE_REQUIRED_FIELDS,
    RULE_TAX_RATE, RULE_TOTAL,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default expected tax rate (8%).
pub const DEFAULT_EXPECTED_TAX_RATE: f64 = 0.08;
/// Default absolute tolerance around the expected rate.
pub const DEFAULT_TAX_RATE_TOLERANCE: f64 = 0.05;

/// Tunable parameters for the tax-rate rule.
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    /// Expected effective tax rate, as a fraction of the subtotal.
    pub expected_tax_rate: f64,
    /// Accepted absolute deviation around [`Self::expected_tax_rate`].
    pub tax_rate_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            expected_tax_rate: DEFAULT_EXPECTED_TAX_RATE,
            tax_rate_tolerance: DEFAULT_TAX_RATE_TOLERANCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Existence lookup collaborator
// ---------------------------------------------------------------------------

/// Point read against the persisted record set: does `bill_id` exist?
///
/// The validator's only collaborator. A lookup failure is the one fault
/// the engine propagates; every other anomaly degrades into a rule result.
pub trait BillIdLookup {
    fn exists(&self, bill_id: &str) -> Result<bool, CoreError>;
}

impl BillIdLookup for HashSet<String> {
    fn exists(&self, bill_id: &str) -> Result<bool, CoreError> {
        Ok(self.contains(bill_id))
    }
}

/// Lookup backed by a pre-fetched existence flag.
///
/// Callers that already performed the point read (e.g. an async handler
/// ahead of this synchronous engine) wrap the answer in this type.
pub struct PrefetchedLookup(pub bool);

impl BillIdLookup for PrefetchedLookup {
    fn exists(&self, _bill_id: &str) -> Result<bool, CoreError> {
        Ok(self.0)
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Required fields, in reporting order.
const REQUIRED_FIELDS: [&str; 5] = ["bill_id", "vendor", "date", "amount", "tax"];

/// Validate a receipt draft and produce a per-rule report.
///
/// Pass `skip_duplicate = true` when re-checking an already-stored record
/// so its own presence is not flagged as a duplicate. The supplied
/// `subtotal` field, if any, is deliberately ignored by the tax-rate rule
/// (the rule derives its own candidates).
pub fn validate(
    draft: &ReceiptDraft,
    config: &ValidationConfig,
    lookup: &dyn BillIdLookup,
    skip_duplicate: bool,
) -> Result<ValidationReport, CoreError> {
    let mut results = Vec::new();

    // ---------- Required Fields ----------
    let missing = missing_fields(draft);
    if !missing.is_empty() {
        results.push(RuleResult::error(
            RULE_REQUIRED_FIELDS,
            format!("Missing fields: {}", missing.join(", ")),
        ));
        // Nothing else is meaningful without the required fields.
        return Ok(ValidationReport::from_results(results));
    }
    results.push(RuleResult::success(
        RULE_REQUIRED_FIELDS,
        "All required fields present",
    ));

    // ---------- Date Format ----------
    // The gate above guarantees presence.
    let date = draft.date.as_deref().unwrap_or_default();
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(_) => results.push(RuleResult::success(
            RULE_DATE_FORMAT,
            format!("Valid date: {date}"),
        )),
        Err(_) => results.push(RuleResult::error(
            RULE_DATE_FORMAT,
            format!("Invalid date format: {date}"),
        )),
    }

    // Lenient pre-step, not a reported rule: junk coerces to 0.0 and the
    // downstream rules diagnose it.
    let amount = coerce_amount(draft.amount.as_ref());
    let tax = coerce_amount(draft.tax.as_ref());

    // ---------- Total Validation ----------
    if amount > 0.0 {
        results.push(RuleResult::success(
            RULE_TOTAL,
            format!("Amount detected: {CURRENCY_SYMBOL}{amount:.2}"),
        ));
    } else {
        results.push(RuleResult::error(RULE_TOTAL, "Invalid amount value"));
    }

    // ---------- Tax Rate Validation ----------
    results.push(check_tax_rate(amount, tax, config));

    // ---------- Duplicate Detection ----------
    if !skip_duplicate {
        let bill_id = draft.bill_id.as_deref().unwrap_or_default();
        if lookup.exists(bill_id)? {
            results.push(RuleResult::error(RULE_DUPLICATE, "Duplicate receipt found"));
        } else {
            results.push(RuleResult::success(RULE_DUPLICATE, "No duplicate found"));
        }
    }

    Ok(ValidationReport::from_results(results))
}

/// Required fields absent from the draft.
fn missing_fields(draft: &ReceiptDraft) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| match *field {
            "bill_id" => draft.bill_id.is_none(),
            "vendor" => draft.vendor.is_none(),
            "date" => draft.date.is_none(),
            "amount" => !is_present(draft.amount.as_ref()),
            "tax" => !is_present(draft.tax.as_ref()),
            _ => false,
        })
        .collect()
}

/// Evaluate the tax-rate tolerance band.
///
/// Two subtotal interpretations are tried in order: `amount - tax` (tax
/// included in the total) and `amount` (tax on top). The first positive
/// candidate whose effective rate lands within the tolerance band wins.
/// This is an ambiguity-tolerant heuristic, not an accounting rule, so
/// the candidate order is part of the contract.
fn check_tax_rate(amount: f64, tax: f64, config: &ValidationConfig) -> RuleResult {
    if tax == 0.0 {
        return RuleResult::success(RULE_TAX_RATE, "No tax applied (valid)");
    }

    let candidates = [amount - tax, amount];
    for subtotal in candidates {
        if subtotal <= 0.0 {
            continue;
        }
        let rate = tax / subtotal;
        if (rate - config.expected_tax_rate).abs() <= config.tax_rate_tolerance {
            return RuleResult::success(
                RULE_TAX_RATE,
                format!(
                    "Tax rate OK ({:.2}%, Subtotal {CURRENCY_SYMBOL}{subtotal:.2})",
                    rate * 100.0
                ),
            );
        }
    }

    RuleResult::error(
        RULE_TAX_RATE,
        format!(
            "Tax mismatch. Expected ~{:.1}% but got {CURRENCY_SYMBOL}{tax:.2} on amount {CURRENCY_SYMBOL}{amount:.2}",
            config.expected_tax_rate * 100.0
        ),
    )
}
