//! Receipt validation engine.
//!
//! Provides the report types and the rule evaluator. The engine never
//! fails on malformed input: every anomaly becomes a rule result in the
//! report, so callers only ever read `passed`.

pub mod report;
pub mod validator;

pub use report::{RuleResult, RuleStatus, ValidationReport};
pub use validator::{validate, BillIdLookup, PrefetchedLookup, ValidationConfig};
