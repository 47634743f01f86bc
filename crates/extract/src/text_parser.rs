//! Regex parser for raw OCR text.
//!
//! OCR output is noisy; every field is best-effort. The parser only
//! commits to values it actually matched and leaves the rest `None` so
//! the validation report names what is missing.

use regex::Regex;
use serde_json::json;

use receiptvault_core::receipt::{LineItem, ReceiptDraft};

/// Parse OCR text into a receipt draft.
pub fn parse_receipt_text(text: &str) -> ReceiptDraft {
    let bill_id = capture(
        r"(?i)(?:bill|invoice|receipt)\s*(?:no|number|id)?\s*[:#.]?\s*([A-Za-z0-9][A-Za-z0-9/-]*)",
        text,
    );
    let date = find_date(text);
    let amount = labeled_amount(r"(?i)\b(?:grand\s+total|total|amount\s+due|amount)\b", text);
    let tax = labeled_amount(r"(?i)\b(?:tax|gst|vat)\b", text);
    let subtotal = labeled_amount(r"(?i)\bsub\s*-?\s*total\b", text);

    ReceiptDraft {
        bill_id,
        vendor: find_vendor(text),
        date,
        amount: amount.map(|v| json!(v)),
        tax: tax.map(|v| json!(v)),
        subtotal: subtotal.map(|v| json!(v)),
        category: None,
        items: find_items(text),
    }
}

/// First capture group of `pattern` in `text`, trimmed.
fn capture(pattern: &str, text: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    let captures = re.captures(text)?;
    Some(captures.get(1)?.as_str().trim().to_string())
}

/// The vendor is taken as the first line that looks like a name: non-empty,
/// mostly letters, and not one of the labelled fields.
fn find_vendor(text: &str) -> Option<String> {
    let label = Regex::new(r"(?i)(?:bill|invoice|receipt|date|total|tax|gst|vat|subtotal)").ok()?;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || label.is_match(line) {
            continue;
        }
        let letters = line.chars().filter(|c| c.is_alphabetic()).count();
        if letters * 2 >= line.chars().count() {
            return Some(line.to_string());
        }
    }
    None
}

/// Find a date and normalise recognised layouts to `YYYY-MM-DD`.
///
/// `DD/MM/YYYY` and `DD-MM-YYYY` are rewritten; an already-ISO date passes
/// through; anything else is left for the validator to flag.
fn find_date(text: &str) -> Option<String> {
    if let Some(iso) = capture(r"\b(\d{4}-\d{2}-\d{2})\b", text) {
        return Some(iso);
    }
    let re = Regex::new(r"\b(\d{2})[/-](\d{2})[/-](\d{4})\b").ok()?;
    let captures = re.captures(text)?;
    Some(format!("{}-{}-{}", &captures[3], &captures[2], &captures[1]))
}

/// Amount following a label, tolerating currency symbols and separators.
fn labeled_amount(label_pattern: &str, text: &str) -> Option<f64> {
    let pattern = format!(
        r"{label_pattern}\s*[:\s]*(?:₹|Rs\.?|INR|\$)?\s*([0-9][0-9,]*(?:\.[0-9]+)?)"
    );
    let raw = capture(&pattern, text)?;
    raw.replace(',', "").parse::<f64>().ok()
}

/// Item lines of the form `<name> <qty> x <price>`.
fn find_items(text: &str) -> Vec<LineItem> {
    let re = match Regex::new(
        r"(?m)^\s*(.+?)\s+(\d+(?:\.\d+)?)\s*[xX*]\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*$",
    ) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    re.captures_iter(text)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str().trim().to_string();
            let quantity = captures.get(2)?.as_str().parse::<f64>().ok()?;
            let price = captures
                .get(3)?
                .as_str()
                .replace(',', "")
                .parse::<f64>()
                .ok()?;
            Some(LineItem {
                name,
                quantity,
                price,
            })
        })
        .collect()
}
