//! Field-level normalization with deterministic fallbacks.
//!
//! Every function here is total and side-effect-free: malformed model output
//! degrades the confidence score downstream, it never aborts the pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::vocab::{
    ALLOWED_CATEGORIES, ALLOWED_PAYMENT_METHODS, FALLBACK_CATEGORY, FALLBACK_PAYMENT_METHOD,
};

/// Currency used when the model supplies none.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Amount: numbers pass through; strings are stripped of currency symbols
/// and thousands separators, then parsed; anything else is 0.0.
pub fn normalize_amount(raw: Option<&Value>) -> f64 {
    match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let cleaned = s.replace(',', "").replace('$', "").replace('₹', "");
            cleaned.trim().parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Date: identity on any syntactically valid ISO-8601 string (trailing `Z`
/// accepted as UTC shorthand); the supplied reference time otherwise.
/// No alternate date formats are attempted.
pub fn normalize_date(raw: Option<&Value>, default_iso: &str) -> String {
    match raw {
        Some(Value::String(s)) if !s.is_empty() && is_iso8601(s) => s.clone(),
        _ => default_iso.to_string(),
    }
}

/// ISO-8601 with offset, without offset, or a bare calendar date.
fn is_iso8601(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || s.parse::<NaiveDateTime>().is_ok()
        || s.parse::<NaiveDate>().is_ok()
}

/// Category: exact match first, then case-insensitive substring containment
/// in both directions, in vocabulary order; "Misc" when nothing matches.
///
/// An empty input trivially contains-matches the first vocabulary entry;
/// kept as-is because changing it changes observable extraction results.
pub fn normalize_category(raw: Option<&Value>) -> &'static str {
    let input = match raw {
        Some(Value::String(s)) => s.as_str(),
        _ => "",
    };
    if let Some(exact) = ALLOWED_CATEGORIES.iter().find(|c| **c == input) {
        return exact;
    }
    let lowered = input.to_lowercase();
    for allowed in ALLOWED_CATEGORIES {
        let allowed_lower = allowed.to_lowercase();
        if lowered.contains(&allowed_lower) || allowed_lower.contains(&lowered) {
            return allowed;
        }
    }
    FALLBACK_CATEGORY
}

/// Payment method: exact match first, then case-insensitive "allowed value
/// contained in input", in vocabulary order; "Cash" when nothing matches.
pub fn normalize_payment_method(raw: Option<&Value>) -> &'static str {
    let input = match raw {
        Some(Value::String(s)) => s.as_str(),
        _ => "",
    };
    if let Some(exact) = ALLOWED_PAYMENT_METHODS.iter().find(|m| **m == input) {
        return exact;
    }
    let lowered = input.to_lowercase();
    for allowed in ALLOWED_PAYMENT_METHODS {
        if lowered.contains(&allowed.to_lowercase()) {
            return allowed;
        }
    }
    FALLBACK_PAYMENT_METHOD
}

/// Title: any string passes through, even an empty one; everything else
/// becomes the modality's fallback.
pub fn normalize_title(raw: Option<&Value>, fallback: &str) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        _ => fallback.to_string(),
    }
}

/// Currency: strings pass through; everything else defaults to INR.
pub fn normalize_currency(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        _ => DEFAULT_CURRENCY.to_string(),
    }
}

/// Merchant/notes: strings pass through, anything else is dropped.
pub fn normalize_optional_text(raw: Option<&Value>) -> Option<String> {
    match raw {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Description keeps the upstream DTO behavior: an absent key becomes an
/// empty string, an explicit null stays null.
pub fn normalize_description(raw: Option<&Value>) -> Option<String> {
    match raw {
        None => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => None,
    }
}
