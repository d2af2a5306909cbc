//! Bounded quality signal over one extraction.

use crate::vocab::{is_allowed_category, is_allowed_payment_method};

/// Signal weights. They sum to exactly 1.0; the clamp in
/// [`compute_confidence`] is a ceiling guard for future weight changes,
/// not something the current weights can trip.
pub const WEIGHT_AMOUNT: f64 = 0.35;
pub const WEIGHT_TITLE: f64 = 0.20;
pub const WEIGHT_DATE: f64 = 0.20;
pub const WEIGHT_PAYMENT_METHOD: f64 = 0.10;
pub const WEIGHT_CATEGORY: f64 = 0.15;

/// Below this, the result carries a "please verify" warning.
pub const LOW_CONFIDENCE: f64 = 0.5;

/// What the scorer looks at.
///
/// Amount, title and date come from the normalized record — a date that
/// fell back to the reference time still counts as present. Category and
/// payment method are judged on what the model actually said, so a
/// vocabulary fallback depresses the score instead of satisfying it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceSignals<'a> {
    pub amount: f64,
    pub title: &'a str,
    pub date: &'a str,
    pub payment_method: &'a str,
    pub category: &'a str,
}

/// Additive weighted score, clamped to [0.0, 1.0]. No floor: all-false
/// input yields exactly 0.0.
pub fn compute_confidence(signals: &ConfidenceSignals<'_>) -> f64 {
    let mut score = 0.0;
    if signals.amount > 0.0 {
        score += WEIGHT_AMOUNT;
    }
    if !signals.title.is_empty() {
        score += WEIGHT_TITLE;
    }
    if !signals.date.is_empty() {
        score += WEIGHT_DATE;
    }
    if is_allowed_payment_method(signals.payment_method) {
        score += WEIGHT_PAYMENT_METHOD;
    }
    if is_allowed_category(signals.category) {
        score += WEIGHT_CATEGORY;
    }
    score.min(1.0)
}
