//! Controlled vocabularies shared by the prompt builder and the normalizer.
//!
//! Both sides read the same constants, so the contract stated in the prompt
//! and the fallback behavior of the normalizer cannot drift apart. Nothing
//! here mutates after process start.

/// Expense categories the pipeline is allowed to emit.
///
/// "Misc" is last and doubles as the universal fallback.
pub const ALLOWED_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transport",
    "Shopping",
    "Bills & Utilities",
    "Entertainment",
    "Health & Wellness",
    "Rent",
    "Groceries",
    "Misc",
];

/// Payment methods the pipeline is allowed to emit.
///
/// "Cash" is last and doubles as the universal fallback.
pub const ALLOWED_PAYMENT_METHODS: &[&str] = &["UPI", "Card", "NetBanking", "Cash"];

/// Category used when nothing in the vocabulary matches.
pub const FALLBACK_CATEGORY: &str = "Misc";

/// Payment method used when nothing in the vocabulary matches.
pub const FALLBACK_PAYMENT_METHOD: &str = "Cash";

/// Exact (case-sensitive) vocabulary membership.
pub fn is_allowed_category(value: &str) -> bool {
    ALLOWED_CATEGORIES.contains(&value)
}

/// Exact (case-sensitive) vocabulary membership.
pub fn is_allowed_payment_method(value: &str) -> bool {
    ALLOWED_PAYMENT_METHODS.contains(&value)
}

/// Comma-separated category list for prompt interpolation.
pub fn categories_csv() -> String {
    ALLOWED_CATEGORIES.join(", ")
}

/// Comma-separated payment method list for prompt interpolation.
pub fn payment_methods_csv() -> String {
    ALLOWED_PAYMENT_METHODS.join(", ")
}
