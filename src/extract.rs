//! JSON recovery from free-form model text.
//!
//! The model is instructed to return bare JSON but is not contractually
//! guaranteed to comply: responses arrive wrapped in prose, markdown fences,
//! or both. Three tiers are tried in order; the first candidate that parses
//! as a JSON object wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Fenced ```json block with a non-greedy object interior.
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").unwrap());

/// The untyped record recovered from model text.
///
/// Fields stay raw JSON values so oddly-typed output (a string amount, a
/// numeric title) survives until the normalizer decides what to do with it.
/// Unknown keys are dropped; an explicitly-null field is `Some(Value::Null)`
/// while an absent key is `None` — the description default and the date
/// warning both depend on that distinction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedRecord {
    #[serde(deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub category: Option<Value>,
    #[serde(rename = "paymentMethod", deserialize_with = "present")]
    pub payment_method: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub amount: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub currency: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub date: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub merchant: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub notes: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub description: Option<Value>,
}

/// Keeps `null` as `Some(Value::Null)` instead of folding it into `None`,
/// so present-but-null is distinguishable from absent.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Recover the first JSON object embedded anywhere in the model's text.
///
/// Returns `None` when no candidate parses; the caller treats that as a
/// terminal extraction failure.
pub fn extract_json(text: &str) -> Option<ExtractedRecord> {
    // Tier 1: the whole response is a JSON document.
    if let Some(record) = parse_object(text) {
        return Some(record);
    }

    // Tier 2: a fenced ```json block somewhere in the prose.
    if let Some(captures) = FENCED_JSON.captures(text) {
        if let Some(record) = parse_object(captures.get(1).map_or("", |m| m.as_str())) {
            return Some(record);
        }
    }

    // Tier 3: first `{` to last `}`. Deliberately not nesting-aware; text
    // with multiple independent JSON fragments can defeat this, but changing
    // the heuristic changes observable extraction results.
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Some(record) = parse_object(&text[start..=end]) {
                return Some(record);
            }
        }
    }

    None
}

/// Parse a candidate as JSON, accepting only top-level objects.
fn parse_object(candidate: &str) -> Option<ExtractedRecord> {
    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Tier 1: bare JSON ────────────────────────────────

    #[test]
    fn bare_json_object() {
        let record = extract_json(r#"{"title": "Uber", "amount": 230}"#).unwrap();
        assert_eq!(record.title.unwrap().as_str(), Some("Uber"));
        assert_eq!(record.amount.unwrap().as_f64(), Some(230.0));
    }

    #[test]
    fn bare_json_with_surrounding_whitespace() {
        let record = extract_json("\n  {\"title\": \"Zomato\"}  \n").unwrap();
        assert_eq!(record.title.unwrap().as_str(), Some("Zomato"));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(extract_json("[1, 2, 3]").is_none());
        assert!(extract_json("42").is_none());
        assert!(extract_json("\"just a string\"").is_none());
    }

    // ── Tier 2: fenced block ─────────────────────────────

    #[test]
    fn fenced_json_block() {
        let text = "Here is the result:\n```json\n{\"amount\": \"$45.00\", \"title\": \"Starbucks\"}\n```\nLet me know if you need anything else.";
        let record = extract_json(text).unwrap();
        assert_eq!(record.amount.unwrap().as_str(), Some("$45.00"));
    }

    #[test]
    fn fenced_block_without_trailing_prose() {
        let text = "```json\n{\"title\": \"Metro\"}\n```";
        let record = extract_json(text).unwrap();
        assert_eq!(record.title.unwrap().as_str(), Some("Metro"));
    }

    // ── Tier 3: brace scan ───────────────────────────────

    #[test]
    fn object_embedded_in_prose() {
        let text = "Sure! The expense is {\"title\": \"Big Bazaar\", \"amount\": 1250.5} as requested.";
        let record = extract_json(text).unwrap();
        assert_eq!(record.title.unwrap().as_str(), Some("Big Bazaar"));
    }

    #[test]
    fn nested_object_in_prose() {
        let text = "Result: {\"title\": \"Cafe\", \"notes\": null, \"amount\": 80}";
        let record = extract_json(text).unwrap();
        assert_eq!(record.amount.unwrap().as_f64(), Some(80.0));
    }

    #[test]
    fn two_fragments_defeat_the_brace_scan() {
        // First-{-to-last-} spans both fragments and fails to parse.
        let text = r#"Either {"title": "A"} or {"title": "B"} works."#;
        assert!(extract_json(text).is_none());
    }

    // ── Failure cases ────────────────────────────────────

    #[test]
    fn no_json_returns_none() {
        assert!(extract_json("I could not read the receipt, sorry.").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn unbalanced_braces_return_none() {
        assert!(extract_json("{\"title\": \"broken").is_none());
    }

    // ── Record semantics ─────────────────────────────────

    #[test]
    fn unknown_keys_are_dropped() {
        let record = extract_json(r#"{"title": "Uber", "hallucinated": true}"#).unwrap();
        assert!(record.title.is_some());
        assert!(record.category.is_none());
    }

    #[test]
    fn null_is_distinct_from_absent() {
        let record = extract_json(r#"{"description": null}"#).unwrap();
        assert_eq!(record.description, Some(Value::Null));
        assert_eq!(record.notes, None);
    }

    #[test]
    fn payment_method_uses_wire_name() {
        let record = extract_json(r#"{"paymentMethod": "UPI"}"#).unwrap();
        assert_eq!(record.payment_method.unwrap().as_str(), Some("UPI"));
    }

    #[test]
    fn oddly_typed_fields_survive() {
        let record = extract_json(r#"{"title": 42, "amount": "1,234.50"}"#).unwrap();
        assert_eq!(record.title.unwrap().as_f64(), Some(42.0));
        assert_eq!(record.amount.unwrap().as_str(), Some("1,234.50"));
    }

    #[test]
    fn empty_object_parses() {
        let record = extract_json("{}").unwrap();
        assert!(record.title.is_none());
        assert!(record.amount.is_none());
    }
}
