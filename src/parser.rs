//! Pipeline orchestration: prompt → model → JSON recovery → normalize →
//! score → warnings → result.
//!
//! Holds no mutable state; concurrent invocations are independent. Upstream
//! failures and empty extractions are terminal for the request and are not
//! retried here — retry policy belongs to the caller.

use serde_json::Value;
use uuid::Uuid;

use crate::confidence::{compute_confidence, ConfidenceSignals, LOW_CONFIDENCE};
use crate::extract::{extract_json, ExtractedRecord};
use crate::normalize::{
    normalize_amount, normalize_category, normalize_currency, normalize_date,
    normalize_description, normalize_optional_text, normalize_payment_method, normalize_title,
};
use crate::prompts::{template_for, PromptContext};
use crate::types::{ExpenseAiResult, ExpenseModel, MediaPart, Modality, NormalizedExpense};
use crate::ExpenseParseError;

/// Warning attached when confidence lands below [`LOW_CONFIDENCE`].
pub const LOW_CONFIDENCE_WARNING: &str = "Low confidence extraction, please verify carefully.";

/// One parse request. The upload-handling layer has already validated the
/// MIME prefix and payload size; the pipeline takes the bytes as given.
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    pub media: &'a [u8],
    pub mime_type: &'a str,
    pub modality: Modality,
    /// Reference timestamp (ISO-8601); prompt context and date fallback.
    pub now_iso: &'a str,
    /// IANA timezone name, passed to the model verbatim.
    pub timezone: &'a str,
}

/// Runs the extraction pipeline against an injected model.
pub struct ExpenseParser {
    model: Box<dyn ExpenseModel + Send + Sync>,
}

impl ExpenseParser {
    pub fn new(model: Box<dyn ExpenseModel + Send + Sync>) -> Self {
        Self { model }
    }

    /// Parse one capture into a structured expense, or fail with a
    /// classified error. Field-level quality issues never fail the request;
    /// they surface as warnings and a depressed confidence score.
    pub fn parse(&self, request: &ParseRequest<'_>) -> Result<ExpenseAiResult, ExpenseParseError> {
        let request_id = Uuid::new_v4();
        let _span = tracing::info_span!(
            "parse_expense",
            request_id = %request_id,
            modality = %request.modality,
            mime_type = request.mime_type,
            media_size = request.media.len(),
        )
        .entered();

        let template = template_for(request.modality);
        let prompt = template.render(&PromptContext {
            now_iso: request.now_iso,
            timezone: request.timezone,
            mime_type: request.mime_type,
        });
        tracing::debug!(template = template.id, "prompt rendered");

        let raw_text = self.model.generate(
            &prompt,
            MediaPart {
                bytes: request.media,
                mime_type: request.mime_type,
            },
        )?;

        let record = extract_json(&raw_text).ok_or_else(|| {
            tracing::warn!(response_len = raw_text.len(), "no parseable JSON in model response");
            ExpenseParseError::NoJsonFound
        })?;

        let result = assemble(record, raw_text, request);
        tracing::info!(
            confidence = result.confidence,
            warnings = result.warnings.len(),
            "expense extracted"
        );
        Ok(result)
    }
}

/// Normalize every field independently, score the result, derive warnings.
/// Nothing in here can fail.
fn assemble(record: ExtractedRecord, raw_text: String, request: &ParseRequest<'_>) -> ExpenseAiResult {
    let expense = NormalizedExpense {
        title: normalize_title(record.title.as_ref(), request.modality.fallback_title()),
        category: normalize_category(record.category.as_ref()).to_string(),
        payment_method: normalize_payment_method(record.payment_method.as_ref()).to_string(),
        amount: normalize_amount(record.amount.as_ref()),
        currency: normalize_currency(record.currency.as_ref()),
        date: Some(normalize_date(record.date.as_ref(), request.now_iso)),
        merchant: normalize_optional_text(record.merchant.as_ref()),
        notes: normalize_optional_text(record.notes.as_ref()),
        description: normalize_description(record.description.as_ref()),
    };

    let normalized_date = expense.date.as_deref().unwrap_or_default();
    // Category and payment method are judged on the raw values: a fallback
    // substitution should depress confidence, not satisfy it.
    let confidence = compute_confidence(&ConfidenceSignals {
        amount: expense.amount,
        title: &expense.title,
        date: normalized_date,
        payment_method: value_str(record.payment_method.as_ref()).unwrap_or_default(),
        category: value_str(record.category.as_ref()).unwrap_or_default(),
    });

    let mut warnings = Vec::new();
    // Literal comparison of raw vs reference time: the warning fires only
    // when the fallback was actually applied, not on coincidental equality.
    let raw_date = value_str(record.date.as_ref());
    if normalized_date == request.now_iso && raw_date != Some(request.now_iso) {
        warnings.push(request.modality.date_fallback_warning().to_string());
    }
    if confidence < LOW_CONFIDENCE {
        warnings.push(LOW_CONFIDENCE_WARNING.to_string());
    }

    ExpenseAiResult {
        expense,
        confidence,
        warnings,
        raw_text: Some(raw_text),
    }
}

fn value_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}
