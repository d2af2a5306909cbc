//! Prompt templates for the two capture modalities.
//!
//! Templates are named, versioned configuration values rather than inline
//! string construction, so prompt changes are auditable independently of
//! pipeline logic. Placeholders are filled from [`PromptContext`] and the
//! controlled vocabularies at render time.

use crate::types::Modality;
use crate::vocab;

/// A versioned instruction template.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    /// Stable identifier, e.g. "receipt-image.v1". Logged per request.
    pub id: &'static str,
    body: &'static str,
}

/// Request context interpolated into a template.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Reference timestamp (ISO-8601) the model resolves relative dates against.
    pub now_iso: &'a str,
    /// IANA timezone name, passed to the model verbatim.
    pub timezone: &'a str,
    /// MIME type of the uploaded media.
    pub mime_type: &'a str,
}

const RECEIPT_IMAGE_V1: PromptTemplate = PromptTemplate {
    id: "receipt-image.v1",
    body: r#"You are an expert receipt parser. Your job is to extract structured expense data from the provided image.
Return valid JSON only. No markdown formatting, no explanations.

Schema:
{
  "title": "Merchant Name or Short Title",
  "category": "One of the allowed categories",
  "paymentMethod": "One of the allowed payment methods",
  "amount": 123.45,
  "date": "ISO8601 Date String (YYYY-MM-DDTHH:MM:SSZ)",
  "description": "Short description of items or context"
}

Rules:
1. **Category**: Must be one of: {categories}. If unsure, choose 'Misc' or 'Shopping'.
2. **Payment Method**: Must be one of: {payment_methods}. Guess from text (e.g. 'UPI', 'Visa', 'Cash'). Default to 'Cash' if unknown.
3. **Amount**: Find the Grand Total / Payable Amount. Must be a number.
4. **Date**: Extract the date and time. Convert to ISO8601 format. If date is not found, leave it null.
5. **Title**: value should be the Merchant Name (e.g. 'Starbucks', 'Uber', 'Zomato'). Keep it short.
6. **Description**: Brief summary (e.g. 'Coffee and snacks', 'Taxi ride'). Max 1-2 sentences.

Context:
- Current Time: {now_iso}
- Timezone: {timezone}

Input Image is a {mime_type}.
"#,
};

const VOICE_NOTE_V1: PromptTemplate = PromptTemplate {
    id: "voice-note.v1",
    body: r#"You are an expert expense assistant. Your job is to extract structured expense data from the provided voice note.
Return valid JSON only. No markdown formatting, no explanations.

Schema:
{
  "title": "Short Expense Title",
  "category": "One of the allowed categories",
  "paymentMethod": "One of the allowed payment methods",
  "amount": 123.45,
  "merchant": "Merchant or payee name, if spoken",
  "date": "ISO8601 Date String (YYYY-MM-DDTHH:MM:SSZ)",
  "description": "Short description of what was bought"
}

Rules:
1. **Category**: Must be one of: {categories}. If unsure, choose 'Misc'.
2. **Payment Method**: Must be one of: {payment_methods}. Default to 'Cash' if not spoken.
3. **Amount**: The amount the speaker says they paid. Must be a number.
4. **Date**: Resolve spoken dates like 'yesterday' or 'last Friday' against the current time below, in ISO8601 format. If no date is spoken, leave it null.
5. **Merchant**: Include only if the speaker names a merchant or payee.
6. **Title**: A short label for the expense (e.g. 'Groceries', 'Auto fare'). Keep it short.

Context:
- Current Time: {now_iso}
- Timezone: {timezone}

Input audio is a {mime_type} recording.
"#,
};

/// The template registry, keyed by modality.
pub fn template_for(modality: Modality) -> &'static PromptTemplate {
    match modality {
        Modality::Image => &RECEIPT_IMAGE_V1,
        Modality::Audio => &VOICE_NOTE_V1,
    }
}

impl PromptTemplate {
    /// Render the template against the vocabularies and request context.
    pub fn render(&self, ctx: &PromptContext<'_>) -> String {
        self.body
            .replace("{categories}", &vocab::categories_csv())
            .replace("{payment_methods}", &vocab::payment_methods_csv())
            .replace("{now_iso}", ctx.now_iso)
            .replace("{timezone}", ctx.timezone)
            .replace("{mime_type}", ctx.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{ALLOWED_CATEGORIES, ALLOWED_PAYMENT_METHODS};

    fn ctx() -> PromptContext<'static> {
        PromptContext {
            now_iso: "2024-03-15T18:30:00Z",
            timezone: "Asia/Kolkata",
            mime_type: "image/jpeg",
        }
    }

    #[test]
    fn render_fills_every_placeholder() {
        for modality in [Modality::Image, Modality::Audio] {
            let prompt = template_for(modality).render(&ctx());
            for placeholder in [
                "{categories}",
                "{payment_methods}",
                "{now_iso}",
                "{timezone}",
                "{mime_type}",
            ] {
                assert!(!prompt.contains(placeholder), "{modality}: {placeholder} left unfilled");
            }
        }
    }

    #[test]
    fn render_embeds_full_vocabularies() {
        let prompt = template_for(Modality::Image).render(&ctx());
        for c in ALLOWED_CATEGORIES {
            assert!(prompt.contains(c), "missing category {c}");
        }
        for m in ALLOWED_PAYMENT_METHODS {
            assert!(prompt.contains(m), "missing payment method {m}");
        }
    }

    #[test]
    fn render_embeds_request_context() {
        let prompt = template_for(Modality::Audio).render(&ctx());
        assert!(prompt.contains("2024-03-15T18:30:00Z"));
        assert!(prompt.contains("Asia/Kolkata"));
        assert!(prompt.contains("image/jpeg"));
    }

    #[test]
    fn audio_template_surfaces_merchant_hint() {
        let audio = template_for(Modality::Audio).render(&ctx());
        let image = template_for(Modality::Image).render(&ctx());
        assert!(audio.contains("\"merchant\""));
        assert!(!image.contains("\"merchant\""));
    }

    #[test]
    fn template_ids_are_stable_and_versioned() {
        assert_eq!(template_for(Modality::Image).id, "receipt-image.v1");
        assert_eq!(template_for(Modality::Audio).id, "voice-note.v1");
    }

    #[test]
    fn schema_braces_survive_rendering() {
        // The JSON schema example uses literal braces; only the named
        // placeholders may be replaced.
        let prompt = template_for(Modality::Image).render(&ctx());
        assert!(prompt.contains("\"paymentMethod\""));
        assert!(prompt.contains('{') && prompt.contains('}'));
    }
}
