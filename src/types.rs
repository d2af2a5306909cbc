//! Core pipeline types and the model-invoker seam.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ExpenseParseError;

/// Capture modality for an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Audio,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    /// Title used when the model does not provide one.
    pub fn fallback_title(&self) -> &'static str {
        match self {
            Self::Image => "Unknown Merchant",
            Self::Audio => "Unknown Expense",
        }
    }

    /// Warning text emitted when the date fell back to the reference time.
    pub fn date_fallback_warning(&self) -> &'static str {
        match self {
            Self::Image => "Date not found in receipt, used current time.",
            Self::Audio => "Date not found in audio, used current time.",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw media handed to the model alongside the prompt. MIME and size
/// validation happen in the upload-handling layer before this point.
#[derive(Debug, Clone, Copy)]
pub struct MediaPart<'a> {
    pub bytes: &'a [u8],
    pub mime_type: &'a str,
}

/// The external multimodal model seam.
///
/// The pipeline never talks to a provider directly; it goes through this
/// trait so tests can substitute a scripted model. Implementations return
/// the model's free-form text or a transport/service error.
pub trait ExpenseModel {
    fn generate(&self, prompt: &str, media: MediaPart<'_>) -> Result<String, ExpenseParseError>;
}

/// The validated expense record. The normalizer guarantees a fallback for
/// every field, so a successful parse always populates all of them; the
/// optional fields mirror the wire contract consumers round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedExpense {
    pub title: String,
    pub category: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    pub amount: f64,
    pub currency: String,
    pub date: Option<String>,
    pub merchant: Option<String>,
    pub notes: Option<String>,
    pub description: Option<String>,
}

/// Final pipeline output: the expense, a confidence score in [0.0, 1.0],
/// ordered warnings, and the raw model text as a diagnostic passthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseAiResult {
    pub expense: NormalizedExpense,
    pub confidence: f64,
    pub warnings: Vec<String>,
    #[serde(rename = "rawText")]
    pub raw_text: Option<String>,
}
