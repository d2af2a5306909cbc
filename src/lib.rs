//! Turns a receipt photo or a spoken voice note into a structured expense
//! record by calling a multimodal model and post-processing its output.
//!
//! The pipeline is: render a modality-specific prompt, invoke the model
//! with the media inline, recover a JSON object from the free-form reply,
//! normalize every field against controlled vocabularies, score the
//! extraction, and attach caller-facing warnings. See [`parser::ExpenseParser`]
//! for the entry point; [`gemini::GeminiClient`] is the production model
//! backend, swappable via the [`types::ExpenseModel`] trait.

pub mod config;
pub mod confidence;
pub mod extract;
pub mod gemini;
pub mod normalize;
pub mod parser;
pub mod prompts;
pub mod types;
pub mod vocab;

pub use config::GeminiConfig;
pub use gemini::{GeminiClient, MockExpenseModel};
pub use parser::{ExpenseParser, ParseRequest};
pub use types::{ExpenseAiResult, ExpenseModel, MediaPart, Modality, NormalizedExpense};

use thiserror::Error;

/// Pipeline failure. Field-level quality problems are not errors; they
/// show up as warnings on a successful [`ExpenseAiResult`].
#[derive(Debug, Error)]
pub enum ExpenseParseError {
    #[error("GEMINI_API_KEY is not configured")]
    NotConfigured,

    #[error("cannot reach the model endpoint at {0}")]
    Connection(String),

    #[error("model request failed: {0}")]
    HttpClient(String),

    #[error("model returned error (status {status}): {body}")]
    ModelError { status: u16, body: String },

    #[error("failed to decode model response: {0}")]
    ResponseDecode(String),

    #[error("no parseable JSON object in model response")]
    NoJsonFound,
}

/// Coarse classification for retry and reporting decisions at the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid local configuration; retrying cannot help.
    Configuration,
    /// The model provider failed or was unreachable.
    Upstream,
    /// The model answered but produced nothing parseable.
    Extraction,
}

impl ExpenseParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured => ErrorKind::Configuration,
            Self::Connection(_)
            | Self::HttpClient(_)
            | Self::ModelError { .. }
            | Self::ResponseDecode(_) => ErrorKind::Upstream,
            Self::NoJsonFound => ErrorKind::Extraction,
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins; "info" otherwise.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
