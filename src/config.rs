//! Model client configuration.

use crate::ExpenseParseError;

/// Environment variable holding the Google API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Optional environment override for the model name.
pub const MODEL_ENV: &str = "LEDGERLENS_MODEL";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// Default Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upstream call timeout. A single receipt or voice clip round-trip is
/// well under this.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Gemini model client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Build from the environment. A missing or empty API key is the fatal
    /// configuration case: every parse attempt fails before any model call.
    pub fn from_env() -> Result<Self, ExpenseParseError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ExpenseParseError::NotConfigured)?;

        let mut config = Self::new(&api_key);
        if let Some(model) = std::env::var(MODEL_ENV).ok().filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Override the API endpoint (used by tests against a local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
