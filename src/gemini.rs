//! Google Generative Language API client — the external model invoker.
//!
//! The pipeline treats this as a black box that takes a prompt plus media
//! bytes and returns free-form text. Transport and service failures map
//! onto distinct error variants so callers can tell a provider outage from
//! prompt or formatting drift.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::types::{ExpenseModel, MediaPart};
use crate::ExpenseParseError;

/// HTTP client for the `generateContent` endpoint. Media bytes are inlined
/// base64 in the request body; no upload session is used.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    /// Construct from `GEMINI_API_KEY`; fails with the configuration error
    /// before any network call when the key is absent.
    pub fn from_env() -> Result<Self, ExpenseParseError> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline { inline_data: InlineData },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl ExpenseModel for GeminiClient {
    fn generate(&self, prompt: &str, media: MediaPart<'_>) -> Result<String, ExpenseParseError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(media.bytes);
        let body = GenerateContentRequest {
            contents: vec![Content {
                // Media part first, prompt second — the ordering the
                // upstream prompts were written against.
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: media.mime_type.to_string(),
                            data: encoded,
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ExpenseParseError::Connection(self.config.base_url.clone())
                } else if e.is_timeout() {
                    ExpenseParseError::HttpClient(format!(
                        "request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    ExpenseParseError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExpenseParseError::ModelError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| ExpenseParseError::ResponseDecode(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(ExpenseParseError::ResponseDecode(
                "model returned no text candidates".into(),
            ));
        }
        Ok(text)
    }
}

// ──────────────────────────────────────────────
// MockExpenseModel (testing)
// ──────────────────────────────────────────────

/// Scripted model for tests — returns a fixed response and records nothing.
pub struct MockExpenseModel {
    response: String,
}

impl MockExpenseModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl ExpenseModel for MockExpenseModel {
    fn generate(&self, _prompt: &str, _media: MediaPart<'_>) -> Result<String, ExpenseParseError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_model_and_action() {
        let client = GeminiClient::new(
            GeminiConfig::new("k").with_base_url("http://localhost:9090/"),
        );
        assert_eq!(
            client.endpoint(),
            "http://localhost:9090/models/gemini-flash-latest:generateContent"
        );
    }

    #[test]
    fn request_body_uses_inline_data_and_text_parts() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "AAAA".into(),
                        },
                    },
                    Part::Text { text: "prompt" },
                ],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[0]["inline_data"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "prompt");
    }

    #[test]
    fn response_decoding_tolerates_sparse_candidates() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "hello "}, {"text": "world"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();
        assert_eq!(text, "hello world");

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());
    }

    #[test]
    fn mock_returns_configured_response() {
        let model = MockExpenseModel::new("{\"title\": \"Uber\"}");
        let out = model
            .generate(
                "prompt",
                MediaPart {
                    bytes: b"fake-jpeg",
                    mime_type: "image/jpeg",
                },
            )
            .unwrap();
        assert_eq!(out, "{\"title\": \"Uber\"}");
    }
}
