/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generative-text interactions MUST go through this module (normally
/// via the [`gateway::Gateway`] wrapper, which owns retry and fallback).
///
/// Errors are classified from the HTTP status at this boundary into the
/// tagged [`GenAiError`] variants; nothing downstream inspects error text.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod gateway;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Primary model used for all analysis calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const PRIMARY_MODEL: &str = "gemini-2.0-flash";
/// Lighter model substituted once when the primary is reported unavailable.
pub const FALLBACK_MODEL: &str = "gemini-2.0-flash-lite";

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by the generation service")]
    RateLimited,

    #[error("model '{model}' is not available")]
    ModelUnavailable { model: String },

    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("service returned no text content")]
    EmptyContent,
}

/// Seam for the generative-text transport. The production implementation is
/// [`GeminiClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends a single instruction to the named model and returns its
    /// generated text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenAiError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate, if any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Thin reqwest wrapper around the Gemini `generateContent` endpoint.
/// Carries no retry logic of its own — that lives in [`gateway::Gateway`].
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenAiError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{model}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Classification happens here, once, on the status code.
        if status.as_u16() == 429 {
            return Err(GenAiError::RateLimited);
        }
        if status.as_u16() == 404 {
            return Err(GenAiError::ModelUnavailable {
                model: model.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenAiError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &generated.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={:?}, candidate_tokens={:?}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        generated.text().ok_or(GenAiError::EmptyContent)
    }
}
