use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::traits::{Generation, Provider, ProviderError};
use super::types::{Message, MessageRole};
use crate::app::UpstreamConfig;

/// Finish reasons Gemini uses when it refuses to produce content
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Provider backed by the Google Gemini `generateContent` API
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Create a provider from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

/// Translate a conversation into Gemini's request schema.
///
/// System turns become the system instruction; assistant turns use Gemini's
/// `model` role.
fn build_request(messages: &[Message]) -> Result<GenerateContentRequest, ProviderError> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        match msg.role {
            MessageRole::System => system_parts.push(msg.content.as_str()),
            MessageRole::User | MessageRole::Assistant => {
                let role = if msg.role == MessageRole::User { "user" } else { "model" };
                contents.push(Content {
                    role: Some(role.to_string()),
                    parts: vec![Part {
                        text: msg.content.clone(),
                    }],
                });
            }
        }
    }

    if contents.is_empty() {
        return Err(ProviderError::Rejected(
            "conversation contains no user or assistant messages".to_string(),
        ));
    }

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(Content {
            role: None,
            parts: vec![Part {
                text: system_parts.join("\n\n"),
            }],
        })
    };

    Ok(GenerateContentRequest {
        contents,
        system_instruction,
    })
}

/// Map a non-success HTTP status to the gateway's failure taxonomy
fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let detail = format!("Gemini API returned {}: {}", status, message);

    if status.is_client_error() {
        ProviderError::Rejected(detail)
    } else {
        ProviderError::Unavailable(detail)
    }
}

/// Pull the generated text and usage out of a successful response
fn parse_response(response: GenerateContentResponse) -> Result<Generation, ProviderError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::Rejected(format!("prompt blocked by provider: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Unavailable("provider returned no candidates".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKING_FINISH_REASONS.contains(&reason) {
            return Err(ProviderError::Rejected(format!(
                "response blocked by provider: {}",
                reason
            )));
        }
    }

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::Unavailable("provider returned an empty response".to_string()));
    }

    let usage = response.usage_metadata.unwrap_or_default();
    Ok(Generation {
        text,
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
    })
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, messages: &[Message], model: &str) -> Result<Generation, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::Unavailable(
                "no API key configured; set GOOGLE_API_KEY and restart the gateway".to_string(),
            )
        })?;

        let body = build_request(messages)?;
        let url = self.endpoint(model);
        debug!("POST {} ({} contents)", url, body.contents.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Unavailable(format!("request to Gemini API timed out: {}", e))
                } else {
                    ProviderError::Unavailable(format!("failed to reach Gemini API: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("failed to read Gemini API response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Unavailable(format!("malformed Gemini API response: {}", e)))?;

        parse_response(parsed)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// Request/response structures for the Gemini REST API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
