use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Full conversation, oldest first
    pub messages: Vec<Message>,
    /// Catalog identifier; the configured default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    /// Build a usage record; the total is always derived from its parts
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Add another usage record to this one
    pub fn accumulate(&mut self, other: &Usage) {
        *self = Usage::new(
            self.prompt_tokens.saturating_add(other.prompt_tokens),
            self.completion_tokens.saturating_add(other.completion_tokens),
        );
    }
}

/// Body returned by a successful `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Model that produced the response
    pub model: String,
    pub usage: Usage,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    /// Configured default model
    pub model: String,
    pub available_models: Vec<String>,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// One catalog entry as exposed by `GET /models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `GET /models`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub available_models: Vec<ModelInfo>,
    pub count: usize,
}

impl ModelsResponse {
    pub fn new(available_models: Vec<ModelInfo>) -> Self {
        let count = available_models.len();
        Self {
            available_models,
            count,
        }
    }
}

/// Error body shared by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_without_model() {
        let request: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "Hello"}]
        }))
        .unwrap();

        assert_eq!(request.model, None);
        assert_eq!(request.messages, vec![Message::user("Hello")]);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<ChatRequest, _> = serde_json::from_value(json!({
            "messages": [{"role": "tool", "content": "Hello"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_usage_total() {
        let mut usage = Usage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);

        usage.accumulate(&Usage::new(1, 2));
        assert_eq!(usage, Usage::new(13, 32));
        assert_eq!(usage.total_tokens, 45);
    }

    #[test]
    fn test_usage_saturates_on_huge_counts() {
        let usage = Usage::new(u64::MAX, 10);
        assert_eq!(usage.total_tokens, u64::MAX);

        let mut session = Usage::new(u64::MAX - 1, 1);
        session.accumulate(&Usage::new(5, 5));
        assert_eq!(session.prompt_tokens, u64::MAX);
        assert_eq!(session.completion_tokens, 6);
        assert_eq!(session.total_tokens, u64::MAX);
    }

    #[test]
    fn test_health_serializes_lowercase_status() {
        let value = serde_json::to_value(HealthState::Degraded).unwrap();
        assert_eq!(value, json!("degraded"));
    }
}
