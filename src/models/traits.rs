use async_trait::async_trait;
use thiserror::Error;

use super::types::Message;

/// Raw result of one upstream generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Generated text
    pub text: String,
    /// Prompt tokens as reported by the provider, if it reports them
    pub prompt_tokens: Option<u64>,
    /// Completion tokens as reported by the provider, if it reports them
    pub completion_tokens: Option<u64>,
}

/// Failure of an upstream call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network failure, timeout, missing credentials or provider-side outage
    #[error("{0}")]
    Unavailable(String),

    /// The provider refused the request (content policy, quota, bad input)
    #[error("{0}")]
    Rejected(String),
}

/// Core trait that every upstream model backend must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next assistant turn for an ordered conversation
    async fn generate(&self, messages: &[Message], model: &str) -> Result<Generation, ProviderError>;

    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Whether the provider has what it needs (credentials etc.) to make calls
    fn is_configured(&self) -> bool {
        true
    }
}
