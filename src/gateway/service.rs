use anyhow::{bail, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::errors::GatewayError;
use crate::app::Config;
use crate::constants::GATEWAY_VERSION;
use crate::models::{
    ChatRequest, ChatResponse, HealthState, HealthStatus, MessageRole, ModelCatalog, ModelsResponse,
    Provider, Usage,
};
use crate::utils::{count_message_tokens, count_tokens};

/// Stateless relay between chat clients and the upstream provider.
///
/// Holds only the read-only catalog, the default model and the provider, so
/// one instance can serve any number of concurrent requests behind an `Arc`.
pub struct Gateway {
    catalog: ModelCatalog,
    default_model: String,
    provider: Arc<dyn Provider>,
}

impl Gateway {
    /// Create a gateway; the default model must be part of the catalog
    pub fn new(
        catalog: ModelCatalog,
        default_model: impl Into<String>,
        provider: Arc<dyn Provider>,
    ) -> Result<Self> {
        let default_model = default_model.into();
        if !catalog.contains(&default_model) {
            bail!("default model '{}' is not in the model catalog", default_model);
        }

        Ok(Self {
            catalog,
            default_model,
            provider,
        })
    }

    /// Build a gateway from loaded configuration
    pub fn from_config(config: &Config, provider: Arc<dyn Provider>) -> Result<Self> {
        Self::new(config.build_catalog()?, config.default_model.clone(), provider)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Check a request and resolve the model it should run on
    pub fn validate<'a>(&'a self, request: &'a ChatRequest) -> Result<&'a str, GatewayError> {
        if request.messages.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "At least one message is required".to_string(),
            ));
        }

        if let Some(index) = request
            .messages
            .iter()
            .position(|m| m.content.trim().is_empty())
        {
            return Err(GatewayError::InvalidRequest(format!(
                "Message {} has empty content",
                index
            )));
        }

        if !request
            .messages
            .iter()
            .any(|m| matches!(m.role, MessageRole::User | MessageRole::Assistant))
        {
            return Err(GatewayError::InvalidRequest(
                "At least one user or assistant message is required".to_string(),
            ));
        }

        match request.model.as_deref() {
            None => Ok(self.default_model.as_str()),
            Some(model) if self.catalog.contains(model) => Ok(model),
            Some(model) => Err(GatewayError::UnknownModel(format!(
                "Model '{}' is not supported. Available models: {}",
                model,
                self.catalog.names().join(", ")
            ))),
        }
    }

    /// Relay one conversation to the provider and account for token usage
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, GatewayError> {
        let model = match self.validate(&request) {
            Ok(model) => model.to_string(),
            Err(e) => {
                warn!("Rejected chat request: {}", e);
                return Err(e);
            }
        };

        if !self.provider.is_configured() {
            let e = GatewayError::UpstreamUnavailable(format!(
                "Model {} is not available. Please check your API key and permissions.",
                model
            ));
            error!("{}", e);
            return Err(e);
        }

        let generation = self
            .provider
            .generate(&request.messages, &model)
            .await
            .map_err(|e| {
                let e = GatewayError::from(e);
                error!(model = %model, "{}", e);
                e
            })?;

        let prompt_tokens = generation
            .prompt_tokens
            .unwrap_or_else(|| count_message_tokens(&request.messages));
        let completion_tokens = generation
            .completion_tokens
            .unwrap_or_else(|| count_tokens(&generation.text));
        let usage = Usage::new(prompt_tokens, completion_tokens);

        info!(
            model = %model,
            messages = request.messages.len(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Chat completed"
        );

        Ok(ChatResponse {
            response: generation.text,
            model,
            usage,
            created_at: Utc::now(),
        })
    }

    /// Local readiness check; never calls the provider
    pub fn health(&self) -> HealthStatus {
        let status = if self.provider.is_configured() {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        };

        HealthStatus {
            status,
            model: self.default_model.clone(),
            available_models: self.catalog.names(),
            version: GATEWAY_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Catalog contents in insertion order
    pub fn list_models(&self) -> ModelsResponse {
        ModelsResponse::new(self.catalog.to_model_infos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, Generation, Message, MockProvider, ProviderError};
    use pretty_assertions::assert_eq;

    fn catalog() -> ModelCatalog {
        ModelCatalog::new(vec![
            CatalogEntry::new("fast", "Fast", "quick answers"),
            CatalogEntry::new("smart", "Smart", "careful answers"),
        ])
        .unwrap()
    }

    fn gateway(provider: MockProvider) -> Gateway {
        Gateway::new(catalog(), "fast", Arc::new(provider)).unwrap()
    }

    fn request(messages: Vec<Message>, model: Option<&str>) -> ChatRequest {
        ChatRequest {
            messages,
            model: model.map(String::from),
        }
    }

    /// A configured provider that must never be called
    fn idle_provider() -> MockProvider {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(true);
        provider.expect_generate().never();
        provider
    }

    #[test]
    fn test_default_model_must_be_cataloged() {
        let result = Gateway::new(catalog(), "missing", Arc::new(MockProvider::new()));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_messages_rejected_regardless_of_model() {
        let gateway = gateway(idle_provider());

        for model in [None, Some("fast"), Some("not-a-real-model")] {
            let err = gateway.chat(request(vec![], model)).await.unwrap_err();
            assert!(matches!(err, GatewayError::InvalidRequest(_)), "model {:?}", model);
        }
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let gateway = gateway(idle_provider());
        let messages = vec![Message::user("Hello"), Message::assistant("   \n")];

        let err = gateway.chat(request(messages, None)).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidRequest("Message 1 has empty content".to_string())
        );
    }

    #[tokio::test]
    async fn test_system_only_conversation_rejected() {
        let gateway = gateway(idle_provider());
        let messages = vec![Message::system("Be brief."), Message::system("Use French.")];

        let err = gateway.chat(request(messages, Some("smart"))).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidRequest(
                "At least one user or assistant message is required".to_string()
            )
        );
        assert_eq!(err.code(), "invalid_request");
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let gateway = gateway(idle_provider());

        let err = gateway
            .chat(request(vec![Message::user("Hello")], Some("not-a-real-model")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unknown_model");
    }

    #[tokio::test]
    async fn test_default_model_and_reported_usage() {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(true);
        provider
            .expect_generate()
            .withf(|messages, model| messages.len() == 1 && model == "fast")
            .times(1)
            .returning(|_, _| {
                Ok(Generation {
                    text: "Hi there!".to_string(),
                    prompt_tokens: Some(3),
                    completion_tokens: Some(4),
                })
            });

        let response = gateway(provider)
            .chat(request(vec![Message::user("Hello")], None))
            .await
            .unwrap();

        assert_eq!(response.response, "Hi there!");
        assert_eq!(response.model, "fast");
        assert_eq!(response.usage, Usage::new(3, 4));
        assert_eq!(response.usage.total_tokens, 7);
    }

    #[tokio::test]
    async fn test_usage_estimated_when_not_reported() {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(true);
        provider.expect_generate().returning(|_, _| {
            Ok(Generation {
                text: "Rust is a systems programming language.".to_string(),
                prompt_tokens: None,
                completion_tokens: None,
            })
        });

        let response = gateway(provider)
            .chat(request(vec![Message::user("What is Rust?")], Some("smart")))
            .await
            .unwrap();

        let usage = response.usage;
        assert!(usage.prompt_tokens > 0);
        assert!(usage.completion_tokens > 0);
        assert_eq!(usage.total_tokens, usage.prompt_tokens + usage.completion_tokens);
    }

    #[tokio::test]
    async fn test_provider_errors_are_mapped() {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(true);
        provider
            .expect_generate()
            .withf(|_, model| model == "fast")
            .returning(|_, _| Err(ProviderError::Unavailable("connection refused".to_string())));
        provider
            .expect_generate()
            .withf(|_, model| model == "smart")
            .returning(|_, _| Err(ProviderError::Rejected("quota exceeded".to_string())));
        let gateway = gateway(provider);

        let unavailable = gateway
            .chat(request(vec![Message::user("Hello")], Some("fast")))
            .await
            .unwrap_err();
        assert_eq!(
            unavailable,
            GatewayError::UpstreamUnavailable("connection refused".to_string())
        );

        let rejected = gateway
            .chat(request(vec![Message::user("Hello")], Some("smart")))
            .await
            .unwrap_err();
        assert_eq!(rejected, GatewayError::UpstreamRejected("quota exceeded".to_string()));
    }

    #[tokio::test]
    async fn test_unconfigured_provider() {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(false);
        provider.expect_generate().never();
        let gateway = gateway(provider);

        let err = gateway
            .chat(request(vec![Message::user("Hello")], None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "upstream_unavailable");
        assert_eq!(gateway.health().status, HealthState::Degraded);
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_their_model() {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(true);
        provider.expect_generate().times(2).returning(|messages, model| {
            Ok(Generation {
                text: format!("{} says: {}", model, messages[0].content),
                prompt_tokens: Some(1),
                completion_tokens: Some(1),
            })
        });
        let gateway = Arc::new(gateway(provider));

        let (a, b) = tokio::join!(
            gateway.chat(request(vec![Message::user("one")], Some("fast"))),
            gateway.chat(request(vec![Message::user("two")], Some("smart"))),
        );

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.model, "fast");
        assert_eq!(a.response, "fast says: one");
        assert_eq!(b.model, "smart");
        assert_eq!(b.response, "smart says: two");
    }

    #[test]
    fn test_health_and_models() {
        let mut provider = MockProvider::new();
        provider.expect_is_configured().return_const(true);
        let gateway = gateway(provider);

        let health = gateway.health();
        assert_eq!(health.status, HealthState::Healthy);
        assert_eq!(health.model, "fast");
        assert_eq!(health.available_models, vec!["fast", "smart"]);
        assert_eq!(health.version, "1.0.0");

        let models = gateway.list_models();
        assert_eq!(models.count, 2);
        assert_eq!(models, gateway.list_models());
        assert_eq!(models.available_models[1].name, "smart");
    }
}
