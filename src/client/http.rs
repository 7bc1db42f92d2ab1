use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::constants::CLIENT_TIMEOUT_SECS;
use crate::models::{ChatRequest, ChatResponse, ErrorBody, HealthStatus, Message, ModelsResponse};

/// Failure talking to a running gateway
#[derive(Error, Debug)]
pub enum ClientError {
    /// The gateway answered with its error body
    #[error("{error}: {detail}")]
    Api {
        status: u16,
        error: String,
        detail: String,
    },

    #[error("Failed to communicate with the gateway: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from the gateway ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

/// HTTP client for the gateway's three operations
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a whole transcript for one turn
    pub async fn chat(
        &self,
        messages: &[Message],
        model: Option<&str>,
    ) -> Result<ChatResponse, ClientError> {
        let request = ChatRequest {
            messages: messages.to_vec(),
            model: model.map(String::from),
        };

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&request)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn models(&self) -> Result<ModelsResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a success body, or surface the gateway's error body verbatim
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(error) => Err(ClientError::Api {
            status: status.as_u16(),
            error: error.error,
            detail: error.detail,
        }),
        Err(_) => Err(ClientError::Unexpected {
            status: status.as_u16(),
            body,
        }),
    }
}
