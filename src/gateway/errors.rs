use thiserror::Error;

use crate::models::{ErrorBody, ProviderError};

/// Failure taxonomy of the chat gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Client-supplied data is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested model is not in the catalog
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Transient provider or network failure
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Provider declined the request (content policy, quota)
    #[error("Upstream rejected request: {0}")]
    UpstreamRejected(String),
}

impl GatewayError {
    /// Stable machine-readable code, used as the `error` field of error bodies
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::UnknownModel(_) => "unknown_model",
            GatewayError::UpstreamUnavailable(_) => "upstream_unavailable",
            GatewayError::UpstreamRejected(_) => "upstream_rejected",
        }
    }

    /// Human-readable explanation, used as the `detail` field
    pub fn detail(&self) -> &str {
        match self {
            GatewayError::InvalidRequest(detail)
            | GatewayError::UnknownModel(detail)
            | GatewayError::UpstreamUnavailable(detail)
            | GatewayError::UpstreamRejected(detail) => detail,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code().to_string(),
            detail: self.detail().to_string(),
        }
    }
}

impl From<ProviderError> for GatewayError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unavailable(detail) => GatewayError::UpstreamUnavailable(detail),
            ProviderError::Rejected(detail) => GatewayError::UpstreamRejected(detail),
        }
    }
}
