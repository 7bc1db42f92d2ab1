use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::gateway::GatewayError;

/// HTTP status for each failure kind
pub fn status_for(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::InvalidRequest(_) | GatewayError::UnknownModel(_) => StatusCode::BAD_REQUEST,
        GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        GatewayError::UpstreamRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(self.to_body())).into_response()
    }
}

/// Bodies axum cannot decode are the client's fault, whatever axum's own status says
impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}
