use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::gateway::{Gateway, GatewayError};
use crate::models::{ChatRequest, ChatResponse, HealthStatus, ModelsResponse};

/// Build the HTTP surface around a shared gateway
pub fn router(gateway: Arc<Gateway>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/models", get(list_models))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(gateway)
}

async fn chat(
    State(gateway): State<Arc<Gateway>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let Json(request) = payload?;
    let response = gateway.chat(request).await?;
    Ok(Json(response))
}

async fn health(State(gateway): State<Arc<Gateway>>) -> Json<HealthStatus> {
    Json(gateway.health())
}

async fn list_models(State(gateway): State<Arc<Gateway>>) -> Json<ModelsResponse> {
    Json(gateway.list_models())
}
