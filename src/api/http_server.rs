// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server wiring: router, CORS, application state

use axum::extract::State;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::errors::ApiError;
use super::generate_avatar::generate_avatar_handler;
use crate::config::NodeConfig;
use crate::gemini::GeminiClient;

/// Shared state for all handlers.
///
/// The Gemini client is None when no credential was present at startup; the
/// node still serves /health and CORS preflight, and generation requests
/// fail fast with a configuration error.
#[derive(Clone)]
pub struct AppState {
    pub gemini: Option<Arc<GeminiClient>>,
}

impl AppState {
    pub fn new(gemini: Option<Arc<GeminiClient>>) -> Self {
        Self { gemini }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// Build the application router.
///
/// OPTIONS requests are answered by the CORS layer with the permissive
/// header set before reaching any handler; unsupported methods on / get the
/// JSON 405 via the method-router fallback.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            post(generate_avatar_handler).fallback(method_not_allowed_handler),
        )
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server on the configured port
pub async fn start_server(config: NodeConfig) -> anyhow::Result<()> {
    let gemini = if config.gemini.api_key.is_some() {
        Some(Arc::new(GeminiClient::new(&config.gemini)?))
    } else {
        tracing::warn!(
            "GEMINI_API_KEY is not set; generation requests will fail until configured"
        );
        None
    };

    let app = create_app(AppState::new(gemini));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Avatar API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match &state.gemini {
        Some(_) => HealthResponse {
            status: "healthy".to_string(),
            issues: None,
        },
        None => HealthResponse {
            status: "degraded".to_string(),
            issues: Some(vec!["GEMINI_API_KEY is not configured".to_string()]),
        },
    };
    Json(response)
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
