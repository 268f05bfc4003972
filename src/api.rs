//! HTTP surface for the chat backend.
//!
//! - `GET /api/health` – index readiness, version and model name.
//! - `POST /api/chat` – answer a question, optionally with user context and a mode.
//!
//! Handlers only translate between JSON and [`ChatService`]; the CLI drives the
//! same service, so behavior matches across interfaces.

use crate::config::ServerConfig;
use crate::error::RagError;
use crate::service::ChatService;
use crate::types::{ChatRequest, ChatResponse, HealthResponse};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Generic message returned for failures that are not the caller's fault
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to process chat request";

/// Build the router exposing the health and chat endpoints.
pub fn create_router(service: Arc<ChatService>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl-C.
pub async fn serve(service: Arc<ChatService>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router(service, &config.cors_origins);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Chat API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
}

/// Browser origins from config; `*` allows any origin (without credentials).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.iter().any(|origin| origin.trim() == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

async fn health(State(service): State<Arc<ChatService>>) -> Json<HealthResponse> {
    Json(service.health().await)
}

async fn chat(
    State(service): State<Arc<ChatService>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    Ok(Json(service.chat(request).await?))
}

/// Maps service failures onto status codes; internals stay in the logs.
struct AppError(RagError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.is_user_error() {
            let body = Json(json!({ "detail": self.0.to_string() }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        tracing::error!(error = %self.0, "Chat request failed");
        let body = Json(json!({ "detail": INTERNAL_ERROR_MESSAGE }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<RagError> for AppError {
    fn from(inner: RagError) -> Self {
        Self(inner)
    }
}
