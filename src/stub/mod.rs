//! Scripted stand-in for the decomposition service.
//!
//! Router assembly: the three project endpoints plus health, CORS, and HTTP
//! tracing. Used by `nova-tasks stub-server` and by the integration tests.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod http;
pub mod script;
pub mod state;

pub use state::StubState;

/// Build the stub router with:
/// - `POST /api/projects/create`
/// - `POST /api/projects/:project_id/answer`
/// - `POST /api/projects/:project_id/generate-tasks`
/// - `GET /api/health`
/// - CORS (allow any origin/method/headers) for browser front ends on another port
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/api/health", get(http::http_health))
        .route("/api/projects/create", post(http::http_create_project))
        .route("/api/projects/:project_id/answer", post(http::http_post_answer))
        .route("/api/projects/:project_id/generate-tasks", post(http::http_generate_tasks))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
