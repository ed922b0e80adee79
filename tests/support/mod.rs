//! Shared helpers: serve a router on an ephemeral local port.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use nova_tasks::config::{ApiConfig, StubConfig};
use nova_tasks::stub::{build_router, StubState};

/// Serve `app` on 127.0.0.1:<random>; returns the base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

pub async fn serve_stub(questions_per_interview: u32) -> String {
    let state = Arc::new(StubState::new(&StubConfig { port: 0, questions_per_interview }));
    serve(build_router(state)).await
}

pub fn api_config(base_url: &str, timeout_secs: u64) -> ApiConfig {
    ApiConfig { base_url: base_url.to_string(), timeout_secs, ..ApiConfig::default() }
}
