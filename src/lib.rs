use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use domain::tools::ToolRegistry;

/// Process-wide state shared by every session. Built once before the
/// listener accepts connections and never written afterwards.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(http::handlers::MCP_ENDPOINT, get(http::handlers::ws_endpoint))
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
