// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::store::HealthStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn HealthStore>,
}

pub fn app(store: Arc<dyn HealthStore>) -> Router {
    let state = AppState { store };
    Router::new()
        .route("/", get(|| async { "Flutter: Hello from Rust healthd!" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/health", get(http::api_health_handler)) // GET /api/health
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
