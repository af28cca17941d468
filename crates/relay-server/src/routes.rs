//! Route definitions for the relay API.

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{handlers, health, state::AppState};

/// Create the main router
///
/// When `static_dir` is set, unmatched paths are served from it and `GET /`
/// returns its `index.html`.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/healthz", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/readyz", get(health::readiness_check))
        .route("/live", get(health::liveness_check))
        .route("/livez", get(health::liveness_check))
        // Relay API
        .route("/api/generate-image", post(handlers::generate_image))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}
