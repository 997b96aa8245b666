use axum::{middleware, routing::get, Json, Router};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;

use crate::errors::error_boundary;
use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Wrap service routes with the shared layers: error translation first,
/// request tracing outermost.
pub fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR));

    routes
        .layer(middleware::from_fn(error_boundary))
        .layer(trace)
        .with_state(state)
}

/// Base router: health check plus the shared layers.
pub fn build_router(state: AppState) -> Router {
    with_layers(Router::new().route("/health", get(health)), state)
}
