//! Router configuration for the HTTP API.
//!
//! This module sets up all routes and middleware (CORS, tracing) and creates
//! the axum router ready for serving.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The API is read from browser pages served elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/incidents", get(handlers::list_incidents))
        .route("/new-incident", post(handlers::create_incident))
        .route("/remove-incident", delete(handlers::remove_incident))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
