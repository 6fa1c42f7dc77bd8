//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET    /health, /                       - Health check
/// - GET    /api/v1/pricing                  - Product, shipping and method options
/// - POST   /api/v1/summary                  - Stateless order summary
/// - POST   /api/v1/sessions                 - Open a checkout session
/// - GET    /api/v1/sessions/{id}            - Session view-model
/// - POST   /api/v1/sessions/{id}/actions    - Dispatch a UI action
/// - DELETE /api/v1/sessions/{id}            - Close a session
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/pricing", get(handlers::get_pricing))
        .route("/summary", post(handlers::compute_summary))
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{session_id}/actions", post(handlers::dispatch_action));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
