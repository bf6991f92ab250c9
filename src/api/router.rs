use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, loan_endpoint, service_definition};

/// Creates the router for the loan service
///
/// The envelope endpoint is served on both /ws and /loan for
/// compatibility with existing clients; GET on either path returns
/// the service definition document.
///
/// Browser clients call this service cross-origin and send the
/// SOAPAction header, so CORS stays wide open.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Envelope endpoint (POST) and service definition (GET)
        .route("/ws", get(service_definition).post(loan_endpoint))
        .route("/loan", get(service_definition).post(loan_endpoint))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
