//! HTTP route definitions.
//!
//! ```text
//! /api/v1
//!   POST /api/v1/form/{domain}         - Process a form for a domain
//!   POST /api/v1/form-detect           - Check URLs for known forms
//!   POST /api/v1/false-positive-forms  - Check a URL against the blacklist
//!
//! /health - Health probe
//! ```

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/form/{domain}", post(handlers::process_form))
        .route("/form-detect", post(handlers::detect_forms))
        .route("/false-positive-forms", post(handlers::false_positive_forms))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
