use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, create_booking, list_current_user_bookings, list_spot_bookings};

/// Creates the API router with all booking endpoints
///
/// - GET  /bookings/current - Bookings made by the requester
/// - GET  /spots/:spot_id/bookings - Bookings on a spot (shape depends on ownership)
/// - POST /spots/:spot_id/bookings - Book a spot
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings/current", get(list_current_user_bookings))
        .route(
            "/spots/:spot_id/bookings",
            get(list_spot_bookings).post(create_booking),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
