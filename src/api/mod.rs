//! API handlers for the studio booking REST endpoints

pub mod admin;
pub mod bookings;
pub mod calendar;
pub mod health;
pub mod openapi;
pub mod slots;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health::health_check))
        // Availability
        .route("/calendar/:year/:month", get(calendar::get_month))
        .route("/slots/:date", get(slots::get_day_slots))
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        // Admin
        .route("/admin/bookings", get(admin::list_bookings))
        .route(
            "/admin/closed-days",
            get(admin::list_closed_days).post(admin::create_closed_day),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
