pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/chat", post(handlers::assistant::chat))
        .route("/analyze-image", post(handlers::assistant::analyze_image))
        .route("/admin-ai", post(handlers::assistant::admin_insights))
        .route("/mechanic-ai", post(handlers::assistant::mechanic_ai))
        .route("/repair-assistant", post(handlers::assistant::repair_assistant))
        .route("/chatbot-booking", post(handlers::assistant::booking_chat))
        .route("/customer-support", post(handlers::assistant::customer_support))
        .route("/search-mechanics", get(handlers::mechanics::search_mechanics))
        .route("/nearby-mechanics", get(handlers::mechanics::nearby_mechanics))
        .route("/create-booking", post(handlers::bookings::create_booking))
        .route(
            "/update-booking-status",
            put(handlers::bookings::update_booking_status),
        )
        .route("/get-booking/:booking_id", get(handlers::bookings::get_booking))
        .route(
            "/mechanic-profile",
            put(handlers::profiles::update_mechanic_profile),
        )
        .route(
            "/mechanic-profile/:mechanic_id",
            get(handlers::profiles::get_mechanic_profile),
        )
        .route(
            "/customer-profile",
            put(handlers::profiles::update_customer_profile),
        )
        .route(
            "/customer-profile/:user_id",
            get(handlers::profiles::get_customer_profile),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
