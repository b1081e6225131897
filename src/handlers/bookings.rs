use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::services::bookings::{self, BookingRequest};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingResponse {
    pub booking: Value,
}

// POST /create-booking
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = bookings::create_booking(&state, req).await?;
    Ok(Json(BookingResponse { booking }))
}

// PUT /update-booking-status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub booking_id: String,
    pub new_status: String,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = bookings::update_booking_status(&state, &req.booking_id, &req.new_status).await?;
    Ok(Json(BookingResponse { booking }))
}

// GET /get-booking/:booking_id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = bookings::get_booking(&state, &booking_id).await?;
    Ok(Json(BookingResponse { booking }))
}
