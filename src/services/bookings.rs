use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    parse_booking_time, BookingStatus, NewBooking, BOOKINGS_TABLE, MAX_SERVICE_MINUTES,
};
use crate::services::scheduling::is_mechanic_available;
use crate::services::store::{Query, WriteConflict};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub user_id: String,
    pub mechanic_id: String,
    /// ISO-8601 start time.
    pub booking_time: String,
    /// Minutes.
    pub service_duration: i64,
    #[serde(default)]
    pub payment_info: Value,
}

fn unavailable() -> AppError {
    AppError::Unavailable("Mechanic is not available at the requested time.".to_string())
}

pub async fn create_booking(state: &AppState, req: BookingRequest) -> Result<Value, AppError> {
    let start = parse_booking_time(&req.booking_time).ok_or_else(|| {
        AppError::BadRequest(format!("invalid booking_time: {}", req.booking_time))
    })?;
    if !(1..=MAX_SERVICE_MINUTES).contains(&req.service_duration) {
        return Err(AppError::BadRequest(format!(
            "service_duration must be between 1 and {MAX_SERVICE_MINUTES} minutes"
        )));
    }

    if !is_mechanic_available(state.store.as_ref(), &req.mechanic_id, start, req.service_duration).await {
        return Err(unavailable());
    }

    let approved = state
        .payments
        .charge(&req.payment_info)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %req.user_id, "payment gateway error");
            AppError::PaymentDeclined
        })?;
    if !approved {
        return Err(AppError::PaymentDeclined);
    }

    let booking = NewBooking {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: req.user_id.clone(),
        mechanic_id: req.mechanic_id.clone(),
        booking_time: req.booking_time.clone(),
        service_duration: req.service_duration,
        status: BookingStatus::Pending,
        created_at: Utc::now().to_rfc3339(),
    };
    let row = serde_json::to_value(&booking).map_err(|e| AppError::store(e.into()))?;

    let created = state
        .store
        .insert(BOOKINGS_TABLE, row)
        .await
        .map_err(|e| {
            // A concurrent request took the slot after our availability check.
            if e.downcast_ref::<WriteConflict>().is_some() {
                tracing::warn!(error = %e, mechanic_id = %req.mechanic_id, "booking insert conflicted");
                unavailable()
            } else {
                AppError::store(e)
            }
        })?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Store("booking insert returned no rows".to_string()))?;

    tracing::info!(
        booking_id = %booking.id,
        mechanic_id = %req.mechanic_id,
        user_id = %req.user_id,
        "booking created"
    );

    let message = format!(
        "New booking requested by user {} at {} for {} minutes.",
        req.user_id, req.booking_time, req.service_duration
    );
    if let Err(e) = state.notifier.notify(&req.mechanic_id, &message).await {
        tracing::warn!(error = %e, mechanic_id = %req.mechanic_id, "failed to notify mechanic");
    }

    Ok(created)
}

pub async fn update_booking_status(
    state: &AppState,
    booking_id: &str,
    new_status: &str,
) -> Result<Value, AppError> {
    let status = BookingStatus::parse(new_status).ok_or_else(|| {
        AppError::BadRequest(format!(
            "invalid status '{new_status}', expected one of: pending, accepted, in_progress, completed, cancelled"
        ))
    })?;

    let updated = state
        .store
        .update(
            &Query::table(BOOKINGS_TABLE).eq("id", booking_id),
            serde_json::json!({ "status": status.as_str() }),
        )
        .await
        .map_err(AppError::store)?;

    let booking = updated
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    tracing::info!(booking_id, status = status.as_str(), "booking status updated");
    Ok(booking)
}

pub async fn get_booking(state: &AppState, booking_id: &str) -> Result<Value, AppError> {
    state
        .store
        .select(&Query::table(BOOKINGS_TABLE).eq("id", booking_id))
        .await
        .map_err(AppError::store)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))
}
