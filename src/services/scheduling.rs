use chrono::{DateTime, Utc};

use crate::models::{end_of, Booking, BookingStatus, BOOKINGS_TABLE};
use crate::services::store::{DataStore, Query};

/// True when the requested window intersects any active booking. Windows that
/// only touch at an endpoint do not overlap. A requested window whose end is
/// not representable is reported as overlapping.
pub fn overlaps_any(start: DateTime<Utc>, duration_minutes: i64, existing: &[Booking]) -> bool {
    let Some(proposed_end) = end_of(start, duration_minutes) else {
        tracing::warn!(%start, duration_minutes, "requested booking window out of range");
        return true;
    };

    existing.iter().filter(|b| b.is_active()).any(|booking| {
        let Some((booking_start, booking_end)) = booking.window() else {
            tracing::warn!(
                booking_id = ?booking.id,
                booking_time = %booking.booking_time,
                "skipping booking with unusable time window"
            );
            return false;
        };
        start < booking_end && proposed_end > booking_start
    })
}

/// Checks the mechanic's active bookings for a clash with the requested slot.
///
/// Fails open: if the bookings cannot be fetched or decoded the slot is
/// reported as available, so an outage of the data service never blocks new
/// bookings.
pub async fn is_mechanic_available(
    store: &dyn DataStore,
    mechanic_id: &str,
    start: DateTime<Utc>,
    duration_minutes: i64,
) -> bool {
    let inactive = BookingStatus::INACTIVE.map(|s| s.as_str());
    let query = Query::table(BOOKINGS_TABLE)
        .eq("mechanic_id", mechanic_id)
        .not_in("status", &inactive);

    let rows = match store.select(&query).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, mechanic_id, "booking lookup failed, treating slot as available");
            return true;
        }
    };

    let bookings: Vec<Booking> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(b) => Some(b),
            Err(e) => {
                tracing::warn!(error = %e, mechanic_id, "skipping malformed booking row");
                None
            }
        })
        .collect();

    !overlaps_any(start, duration_minutes, &bookings)
}
