use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BOOKINGS_TABLE: &str = "bookings";

/// Longest service a single booking may reserve: one week.
pub const MAX_SERVICE_MINUTES: i64 = 7 * 24 * 60;

/// A booking row as stored by the data service. Only the fields needed for
/// availability decisions are typed; the full row is passed through to clients
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub booking_time: String,
    pub service_duration: i64,
    #[serde(default)]
    pub status: Option<String>,
}

impl Booking {
    /// Records with an unknown or missing status still occupy the mechanic.
    pub fn is_active(&self) -> bool {
        match self.status.as_deref().and_then(BookingStatus::parse) {
            Some(status) => status.is_active(),
            None => true,
        }
    }

    /// `None` when the time does not parse or the end is not representable.
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = parse_booking_time(&self.booking_time)?;
        Some((start, end_of(start, self.service_duration)?))
    }
}

/// `start + minutes`, or `None` on overflow.
pub fn end_of(start: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    start.checked_add_signed(Duration::try_minutes(minutes)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub id: String,
    pub user_id: String,
    pub mechanic_id: String,
    pub booking_time: String,
    pub service_duration: i64,
    pub status: BookingStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const INACTIVE: [BookingStatus; 2] = [BookingStatus::Cancelled, BookingStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "accepted" => Some(BookingStatus::Accepted),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !Self::INACTIVE.contains(self)
    }
}

/// Accepts RFC 3339 timestamps (any offset, normalised to UTC) and naive
/// ISO-8601 timestamps, which are read as UTC.
pub fn parse_booking_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
