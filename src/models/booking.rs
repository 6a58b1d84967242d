//! Booking models

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Status given to every booking created through the public endpoint
pub const STATUS_CONFIRMED: &str = "confirmed";

/// Persisted booking, keyed by the external calendar event id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub event_id: String,
    pub booking_date: NaiveDate,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub duration_hours: i16,
    pub shooting_type: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Booking about to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub event_id: String,
    pub booking_date: NaiveDate,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub duration: BookingHours,
    pub shooting_type: Option<String>,
    pub message: Option<String>,
}

/// Requested duration as sent by clients: `2`, `"2"` or `"2h"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DurationInput {
    Hours(i64),
    Text(String),
}

/// Booking length in whole hours, at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookingHours(u8);

impl BookingHours {
    pub const MAX: u8 = 24;

    pub fn new(hours: i64) -> Result<Self, String> {
        match u8::try_from(hours) {
            Ok(h) if (1..=Self::MAX).contains(&h) => Ok(Self(h)),
            _ => Err(format!(
                "Duration must be between 1 and {} hours",
                Self::MAX
            )),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.0))
    }
}

impl TryFrom<&DurationInput> for BookingHours {
    type Error = String;

    fn try_from(input: &DurationInput) -> Result<Self, Self::Error> {
        match input {
            DurationInput::Hours(h) => BookingHours::new(*h),
            DurationInput::Text(text) => {
                let lowered = text.trim().to_ascii_lowercase();
                let digits = ["hours", "hour", "h"]
                    .iter()
                    .find_map(|suffix| lowered.strip_suffix(suffix))
                    .unwrap_or(&lowered)
                    .trim();
                let hours = digits
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid duration: {}", text))?;
                BookingHours::new(hours)
            }
        }
    }
}

impl std::fmt::Display for BookingHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.0)
    }
}

/// Create booking request. Every field is optional at the wire level so that
/// missing ones are reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    /// Booking date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Slot start time (HH:MM)
    pub time_slot: Option<String>,
    /// Duration in hours
    pub duration: Option<DurationInput>,
    #[validate(length(min = 1, message = "Customer name must not be empty"))]
    pub customer_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    #[validate(length(min = 3, message = "Phone number is too short"))]
    pub customer_phone: Option<String>,
    pub shooting_type: Option<String>,
    pub message: Option<String>,
}

/// Payload returned once a booking is confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    /// External calendar event id
    pub id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    /// Hours
    pub duration: u8,
    pub customer_name: String,
}
