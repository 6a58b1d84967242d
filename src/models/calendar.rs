//! Derived calendar views (day status, slot availability, busy intervals)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a calendar day, computed at query time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Available,
    Occupied,
    Closed,
}

/// One day of a month view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    /// Busy intervals starting on this date (informational)
    pub busy_count: u32,
}

/// One bookable start time of a day view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotAvailability {
    /// Local start time (HH:MM)
    pub time: String,
    pub available: bool,
    /// Absolute start instant
    pub datetime: DateTime<Utc>,
}

/// Half-open range `[start, end)` during which the studio is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval {
    /// Calendar event this interval comes from, when known
    pub event_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            event_id: None,
            start,
            end,
        }
    }

    pub fn with_event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    /// True if `instant` lies in `[start, end)`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// True if this interval shares any instant with `[start, end)`
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}
