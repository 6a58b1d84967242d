//! External calendar integration
//!
//! The studio calendar lives in an external provider. The engine only needs
//! three things from it: the busy intervals in a range, a way to create the
//! event backing a booking, and a way to remove that event again when the
//! booking cannot be persisted.

pub mod google;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{error::AppResult, models::BusyInterval};

/// Event to create for a confirmed booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone the event is displayed in
    pub timezone: String,
    pub attendees: Vec<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub email: String,
    pub display_name: Option<String>,
}

/// Busy-interval source and event sink
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Busy intervals of events overlapping `[start, end)`, ordered by start.
    /// All-day events contribute nothing.
    async fn list_busy(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BusyInterval>>;

    /// Create an event and return the provider-assigned id
    async fn create_event(&self, event: NewCalendarEvent) -> AppResult<String>;

    /// Delete a previously created event
    async fn delete_event(&self, event_id: &str) -> AppResult<()>;
}
