//! Repository layer for database operations

pub mod bookings;
pub mod closed_days;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Booking, ClosedDay, ClosedDayType, NewBooking},
};

/// Durable booking records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a confirmed booking unless a confirmed booking already overlaps
    /// `[start_at, end_at)`, in which case `AppError::Conflict` is returned.
    async fn insert_if_free(&self, booking: NewBooking) -> AppResult<Booking>;

    /// Confirmed bookings overlapping `[start, end)`, ordered by start
    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;

    /// Every booking, ordered by start
    async fn list_all(&self) -> AppResult<Vec<Booking>>;
}

/// Append-only register of declared closed days
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClosedDayStore: Send + Sync {
    async fn insert(
        &self,
        date: NaiveDate,
        reason: Option<String>,
        closure_type: ClosedDayType,
    ) -> AppResult<ClosedDay>;

    /// Entries dated within `first..=last`, ordered by date
    async fn list_between(&self, first: NaiveDate, last: NaiveDate) -> AppResult<Vec<ClosedDay>>;

    /// Every entry, ordered by date
    async fn list_all(&self) -> AppResult<Vec<ClosedDay>>;
}

/// Main repository struct holding the per-table repositories
#[derive(Clone)]
pub struct Repository {
    pub bookings: bookings::BookingsRepository,
    pub closed_days: closed_days::ClosedDaysRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            bookings: bookings::BookingsRepository::new(pool.clone()),
            closed_days: closed_days::ClosedDaysRepository::new(pool),
        }
    }
}
