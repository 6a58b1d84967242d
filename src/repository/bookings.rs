//! Bookings repository

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use super::BookingStore;
use crate::{
    error::{AppError, AppResult},
    models::{booking::STATUS_CONFIRMED, Booking, NewBooking},
};

/// Keeps advisory lock keys for bookings apart from any other lock user
const BOOKING_LOCK_NAMESPACE: i64 = 0x5354_0000_0000;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Advisory lock key serializing booking inserts for one studio day
pub(crate) fn day_lock_key(date: NaiveDate) -> i64 {
    BOOKING_LOCK_NAMESPACE + i64::from(date.num_days_from_ce())
}

#[async_trait]
impl BookingStore for BookingsRepository {
    async fn insert_if_free(&self, booking: NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        // Released on commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(day_lock_key(booking.booking_date))
            .execute(&mut *tx)
            .await?;

        let clash: Option<String> = sqlx::query_scalar(
            r#"
            SELECT event_id FROM bookings
            WHERE status = $1 AND start_at < $3 AND end_at > $2
            LIMIT 1
            "#,
        )
        .bind(STATUS_CONFIRMED)
        .bind(booking.start_at)
        .bind(booking.end_at)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(existing) = clash {
            tracing::warn!(
                "Rejecting booking {}: overlaps booking {}",
                booking.event_id,
                existing
            );
            return Err(AppError::Conflict(
                "The selected time slot is no longer available".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                event_id, booking_date, start_at, end_at,
                customer_name, customer_email, customer_phone,
                duration_hours, shooting_type, message, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&booking.event_id)
        .bind(booking.booking_date)
        .bind(booking.start_at)
        .bind(booking.end_at)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(i16::from(booking.duration.get()))
        .bind(&booking.shooting_type)
        .bind(&booking.message)
        .bind(STATUS_CONFIRMED)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE status = $1 AND start_at < $3 AND end_at > $2
            ORDER BY start_at
            "#,
        )
        .bind(STATUS_CONFIRMED)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
