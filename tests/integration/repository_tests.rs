//! Booking store tests against PostgreSQL
//!
//! These tests require a running database reachable through DATABASE_URL.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Europe::Rome;
use sqlx::{postgres::PgPoolOptions, PgPool};

use studio_booking_server::{
    models::{BookingHours, NewBooking},
    repository::{bookings::BookingsRepository, BookingStore},
    services::slots::local_instant,
    AppError,
};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Fresh repository with no bookings on `date`
async fn repository_for(date: NaiveDate) -> BookingsRepository {
    let pool = pool().await;
    sqlx::query("DELETE FROM bookings WHERE booking_date = $1")
        .bind(date)
        .execute(&pool)
        .await
        .unwrap();
    BookingsRepository::new(pool)
}

fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    local_instant(Rome, date, NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
}

fn new_booking(event_id: &str, date: NaiveDate, hour: u32, hours: i64) -> NewBooking {
    let duration = BookingHours::new(hours).unwrap();
    let start_at = at(date, hour);
    NewBooking {
        event_id: format!("{}-{}", event_id, uuid::Uuid::new_v4()),
        booking_date: date,
        start_at,
        end_at: start_at + duration.as_delta(),
        customer_name: "Ada Lovelace".to_string(),
        customer_email: "ada@example.com".to_string(),
        customer_phone: "+39 333 1234567".to_string(),
        duration,
        shooting_type: Some("portrait".to_string()),
        message: None,
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_overlapping_insert_is_rejected() {
    let date = NaiveDate::from_ymd_opt(2099, 3, 2).unwrap();
    let repo = repository_for(date).await;

    let first = repo
        .insert_if_free(new_booking("evt-a", date, 14, 2))
        .await
        .unwrap();
    assert_eq!(first.start_at, at(date, 14));
    assert_eq!(first.end_at, at(date, 16));
    assert_eq!(first.status, "confirmed");

    // 15:00-16:00 lies inside 14:00-16:00
    let result = repo.insert_if_free(new_booking("evt-b", date, 15, 1)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // 13:00-15:00 straddles the start
    let result = repo.insert_if_free(new_booking("evt-c", date, 13, 2)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let day = repo.list_between(at(date, 0), at(date, 23)).await.unwrap();
    assert_eq!(day.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_adjacent_inserts_are_accepted() {
    let date = NaiveDate::from_ymd_opt(2099, 3, 3).unwrap();
    let repo = repository_for(date).await;

    repo.insert_if_free(new_booking("evt-a", date, 14, 2))
        .await
        .unwrap();
    // Starts exactly where the first ends
    repo.insert_if_free(new_booking("evt-b", date, 16, 1))
        .await
        .unwrap();
    // Ends exactly where the first starts
    repo.insert_if_free(new_booking("evt-c", date, 12, 2))
        .await
        .unwrap();

    let day = repo.list_between(at(date, 0), at(date, 23)).await.unwrap();
    let starts: Vec<DateTime<Utc>> = day.iter().map(|b| b.start_at).collect();
    assert_eq!(starts, [at(date, 12), at(date, 14), at(date, 16)]);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_inserts_for_same_slot() {
    let date = NaiveDate::from_ymd_opt(2099, 3, 4).unwrap();
    let repo = repository_for(date).await;

    let (a, b) = tokio::join!(
        repo.insert_if_free(new_booking("evt-a", date, 10, 2)),
        repo.insert_if_free(new_booking("evt-b", date, 11, 1)),
    );

    let results = [a, b];
    let stored = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(stored, 1);
    assert_eq!(conflicts, 1);

    let day = repo.list_between(at(date, 0), at(date, 23)).await.unwrap();
    assert_eq!(day.len(), 1);
}
