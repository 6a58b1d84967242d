//! API integration tests
//!
//! The router runs in-process on top of in-memory collaborators.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Europe::Rome;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

use studio_booking_server::{
    api,
    calendar::{CalendarProvider, NewCalendarEvent},
    config::{
        AppConfig, CalendarConfig, DatabaseConfig, EmailConfig, LoggingConfig, ServerConfig,
        StudioConfig,
    },
    models::{Booking, BusyInterval, ClosedDay, ClosedDayType, NewBooking},
    repository::{BookingStore, ClosedDayStore},
    services::{
        closure,
        email::{Notification, Notifier},
        slots::{local_date, local_instant},
        Services, StudioSettings,
    },
    AppError, AppResult, AppState,
};

// ---------------------------------------------------------------------------
// In-memory collaborators
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeCalendar {
    events: Mutex<Vec<BusyInterval>>,
    next_id: AtomicUsize,
}

impl FakeCalendar {
    fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn list_busy(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BusyInterval>> {
        let mut busy: Vec<BusyInterval> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.overlaps(start, end))
            .cloned()
            .collect();
        busy.sort_by_key(|b| b.start);
        Ok(busy)
    }

    async fn create_event(&self, event: NewCalendarEvent) -> AppResult<String> {
        let id = format!("evt-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.events
            .lock()
            .unwrap()
            .push(BusyInterval::new(event.start, event.end).with_event_id(id.clone()));
        Ok(id)
    }

    async fn delete_event(&self, event_id: &str) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .retain(|e| e.event_id.as_deref() != Some(event_id));
        Ok(())
    }
}

#[derive(Default)]
struct FakeBookings {
    rows: Mutex<Vec<Booking>>,
    broken: bool,
}

#[async_trait]
impl BookingStore for FakeBookings {
    async fn insert_if_free(&self, booking: NewBooking) -> AppResult<Booking> {
        if self.broken {
            return Err(AppError::Internal("disk full".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|b| b.start_at < booking.end_at && booking.start_at < b.end_at)
        {
            return Err(AppError::Conflict("taken".to_string()));
        }
        let row = Booking {
            event_id: booking.event_id,
            booking_date: booking.booking_date,
            start_at: booking.start_at,
            end_at: booking.end_at,
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            customer_phone: booking.customer_phone,
            duration_hours: i16::from(booking.duration.get()),
            shooting_type: booking.shooting_type,
            message: booking.message,
            status: "confirmed".to_string(),
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.start_at < end && start < b.end_at)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|b| b.start_at);
        Ok(rows)
    }
}

#[derive(Default)]
struct FakeClosedDays {
    rows: Mutex<Vec<ClosedDay>>,
}

#[async_trait]
impl ClosedDayStore for FakeClosedDays {
    async fn insert(
        &self,
        date: NaiveDate,
        reason: Option<String>,
        closure_type: ClosedDayType,
    ) -> AppResult<ClosedDay> {
        let row = ClosedDay {
            id: uuid::Uuid::new_v4(),
            date,
            reason,
            closure_type,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_between(&self, first: NaiveDate, last: NaiveDate) -> AppResult<Vec<ClosedDay>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| first <= c.date && c.date <= last)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<ClosedDay>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct FakeNotifier {
    sent: Mutex<Vec<Notification>>,
    broken: bool,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, notification: &Notification) -> AppResult<()> {
        if self.broken {
            return Err(AppError::Email("smtp down".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct TestApp {
    router: Router,
    calendar: Arc<FakeCalendar>,
    bookings: Arc<FakeBookings>,
    notifier: Arc<FakeNotifier>,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        logging: LoggingConfig::default(),
        email: EmailConfig::default(),
        calendar: CalendarConfig::default(),
        studio: StudioConfig::default(),
    }
}

fn build_app(bookings: FakeBookings, notifier: FakeNotifier) -> TestApp {
    let calendar = Arc::new(FakeCalendar::default());
    let bookings = Arc::new(bookings);
    let closed_days = Arc::new(FakeClosedDays::default());
    let notifier = Arc::new(notifier);

    let services = Services::new(
        calendar.clone(),
        bookings.clone(),
        closed_days,
        notifier.clone(),
        StudioSettings {
            name: "Studio".to_string(),
            tz: Rome,
            internal_recipient: "bookings@studio.local".to_string(),
        },
    );
    let state = AppState {
        config: Arc::new(test_config()),
        services: Arc::new(services),
    };

    TestApp {
        router: api::create_router(state),
        calendar,
        bookings,
        notifier,
    }
}

fn app() -> TestApp {
    build_app(FakeBookings::default(), FakeNotifier::default())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// A weekday at least a week ahead that no fixed rule closes
fn open_day() -> NaiveDate {
    let mut day = local_date(Rome, Utc::now()) + Days::new(7);
    while closure::is_closed(day, false) {
        day = day + Days::new(1);
    }
    day
}

fn booking_body(date: NaiveDate, slot: &str, duration: Value) -> Value {
    json!({
        "date": date.to_string(),
        "timeSlot": slot,
        "duration": duration,
        "customerName": "Ada Lovelace",
        "customerEmail": "ada@example.com",
        "customerPhone": "+39 333 1234567",
        "shootingType": "portrait"
    })
}

fn slot_availability(body: &Value, time: &str) -> bool {
    body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["time"] == time)
        .unwrap()["available"]
        .as_bool()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = get(&app.router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("Studio"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_month_view_lists_every_day() {
    let app = app();
    let (status, body) = get(&app.router, "/api/calendar/2026/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["month"], "2026-02");
    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 28);
    assert_eq!(days[0]["date"], "2026-02-01");
    assert_eq!(days[27]["date"], "2026-02-28");
    // 1 February 2026 is a Sunday
    assert_eq!(days[0]["status"], "closed");
    assert_eq!(days[1]["status"], "available");
    assert!(days.iter().all(|d| d["busyCount"].as_u64().is_some()));
}

#[tokio::test]
async fn test_month_view_rejects_invalid_month() {
    let app = app();
    for uri in ["/api/calendar/2026/13", "/api/calendar/2026/march"] {
        let (status, body) = get(&app.router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_past_day_has_no_slots() {
    let app = app();
    let (status, body) = get(&app.router, "/api/slots/2020-01-07").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["slots"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_open_day_has_nine_free_slots() {
    let app = app();
    let day = open_day();
    let (status, body) = get(&app.router, &format!("/api/slots/{}", day)).await;

    assert_eq!(status, StatusCode::OK);
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[0]["time"], "09:00");
    assert_eq!(slots[8]["time"], "17:00");
    assert!(slots.iter().all(|s| s["available"] == true));
}

#[tokio::test]
async fn test_invalid_slot_date_is_bad_request() {
    let app = app();
    let (status, body) = get(&app.router, "/api/slots/next-friday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_booking_with_missing_field_has_no_side_effects() {
    let app = app();
    let mut body = booking_body(open_day(), "14:00", json!("2h"));
    body.as_object_mut().unwrap().remove("customerPhone");

    let (status, body) = post(&app.router, "/api/bookings", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required fields");
    assert_eq!(app.calendar.event_count(), 0);
    assert!(app.bookings.rows.lock().unwrap().is_empty());
    assert!(app.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::post("/api/bookings")
        .header("content-type", "application/json")
        .body(Body::from("{\"date\": "))
        .unwrap();
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(app.calendar.event_count(), 0);
}

#[tokio::test]
async fn test_booking_flow() {
    let app = app();
    let day = open_day();

    let (status, body) = post(
        &app.router,
        "/api/bookings",
        booking_body(day, "14:00", json!("2h")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["date"], day.to_string());
    assert_eq!(body["booking"]["timeSlot"], "14:00");
    assert_eq!(body["booking"]["duration"], 2);
    assert_eq!(body["booking"]["customerName"], "Ada Lovelace");
    let event_id = body["booking"]["id"].as_str().unwrap().to_string();

    // Persisted with the local interval 14:00-16:00
    {
        let rows = app.bookings.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_id, event_id);
        assert_eq!(rows[0].start_at, local_instant(Rome, day, NaiveTime::from_hms_opt(14, 0, 0).unwrap()));
        assert_eq!(rows[0].end_at, local_instant(Rome, day, NaiveTime::from_hms_opt(16, 0, 0).unwrap()));
        assert_eq!(rows[0].status, "confirmed");
    }
    assert_eq!(app.calendar.event_count(), 1);
    {
        let sent = app.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].cc, ["bookings@studio.local"]);
    }

    // The day view reflects the booking with half-open bounds
    let (_, slots) = get(&app.router, &format!("/api/slots/{}", day)).await;
    assert!(slot_availability(&slots, "13:00"));
    assert!(!slot_availability(&slots, "14:00"));
    assert!(!slot_availability(&slots, "15:00"));
    assert!(slot_availability(&slots, "16:00"));

    // Same slot again is rejected before touching the calendar
    let (status, body) = post(
        &app.router,
        "/api/bookings",
        booking_body(day, "15:00", json!(1)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(app.calendar.event_count(), 1);
}

#[tokio::test]
async fn test_booking_past_closing_time_is_rejected() {
    let app = app();
    let (status, _) = post(
        &app.router,
        "/api/bookings",
        booking_body(open_day(), "17:00", json!(2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.calendar.event_count(), 0);
}

#[tokio::test]
async fn test_notification_failure_still_confirms() {
    let app = build_app(
        FakeBookings::default(),
        FakeNotifier {
            broken: true,
            ..Default::default()
        },
    );
    let (status, body) = post(
        &app.router,
        "/api/bookings",
        booking_body(open_day(), "10:00", json!(1)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(app.bookings.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_persistence_failure_leaves_no_orphaned_event() {
    let app = build_app(
        FakeBookings {
            broken: true,
            ..Default::default()
        },
        FakeNotifier::default(),
    );
    let (status, body) = post(
        &app.router,
        "/api/bookings",
        booking_body(open_day(), "10:00", json!(1)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(app.calendar.event_count(), 0);
    assert!(app.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_declared_closed_day() {
    let app = app();
    let day = open_day();

    let (status, body) = post(
        &app.router,
        "/api/admin/closed-days",
        json!({ "date": day.to_string(), "reason": "Maintenance", "type": "maintenance" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["closedDay"]["date"], day.to_string());
    assert_eq!(body["closedDay"]["type"], "maintenance");

    // Repeating the declaration appends another row
    let (status, _) = post(
        &app.router,
        "/api/admin/closed-days",
        json!({ "date": day.to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, listed) = get(&app.router, "/api/admin/closed-days").await;
    assert_eq!(listed["closedDays"].as_array().unwrap().len(), 2);

    let (_, slots) = get(&app.router, &format!("/api/slots/{}", day)).await;
    assert_eq!(slots["slots"].as_array().unwrap().len(), 0);

    let (_, month) = get(
        &app.router,
        &format!("/api/calendar/{}/{}", day.format("%Y"), day.format("%-m")),
    )
    .await;
    let entry = month["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["date"] == day.to_string())
        .unwrap()
        .clone();
    assert_eq!(entry["status"], "closed");

    let (status, _) = post(
        &app.router,
        "/api/bookings",
        booking_body(day, "10:00", json!(1)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_closed_day_is_bad_request() {
    let app = app();
    let (status, body) = post(
        &app.router,
        "/api/admin/closed-days",
        json!({ "date": "someday" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = post(&app.router, "/api/admin/closed-days", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_admin_bookings_sorted_by_start() {
    let app = app();
    let day = open_day();

    for slot in ["16:00", "10:00"] {
        let (status, _) = post(
            &app.router,
            "/api/bookings",
            booking_body(day, slot, json!(1)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app.router, "/api/admin/bookings").await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    let first: DateTime<Utc> = serde_json::from_value(bookings[0]["startAt"].clone()).unwrap();
    let second: DateTime<Utc> = serde_json::from_value(bookings[1]["startAt"].clone()).unwrap();
    assert!(first < second);

    let (_, month) = get(
        &app.router,
        &format!("/api/calendar/{}/{}", day.format("%Y"), day.format("%-m")),
    )
    .await;
    let entry = month["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["date"] == day.to_string())
        .unwrap()
        .clone();
    assert_eq!(entry["status"], "occupied");
    assert_eq!(entry["busyCount"], 2);
}
