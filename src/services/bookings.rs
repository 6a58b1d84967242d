//! Booking transaction
//!
//! A booking is validated, re-checked against fresh availability, written to
//! the external calendar, persisted, and finally announced by email. Each
//! step runs once and a failure stops the sequence. When persistence fails
//! after the calendar event was created, the event is deleted again.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use validator::Validate;

use super::{
    availability::AvailabilityService,
    email::{booking_confirmation, ConfirmationDetails, Notification, Notifier},
    slots::{format_slot, local_instant, parse_date, parse_slot, SlotGrid},
    StudioSettings,
};
use crate::{
    calendar::{Attendee, CalendarProvider, NewCalendarEvent},
    error::{AppError, AppResult},
    models::{Booking, BookingConfirmation, BookingHours, CreateBooking, NewBooking},
    repository::BookingStore,
};

pub const MISSING_FIELDS: &str = "Missing required fields";

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub date: NaiveDate,
    pub slot: NaiveTime,
    pub hours: BookingHours,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shooting_type: Option<String>,
    pub message: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn optional(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_string)
}

/// Check presence and format of every field. Performs no I/O.
pub fn validate_request(req: &CreateBooking, grid: &SlotGrid) -> AppResult<ValidBooking> {
    let (Some(date), Some(slot), Some(duration), Some(name), Some(email), Some(phone)) = (
        present(&req.date),
        present(&req.time_slot),
        req.duration.as_ref(),
        present(&req.customer_name),
        present(&req.customer_email),
        present(&req.customer_phone),
    ) else {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    };

    let trimmed = CreateBooking {
        customer_name: Some(name.to_string()),
        customer_email: Some(email.to_string()),
        customer_phone: Some(phone.to_string()),
        ..req.clone()
    };
    trimmed
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let date = parse_date(date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", date)))?;
    let slot_time = parse_slot(slot)
        .filter(|t| grid.contains(*t))
        .ok_or_else(|| AppError::Validation(format!("Invalid time slot: {}", slot)))?;
    let hours = BookingHours::try_from(duration).map_err(AppError::Validation)?;

    if u32::from(hours.get()) > grid.hours_until_close(slot_time) {
        return Err(AppError::Validation(format!(
            "A {} booking starting at {} ends after closing time ({:02}:00)",
            hours,
            format_slot(slot_time),
            grid.closing_hour
        )));
    }

    Ok(ValidBooking {
        date,
        slot: slot_time,
        hours,
        customer_name: name.to_string(),
        customer_email: email.to_string(),
        customer_phone: phone.to_string(),
        shooting_type: optional(&req.shooting_type),
        message: optional(&req.message),
    })
}

#[derive(Clone)]
pub struct BookingService {
    availability: AvailabilityService,
    calendar: Arc<dyn CalendarProvider>,
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
    settings: StudioSettings,
}

impl BookingService {
    pub fn new(
        availability: AvailabilityService,
        calendar: Arc<dyn CalendarProvider>,
        store: Arc<dyn BookingStore>,
        notifier: Arc<dyn Notifier>,
        settings: StudioSettings,
    ) -> Self {
        Self {
            availability,
            calendar,
            store,
            notifier,
            settings,
        }
    }

    /// Book a slot
    pub async fn create(&self, req: &CreateBooking) -> AppResult<BookingConfirmation> {
        self.create_on(req, self.availability.today()).await
    }

    /// Same as [`Self::create`] with an explicit current date
    pub async fn create_on(
        &self,
        req: &CreateBooking,
        today: NaiveDate,
    ) -> AppResult<BookingConfirmation> {
        let booking = validate_request(req, &self.availability.grid())?;
        let start = local_instant(self.settings.tz, booking.date, booking.slot);
        let end = start + booking.hours.as_delta();

        self.ensure_bookable(&booking, today, start, end).await?;

        let event_id = self
            .calendar
            .create_event(self.calendar_event(&booking, start, end))
            .await?;
        tracing::info!(
            "Calendar event {} created for {} {}",
            event_id,
            booking.date,
            format_slot(booking.slot)
        );

        let record = NewBooking {
            event_id: event_id.clone(),
            booking_date: booking.date,
            start_at: start,
            end_at: end,
            customer_name: booking.customer_name.clone(),
            customer_email: booking.customer_email.clone(),
            customer_phone: booking.customer_phone.clone(),
            duration: booking.hours,
            shooting_type: booking.shooting_type.clone(),
            message: booking.message.clone(),
        };

        if let Err(e) = self.store.insert_if_free(record).await {
            self.discard_event(&event_id).await;
            return Err(e);
        }

        self.notify(&booking).await;

        Ok(BookingConfirmation {
            id: event_id,
            date: booking.date,
            time_slot: format_slot(booking.slot),
            duration: booking.hours.get(),
            customer_name: booking.customer_name,
        })
    }

    /// Every persisted booking, ordered by start
    pub async fn list_all(&self) -> AppResult<Vec<Booking>> {
        self.store.list_all().await
    }

    /// Re-check the request against current state before any write
    async fn ensure_bookable(
        &self,
        booking: &ValidBooking,
        today: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<()> {
        if booking.date < today {
            return Err(AppError::Conflict(format!(
                "Cannot book {}: the date is in the past",
                booking.date
            )));
        }
        if self.availability.is_closed(booking.date).await? {
            return Err(AppError::Conflict(format!(
                "The studio is closed on {}",
                booking.date
            )));
        }
        let busy = self.availability.busy_between(start, end).await?;
        if busy.iter().any(|b| b.overlaps(start, end)) {
            return Err(AppError::Conflict(
                "The selected time slot is no longer available".to_string(),
            ));
        }
        Ok(())
    }

    fn calendar_event(
        &self,
        booking: &ValidBooking,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> NewCalendarEvent {
        let summary = match &booking.shooting_type {
            Some(kind) => format!("Photo shoot ({}) - {}", kind, booking.customer_name),
            None => format!("Photo shoot - {}", booking.customer_name),
        };
        let description = format!(
            "Customer: {}\nEmail: {}\nPhone: {}\nDuration: {}\nType: {}\nNotes: {}",
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.hours,
            booking.shooting_type.as_deref().unwrap_or("-"),
            booking.message.as_deref().unwrap_or("-"),
        );

        NewCalendarEvent {
            summary,
            description,
            start,
            end,
            timezone: self.settings.tz.name().to_string(),
            attendees: vec![Attendee {
                email: booking.customer_email.clone(),
                display_name: Some(booking.customer_name.clone()),
            }],
        }
    }

    /// Delete the calendar event of a booking that could not be persisted
    async fn discard_event(&self, event_id: &str) {
        match self.calendar.delete_event(event_id).await {
            Ok(()) => tracing::warn!("Booking not persisted, calendar event {} removed", event_id),
            Err(e) => tracing::error!(
                "Booking not persisted and calendar event {} could not be removed: {}",
                event_id,
                e
            ),
        }
    }

    /// Best effort: failures are logged and never fail the booking
    async fn notify(&self, booking: &ValidBooking) {
        let date = booking.date.to_string();
        let time_slot = format_slot(booking.slot);
        let (subject, html) = booking_confirmation(&ConfirmationDetails {
            studio_name: &self.settings.name,
            customer_name: &booking.customer_name,
            date: &date,
            time_slot: &time_slot,
            duration_hours: booking.hours.get(),
            shooting_type: booking.shooting_type.as_deref(),
        });

        let notification = Notification {
            to: booking.customer_email.clone(),
            cc: vec![self.settings.internal_recipient.clone()],
            subject,
            html,
        };

        if let Err(e) = self.notifier.send(&notification).await {
            tracing::warn!(
                "Booking confirmation to {} not sent: {}",
                booking.customer_email,
                e
            );
        }
    }
}
