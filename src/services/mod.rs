//! Business logic services

pub mod availability;
pub mod bookings;
pub mod closed_days;
pub mod closure;
pub mod email;
pub mod slots;

use chrono_tz::Tz;
use std::sync::Arc;

use crate::{
    calendar::CalendarProvider,
    repository::{BookingStore, ClosedDayStore},
};

/// Studio-wide settings used by the booking flow
#[derive(Debug, Clone)]
pub struct StudioSettings {
    pub name: String,
    pub tz: Tz,
    /// Copied on every booking confirmation
    pub internal_recipient: String,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingService,
    pub closed_days: closed_days::ClosedDaysService,
}

impl Services {
    /// Wire the services around the given collaborators
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        booking_store: Arc<dyn BookingStore>,
        closed_day_store: Arc<dyn ClosedDayStore>,
        notifier: Arc<dyn email::Notifier>,
        settings: StudioSettings,
    ) -> Self {
        let availability = availability::AvailabilityService::new(
            calendar.clone(),
            booking_store.clone(),
            closed_day_store.clone(),
            slots::SlotGrid::default(),
            settings.tz,
        );

        Self {
            bookings: bookings::BookingService::new(
                availability.clone(),
                calendar,
                booking_store,
                notifier,
                settings,
            ),
            closed_days: closed_days::ClosedDaysService::new(closed_day_store),
            availability,
        }
    }
}
