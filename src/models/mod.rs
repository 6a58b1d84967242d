//! Data models for the studio booking server

pub mod booking;
pub mod calendar;
pub mod closed_day;

// Re-export commonly used types
pub use booking::{Booking, BookingConfirmation, BookingHours, CreateBooking, NewBooking};
pub use calendar::{BusyInterval, CalendarDay, DayStatus, SlotAvailability};
pub use closed_day::{ClosedDay, ClosedDayType, CreateClosedDay};
