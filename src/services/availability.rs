//! Availability engine: month view and day view
//!
//! Combines the closure policy, the declared closures, the external calendar
//! and the persisted bookings into a view computed fresh on every request.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use super::{
    closure::{self, DeclaredClosures},
    slots::{day_bounds, format_slot, local_date, local_instant, SlotGrid},
};
use crate::{
    calendar::CalendarProvider,
    error::{AppError, AppResult},
    models::{Booking, BusyInterval, CalendarDay, DayStatus, SlotAvailability},
    repository::{BookingStore, ClosedDayStore},
};

/// Month view result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthAvailability {
    /// `YYYY-MM`
    pub month: String,
    pub days: Vec<CalendarDay>,
}

#[derive(Clone)]
pub struct AvailabilityService {
    calendar: Arc<dyn CalendarProvider>,
    bookings: Arc<dyn BookingStore>,
    closed_days: Arc<dyn ClosedDayStore>,
    grid: SlotGrid,
    tz: Tz,
}

impl AvailabilityService {
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        bookings: Arc<dyn BookingStore>,
        closed_days: Arc<dyn ClosedDayStore>,
        grid: SlotGrid,
        tz: Tz,
    ) -> Self {
        Self {
            calendar,
            bookings,
            closed_days,
            grid,
            tz,
        }
    }

    pub fn grid(&self) -> SlotGrid {
        self.grid
    }

    /// Current date in the studio's time zone
    pub fn today(&self) -> NaiveDate {
        local_date(self.tz, Utc::now())
    }

    /// Status of every day of `year-month`
    pub async fn month_availability(&self, year: i32, month: u32) -> AppResult<MonthAvailability> {
        let days = month_days(year, month)?;
        let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
            return Err(AppError::Validation(format!("Invalid month: {}-{}", year, month)));
        };

        let declared: DeclaredClosures = self
            .closed_days
            .list_between(first, last)
            .await?
            .iter()
            .collect();
        let (start, _) = day_bounds(self.tz, first);
        let (_, end) = day_bounds(self.tz, last);
        let busy = self.busy_between(start, end).await?;

        tracing::debug!(
            "Month {}-{:02}: {} busy intervals",
            year,
            month,
            busy.len()
        );

        Ok(MonthAvailability {
            month: format!("{:04}-{:02}", year, month),
            days: build_month(&days, &declared, &busy, self.tz),
        })
    }

    /// Slots of `date`; empty for past or closed dates
    pub async fn day_slots(&self, date: NaiveDate) -> AppResult<Vec<SlotAvailability>> {
        self.day_slots_on(date, self.today()).await
    }

    /// Same as [`Self::day_slots`] with an explicit current date
    pub async fn day_slots_on(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<Vec<SlotAvailability>> {
        if date < today {
            return Ok(Vec::new());
        }
        if self.is_closed(date).await? {
            return Ok(Vec::new());
        }

        let (start, end) = day_bounds(self.tz, date);
        let busy = self.busy_between(start, end).await?;
        Ok(build_day_slots(date, &self.grid, &busy, self.tz))
    }

    /// Closure policy plus the closed-day register. The register is only
    /// queried when the fixed rules leave the studio open.
    pub async fn is_closed(&self, date: NaiveDate) -> AppResult<bool> {
        if closure::is_closed(date, false) {
            return Ok(true);
        }
        let declared = self.closed_days.list_between(date, date).await?;
        Ok(!declared.is_empty())
    }

    /// Calendar busy intervals plus confirmed bookings missing from the
    /// calendar, ordered by start
    pub async fn busy_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<BusyInterval>> {
        let calendar_busy = self.calendar.list_busy(start, end).await?;
        let bookings = self.bookings.list_between(start, end).await?;
        Ok(merge_bookings(calendar_busy, &bookings))
    }
}

/// Every date of the month in ascending order
pub fn month_days(year: i32, month: u32) -> AppResult<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid month: {}-{}", year, month)))?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect())
}

/// Add bookings not already represented by a calendar event
pub fn merge_bookings(mut busy: Vec<BusyInterval>, bookings: &[Booking]) -> Vec<BusyInterval> {
    let known: HashSet<String> = busy.iter().filter_map(|b| b.event_id.clone()).collect();
    busy.extend(
        bookings
            .iter()
            .filter(|b| !known.contains(&b.event_id))
            .map(|b| BusyInterval::new(b.start_at, b.end_at).with_event_id(b.event_id.clone())),
    );
    busy.sort_by_key(|b| b.start);
    busy
}

/// Day statuses for `days`, counting busy intervals by local start date
pub fn build_month(
    days: &[NaiveDate],
    declared: &DeclaredClosures,
    busy: &[BusyInterval],
    tz: Tz,
) -> Vec<CalendarDay> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for interval in busy {
        *counts.entry(local_date(tz, interval.start)).or_default() += 1;
    }

    days.iter()
        .map(|&date| {
            let busy_count = counts.get(&date).copied().unwrap_or(0);
            let status = if declared.is_closed(date) {
                DayStatus::Closed
            } else if busy_count > 0 {
                DayStatus::Occupied
            } else {
                DayStatus::Available
            };
            CalendarDay {
                date,
                status,
                busy_count,
            }
        })
        .collect()
}

/// All grid slots of `date`, unavailable when inside any busy interval
pub fn build_day_slots(
    date: NaiveDate,
    grid: &SlotGrid,
    busy: &[BusyInterval],
    tz: Tz,
) -> Vec<SlotAvailability> {
    grid.starts()
        .map(|time| {
            let instant = local_instant(tz, date, time);
            SlotAvailability {
                time: format_slot(time),
                available: !busy.iter().any(|b| b.contains(instant)),
                datetime: instant,
            }
        })
        .collect()
}
