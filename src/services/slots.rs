//! Slot grid: opening hours and bookable start times

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Fixed studio-wide catalog of hourly start times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    /// First bookable hour
    pub opening_hour: u32,
    /// Hour by which every booking must have ended
    pub closing_hour: u32,
}

impl Default for SlotGrid {
    /// 09:00-18:00, last start at 17:00
    fn default() -> Self {
        Self {
            opening_hour: 9,
            closing_hour: 18,
        }
    }
}

impl SlotGrid {
    pub fn starts(&self) -> impl Iterator<Item = NaiveTime> {
        (self.opening_hour..self.closing_hour).filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time.minute() == 0
            && time.second() == 0
            && time.nanosecond() == 0
            && (self.opening_hour..self.closing_hour).contains(&time.hour())
    }

    /// Closing time expressed as hours after `start`
    pub fn hours_until_close(&self, start: NaiveTime) -> u32 {
        self.closing_hour.saturating_sub(start.hour())
    }
}

/// Format a slot time as `HH:MM`
pub fn format_slot(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse a `HH:MM` slot time
pub fn parse_slot(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}

/// Parse a calendar date, ignoring any time-of-day part
/// (`2026-11-02`, `2026-11-02T10:00:00`, `2026-11-02T10:00:00+01:00`)
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Absolute instant of a local wall-clock time. Ambiguous times resolve to the
/// earlier instant; times skipped by a DST jump shift forward by an hour.
pub fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            let shifted = naive + chrono::TimeDelta::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
        }
    }
}

/// `[local midnight of date, local midnight of the next day)`
pub fn day_bounds(tz: Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (
        local_instant(tz, date, NaiveTime::MIN),
        local_instant(tz, next, NaiveTime::MIN),
    )
}

/// Local calendar date of an instant
pub fn local_date(tz: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}
