//! Local-day arithmetic for the history ledger.
//!
//! Timestamps are stored as millisecond epochs, but "today" and the weekly
//! buckets follow local calendar days. The timezone is either the server's
//! own or a fixed UTC offset pinned in the config.

use crate::constants::HISTORY_DAYS;
use crate::error::AppError;
use chrono::{Days, Duration, FixedOffset, Local, NaiveDate, TimeZone, Utc};

/// Days before today covered by the weekly window.
const DAYS_BACK: u64 = 6;

/// Current time as a millisecond epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// Server local time, including its DST rules.
    Local,
    /// A fixed offset east of UTC.
    Fixed(FixedOffset),
}

impl Calendar {
    /// `None` selects server local time.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Option<Self> {
        match minutes {
            None => Some(Calendar::Local),
            Some(m) => m
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(Calendar::Fixed),
        }
    }

    /// Local calendar date of a timestamp.
    pub fn local_date(&self, ms: i64) -> Option<NaiveDate> {
        match self {
            Calendar::Local => date_in(&Local, ms),
            Calendar::Fixed(offset) => date_in(offset, ms),
        }
    }

    /// First instant of a local date.
    pub fn midnight_ms(&self, date: NaiveDate) -> Option<i64> {
        match self {
            Calendar::Local => midnight_in(&Local, date),
            Calendar::Fixed(offset) => midnight_in(offset, date),
        }
    }

    /// Start of the local day containing `now_ms`.
    pub fn today_start_ms(&self, now_ms: i64) -> Result<i64, AppError> {
        self.local_date(now_ms)
            .and_then(|today| self.midnight_ms(today))
            .ok_or_else(|| AppError::Internal(format!("compute local midnight for {now_ms}")))
    }

    /// The seven-day window ending at `now_ms`.
    pub fn week_window(&self, now_ms: i64) -> Result<WeekWindow, AppError> {
        let (start_date, start_ms) = match self {
            Calendar::Local => window_start_in(&Local, now_ms),
            Calendar::Fixed(offset) => window_start_in(offset, now_ms),
        }
        .ok_or_else(|| AppError::Internal(format!("compute week window for {now_ms}")))?;
        Ok(WeekWindow {
            calendar: *self,
            start_date,
            start_ms,
            end_ms: now_ms,
        })
    }
}

/// `[local midnight six days ago, now]`, start inclusive.
#[derive(Debug, Clone, Copy)]
pub struct WeekWindow {
    calendar: Calendar,
    start_date: NaiveDate,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl WeekWindow {
    /// Bucket index of a timestamp: 0 is six days ago, 6 is today.
    /// `None` when the timestamp falls outside the window.
    pub fn bucket(&self, ts_ms: i64) -> Option<usize> {
        if ts_ms < self.start_ms || ts_ms > self.end_ms {
            return None;
        }
        day_index(self.start_date, self.calendar.local_date(ts_ms)?)
    }
}

/// Calendar days from `start` to `date`, if within the window.
fn day_index(start: NaiveDate, date: NaiveDate) -> Option<usize> {
    let days = date.signed_duration_since(start).num_days();
    usize::try_from(days).ok().filter(|i| *i < HISTORY_DAYS)
}

/// First date of the window ending at `now_ms`, with its local midnight.
fn window_start_in<Tz: TimeZone>(tz: &Tz, now_ms: i64) -> Option<(NaiveDate, i64)> {
    let today = date_in(tz, now_ms)?;
    let start_date = today.checked_sub_days(Days::new(DAYS_BACK))?;
    Some((start_date, midnight_in(tz, start_date)?))
}

fn date_in<Tz: TimeZone>(tz: &Tz, ms: i64) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(ms).single().map(|dt| dt.date_naive())
}

// Some zones skip midnight on DST change; the day then starts an hour later.
fn midnight_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<i64> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.timestamp_millis())
}
