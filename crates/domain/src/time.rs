use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A validated wall-clock time of day, e.g. the "09:00" of a reminder slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hours: u32,
    minutes: u32,
}

impl TimeOfDay {
    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

#[derive(Error, Debug)]
pub enum InvalidTimeOfDay {
    #[error("Time of day: {0} is malformed, expected HH:MM")]
    Malformed(String),
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidTimeOfDay::Malformed(s.to_string());

        let mut parts = s.trim().split(':');
        let hours = parts.next().ok_or_else(malformed)?;
        let minutes = parts.next().ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        let hours: u32 = hours.parse().map_err(|_| malformed())?;
        let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
        if hours > 23 || minutes > 59 {
            return Err(malformed());
        }

        Ok(Self { hours, minutes })
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// The given UTC instant viewed as a local datetime in `tz`.
pub fn local_now(tz: &Tz, now_millis: i64) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(now_millis).map(|utc| utc.with_timezone(tz))
}

/// The user-local calendar day containing the given instant. Determines
/// which day an intake belongs to for the once-per-day constraint.
pub fn local_day(tz: &Tz, now_millis: i64) -> Option<NaiveDate> {
    local_now(tz, now_millis).map(|now| now.date_naive())
}

/// The instant corresponding to `time` today in `tz`, with seconds
/// truncated to zero. "Today" is evaluated against `now_millis`, so this
/// must be called fresh at decision time and never cached across midnight.
/// `None` when the wall-clock time does not exist locally (DST gap).
pub fn resolve_today(tz: &Tz, time: &TimeOfDay, now_millis: i64) -> Option<i64> {
    let now = local_now(tz, now_millis)?;
    tz.with_ymd_and_hms(
        now.year(),
        now.month(),
        now.day(),
        time.hours(),
        time.minutes(),
        0,
    )
    // An ambiguous local time (DST fall-back) resolves to the first occurrence
    .earliest()
    .map(|planned| planned.timestamp_millis())
}
