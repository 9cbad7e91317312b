//! Calendar-date helpers shared by the store and analytics.
//!
//! # Responsibility
//! - Parse and format the canonical `YYYY-MM-DD` form.
//! - Provide human-readable rendering and calendar-correct day arithmetic.
//! - Abstract "today" behind `Clock` so callers stay deterministic.
//!
//! # Invariants
//! - Canonical strings are zero-padded, so lexical order equals
//!   chronological order.
//! - Day arithmetic goes through chrono; month lengths are never assumed.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static CANONICAL_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[T ].*)?$").expect("valid canonical date regex")
});

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Date parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input is not shaped like `YYYY-MM-DD`.
    NotCanonical(String),
    /// Shape is right, but the day does not exist (e.g. `2025-02-30`).
    OutOfRange(String),
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotCanonical(value) => {
                write!(f, "date `{value}` is not in canonical YYYY-MM-DD form")
            }
            Self::OutOfRange(value) => write!(f, "date `{value}` does not exist"),
        }
    }
}

impl Error for DateError {}

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parses a canonical date, ignoring any trailing time-of-day part.
///
/// # Errors
/// - `NotCanonical` when the leading part is not zero-padded `YYYY-MM-DD`.
/// - `OutOfRange` when the calendar day does not exist.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DateError> {
    let trimmed = value.trim();
    let caps = CANONICAL_DATE_RE
        .captures(trimmed)
        .ok_or_else(|| DateError::NotCanonical(trimmed.to_string()))?;

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| DateError::NotCanonical(trimmed.to_string()))?;
    let month: u32 = caps[2]
        .parse()
        .map_err(|_| DateError::NotCanonical(trimmed.to_string()))?;
    let day: u32 = caps[3]
        .parse()
        .map_err(|_| DateError::NotCanonical(trimmed.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::OutOfRange(trimmed.to_string()))
}

/// Formats a date in canonical `YYYY-MM-DD` form.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Renders a canonical date for display, e.g. `Jan 5, 2025`.
pub fn display_date(iso: &str) -> Result<String, DateError> {
    let date = parse_iso_date(iso)?;
    Ok(date.format("%b %-d, %Y").to_string())
}

/// Short label used by daily charts, e.g. `Jan 05`.
pub fn display_date_short(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Calendar-day equality; time-of-day suffixes are ignored.
///
/// Returns `false` when either side does not parse.
pub fn is_same_date(a: &str, b: &str) -> bool {
    match (parse_iso_date(a), parse_iso_date(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// `YYYY-MM` bucket key.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// English weekday name, e.g. `Monday`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The day `days` calendar days before `date`.
///
/// Returns `None` only when the result underflows chrono's range.
pub fn days_before(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(chrono::Days::new(days))
}

/// Whether `date` falls in `year`/`month` (month is 1-based).
pub fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}
