// 📅 Calendar Key Codec - Dates → month keys and labels
// Shared by the aggregator, the period filter and the reports.
//
// Month names come from a fixed English table so keys and labels are the
// same regardless of system locale.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical month names, January first
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse a transaction date into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times (the calendar date as written,
/// offset ignored), naive `YYYY-MM-DDTHH:MM:SS`, and `MM/DD/YYYY`.
pub fn parse_transaction_date(date: &str) -> Result<NaiveDate, CalendarError> {
    let trimmed = date.trim();

    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local().date());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.date());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Ok(parsed);
    }

    Err(CalendarError::UnparseableDate(date.to_string()))
}

// ============================================================================
// CALENDAR KEY
// ============================================================================

/// A calendar year-month, the identity of a month bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl CalendarKey {
    pub fn from_date(date: NaiveDate) -> Self {
        CalendarKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn parse(date: &str) -> Result<Self, CalendarError> {
        parse_transaction_date(date).map(CalendarKey::from_date)
    }

    /// Zero-based month index (January = 0)
    pub fn month_index(&self) -> u32 {
        self.month - 1
    }

    /// Inverse of [`CalendarKey::key`]; accepts signed and 5+ digit years
    pub fn from_key(key: &str) -> Option<Self> {
        let (year, month) = key.rsplit_once('-')?;
        let key = CalendarKey {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
        };
        (1..=12).contains(&key.month).then_some(key)
    }

    /// `"YYYY-MM"`
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// `"<MonthName> <Year>"`
    pub fn label(&self) -> String {
        format!("{} {}", MONTHS[self.month_index() as usize], self.year)
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// `"YYYY-MM"` key of a transaction date
pub fn month_key(date: &str) -> Result<String, CalendarError> {
    CalendarKey::parse(date).map(|key| key.key())
}

/// `"<MonthName> <Year>"` label of a transaction date
pub fn month_label(date: &str) -> Result<String, CalendarError> {
    CalendarKey::parse(date).map(|key| key.label())
}

// ============================================================================
// MONTH NAMES
// ============================================================================

/// Zero-based index of a month name (exact, case-sensitive match)
pub fn month_index_from_name(name: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == name).map(|i| i as u32)
}

/// Month name for a 1-based month number
pub fn month_name(number: u32) -> Option<&'static str> {
    if (1..=12).contains(&number) {
        Some(MONTHS[number as usize - 1])
    } else {
        None
    }
}

/// 1-based month number for a name, 0 when the name is unknown
pub fn month_number(name: &str) -> u32 {
    month_index_from_name(name).map_or(0, |index| index + 1)
}

/// One month in a rolling window of recent months
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPeriod {
    pub month: &'static str,
    pub year: i32,
    pub month_number: u32,
    pub key: String,
}

/// The last `n` months ending with the month of `today`, oldest first
pub fn last_n_months(n: u32, today: NaiveDate) -> Vec<MonthPeriod> {
    let current = today.year() * 12 + today.month0() as i32;

    (0..n as i32)
        .rev()
        .map(|back| {
            let absolute = current - back;
            let key = CalendarKey {
                year: absolute.div_euclid(12),
                month: absolute.rem_euclid(12) as u32 + 1,
            };
            MonthPeriod {
                month: MONTHS[key.month_index() as usize],
                year: key.year,
                month_number: key.month,
                key: key.key(),
            }
        })
        .collect()
}

// ============================================================================
// DISPLAY HELPERS
// ============================================================================

/// `"October 5, 2024"`; unparseable input is returned unchanged
pub fn format_date(date: &str) -> String {
    match parse_transaction_date(date) {
        Ok(parsed) => format!(
            "{} {}, {}",
            MONTHS[parsed.month0() as usize],
            parsed.day(),
            parsed.year()
        ),
        Err(_) => date.to_string(),
    }
}

pub fn format_date_range(start: &str, end: &str) -> String {
    format!("{} - {}", format_date(start), format_date(end))
}

/// Full English weekday name
pub fn day_of_week(date: &str) -> Result<&'static str, CalendarError> {
    const DAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    let parsed = parse_transaction_date(date)?;
    Ok(DAYS[parsed.weekday().num_days_from_monday() as usize])
}

/// True when the date falls in the same year and month as `today`
pub fn is_current_month(date: &str, today: NaiveDate) -> bool {
    CalendarKey::parse(date)
        .map(|key| key == CalendarKey::from_date(today))
        .unwrap_or(false)
}

// ============================================================================
// TESTS
// ============================================================================
