//! Calendar helpers for splitting date ranges and formatting outage dates
//!
//! Upstream timestamps look like `2021-01-05 14:32:00` (sometimes with a `T`
//! separator); only the leading `YYYY-MM-DD` part is ever interpreted.

use super::errors::PowerMapError;
use super::result::Result;
use chrono::{Datelike, NaiveDate};
use std::iter::FusedIterator;

/// Input format for range bounds
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format of the `dia` field
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Clamps `date` into `[Jan 1, Dec 31]` of `year`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use powermap::domain::dates::clip_to_year;
///
/// let d = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
/// assert_eq!(clip_to_year(d, 2022), NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
/// assert_eq!(clip_to_year(d, 2023), d);
/// ```
pub fn clip_to_year(date: NaiveDate, year: i32) -> NaiveDate {
    let (Some(lo), Some(hi)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return date;
    };
    date.clamp(lo, hi)
}

/// Iterates `(year, month)` pairs from `start`'s month through `end`'s month inclusive
pub fn months_between(start: NaiveDate, end: NaiveDate) -> MonthsBetween {
    MonthsBetween {
        next: (start.year(), start.month()),
        last: (end.year(), end.month()),
    }
}

/// Lazy month sequence returned by [`months_between`]
///
/// Cloning yields an independent iterator positioned at the same month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthsBetween {
    next: (i32, u32),
    last: (i32, u32),
}

impl Iterator for MonthsBetween {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let current = self.next;
        let (year, month) = current;
        self.next = if month >= 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next > self.last {
            0
        } else {
            let months = (self.last.0 - self.next.0) as i64 * 12 + self.last.1 as i64
                - self.next.1 as i64
                + 1;
            months as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthsBetween {}

impl FusedIterator for MonthsBetween {}

/// Lower timestamp bound of a day as used in datastore predicates
pub fn day_start(date: NaiveDate) -> String {
    format!("{date} 00:00:00")
}

/// Upper timestamp bound of a day as used in datastore predicates
pub fn day_end(date: NaiveDate) -> String {
    format!("{date} 23:59:59")
}

fn date_prefix(raw: &str) -> &str {
    match raw.char_indices().nth(10) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Parses the calendar date of a raw upstream timestamp
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let prefix = date_prefix(raw.trim());
    if prefix.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(prefix, INPUT_DATE_FORMAT).ok()
}

/// Renders a raw upstream timestamp as `dd/mm/yyyy`
///
/// Falls back to the raw date prefix when it does not parse, and to an empty
/// string when there is no timestamp at all.
pub fn display_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(date_prefix(raw), INPUT_DATE_FORMAT) {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => date_prefix(raw).to_string(),
    }
}

/// Parses a `dd/mm/yyyy` display date
pub fn parse_display_date(day: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day, DISPLAY_DATE_FORMAT).ok()
}

/// Sort key of a display date; malformed values sort first as 1900-01-01
pub fn display_sort_key(day: &str) -> NaiveDate {
    parse_display_date(day).unwrap_or_else(epoch_1900)
}

fn epoch_1900() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parses a `YYYY-MM-DD` range bound supplied by a caller
///
/// # Errors
///
/// Returns `PowerMapError::Validation` when the value is blank or malformed.
pub fn parse_input_date(field: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PowerMapError::Validation(format!("{field} is required")));
    }
    NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT).map_err(|e| {
        PowerMapError::Validation(format!(
            "{field} must be a YYYY-MM-DD date, got '{value}': {e}"
        ))
    })
}
