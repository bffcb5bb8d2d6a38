// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar-date canonicalization and the month arithmetic shared by the
//! summary and installment calculations.
//!
//! Every date that reaches aggregation is a [`NaiveDate`] with a year in
//! `MIN_YEAR..=MAX_YEAR`. Anything else is reported as `None` and dropped by
//! the caller; nothing in here returns an error.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

static CANONICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("canonical date pattern"));

// Shape produced by JavaScript's Date.prototype.toString, which the sheet
// backend emits for cells typed as dates: "Mon Jan 15 2024 00:00:00 GMT+0800 (...)".
static JS_DATE_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z]{3},?\s+)?([A-Za-z]{3})\s+(\d{1,2}),?\s+(\d{4})\b")
        .expect("js date pattern")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"];

/// The shapes a date can arrive in from the store or from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(&'a str),
    /// Milliseconds since the Unix epoch, read as a local calendar date.
    Millis(i64),
    Missing,
}

impl<'a> DateInput<'a> {
    pub fn from_json(v: &'a Value) -> Self {
        match v {
            Value::String(s) => DateInput::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(ms) => DateInput::Millis(ms),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| DateInput::Millis(f.trunc() as i64))
                    .unwrap_or(DateInput::Missing),
            },
            _ => DateInput::Missing,
        }
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(d: NaiveDate) -> Self {
        DateInput::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateInput::DateTime(dt)
    }
}

impl<'a> From<Option<&'a str>> for DateInput<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map(DateInput::Text).unwrap_or(DateInput::Missing)
    }
}

pub fn in_range(d: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&d.year())
}

fn checked(d: NaiveDate) -> Option<NaiveDate> {
    in_range(d).then_some(d)
}

/// Canonicalize any supported date shape into an in-range calendar date.
pub fn normalize<'a>(input: impl Into<DateInput<'a>>) -> Option<NaiveDate> {
    match input.into() {
        DateInput::Date(d) => checked(d),
        DateInput::DateTime(dt) => checked(dt.date()),
        DateInput::Millis(0) | DateInput::Missing => None,
        DateInput::Millis(ms) => Local
            .timestamp_millis_opt(ms)
            .single()
            .and_then(|dt| checked(dt.date_naive())),
        DateInput::Text(s) => normalize_text(s.trim()),
    }
}

/// Same as [`normalize`] but in the `YYYY-MM-DD` string form; an empty string
/// means the input was unusable.
pub fn canonicalize<'a>(input: impl Into<DateInput<'a>>) -> String {
    normalize(input).map(format_date).unwrap_or_default()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn strict(s: &str) -> Option<Option<NaiveDate>> {
    let caps = CANONICAL.captures(s)?;
    let y: i32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    let d: u32 = caps[3].parse().ok()?;
    Some(NaiveDate::from_ymd_opt(y, m, d).and_then(checked))
}

fn normalize_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    // A string already shaped like YYYY-MM-DD is judged on its own: a
    // calendar-invalid or out-of-range value is not re-read loosely.
    if let Some(res) = strict(s) {
        return res;
    }
    if let Some((head, _)) = s.split_once('T') {
        if let Some(Some(d)) = strict(head) {
            return Some(d);
        }
    }
    loose(s).and_then(checked)
}

fn loose(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    let caps = JS_DATE_STRING.captures(s)?;
    let text = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&text, "%b %d %Y").ok()
}

/// `YYYY-MM` key of the month containing `d`.
pub fn month_key(d: NaiveDate) -> String {
    d.format("%Y-%m").to_string()
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// First day of a trailing window of `days` calendar days ending on `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// Advance by whole months, clamping to the last day of the target month
/// (2024-01-31 + 1 month = 2024-02-29).
pub fn add_months(d: NaiveDate, months: u32) -> Option<NaiveDate> {
    d.checked_add_months(Months::new(months))
}

/// Number of calendar months from `start`'s month to `end`'s month, counting
/// both ends. Zero or negative when `end` is in an earlier month.
pub fn month_span(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32) + 1
}

/// Short human label relative to `today`: "today", "tomorrow", "yesterday",
/// otherwise `M/D (Weekday)`.
pub fn relative_label(d: NaiveDate, today: NaiveDate) -> String {
    match (d - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        _ => format!("{}/{} ({})", d.month(), d.day(), d.format("%a")),
    }
}
