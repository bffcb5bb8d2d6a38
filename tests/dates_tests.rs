// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use tallybook::dates::{self, DateInput, canonicalize, normalize};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn canonical_strings_pass_through() {
    assert_eq!(canonicalize("2024-01-15"), "2024-01-15");
    assert_eq!(canonicalize("  2024-01-15 "), "2024-01-15");
    assert_eq!(canonicalize("2000-01-01"), "2000-01-01");
    assert_eq!(canonicalize("2100-12-31"), "2100-12-31");
}

#[test]
fn out_of_range_years_are_unusable() {
    assert_eq!(canonicalize("1999-12-31"), "");
    assert_eq!(canonicalize("2101-01-01"), "");
    assert_eq!(normalize(ymd(1990, 5, 1)), None);
    assert_eq!(normalize(DateInput::Millis(1)), None);
}

#[test]
fn calendar_invalid_dates_are_unusable() {
    assert_eq!(canonicalize("2024-02-30"), "");
    assert_eq!(canonicalize("2023-02-29"), "");
    assert_eq!(canonicalize("2024-13-01"), "");
    assert_eq!(canonicalize("2024-00-10"), "");
    assert_eq!(canonicalize("2024-13-45T00:00:00Z"), "");
}

#[test]
fn iso_timestamps_keep_their_calendar_part() {
    // No timezone shift: the date written before the T is the date.
    assert_eq!(canonicalize("2026-01-09T16:00:00.000Z"), "2026-01-09");
    assert_eq!(canonicalize("2024-06-30T23:59:59+08:00"), "2024-06-30");
}

#[test]
fn other_parseable_shapes() {
    assert_eq!(canonicalize("2024-01-15 08:30:00"), "2024-01-15");
    assert_eq!(canonicalize("2024/03/05"), "2024-03-05");
    assert_eq!(canonicalize("2024/3/5"), "2024-03-05");
    assert_eq!(
        canonicalize("Mon Jan 15 2024 00:00:00 GMT+0800 (Taipei Standard Time)"),
        "2024-01-15"
    );
    assert_eq!(canonicalize("Mon, 15 Jan 2024 12:00:00 +0000"), "2024-01-15");
}

#[test]
fn native_values_and_missing_input() {
    assert_eq!(normalize(ymd(2024, 2, 29)), Some(ymd(2024, 2, 29)));
    let dt = NaiveDateTime::parse_from_str("2024-07-04 22:10:00", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(normalize(dt), Some(ymd(2024, 7, 4)));
    assert_eq!(normalize(DateInput::Missing), None);
    assert_eq!(normalize(None::<&str>), None);
    assert_eq!(canonicalize(""), "");
    assert_eq!(canonicalize("   "), "");
    assert_eq!(canonicalize("not a date"), "");
    assert_eq!(normalize(DateInput::Millis(0)), None);
}

#[test]
fn json_inputs() {
    let s = json!("2024-05-06");
    assert_eq!(normalize(DateInput::from_json(&s)), Some(ymd(2024, 5, 6)));
    assert_eq!(normalize(DateInput::from_json(&json!(null))), None);
    assert_eq!(normalize(DateInput::from_json(&json!(true))), None);
    // 1970 is out of range no matter the local offset.
    assert_eq!(normalize(DateInput::from_json(&json!(86_400_000))), None);
}

#[test]
fn clamped_month_addition() {
    assert_eq!(dates::add_months(ymd(2024, 1, 31), 1), Some(ymd(2024, 2, 29)));
    assert_eq!(dates::add_months(ymd(2023, 1, 31), 1), Some(ymd(2023, 2, 28)));
    assert_eq!(dates::add_months(ymd(2024, 1, 15), 11), Some(ymd(2024, 12, 15)));
    assert_eq!(dates::add_months(ymd(2024, 11, 30), 3), Some(ymd(2025, 2, 28)));
}

#[test]
fn month_keys() {
    assert_eq!(dates::month_key(ymd(2024, 3, 9)), "2024-03");
    assert!(dates::same_month(ymd(2024, 3, 1), ymd(2024, 3, 31)));
    assert!(!dates::same_month(ymd(2024, 3, 1), ymd(2023, 3, 1)));
}
