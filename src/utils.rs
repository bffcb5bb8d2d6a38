// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::time::Duration;

use crate::dates;
use crate::ledger::RefreshReport;
use crate::models::{Category, TxKind};

const UA: &str = concat!("tallybook/", env!("CARGO_PKG_VERSION"));

pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let d = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
    if !dates::in_range(d) {
        return Err(anyhow!(
            "Date '{}' is outside {}-{}",
            s,
            dates::MIN_YEAR,
            dates::MAX_YEAR
        ));
    }
    Ok(d)
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    parse_date(&format!("{}-01", s))
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_category(s: &str) -> Result<Category> {
    Category::parse(s).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
        anyhow!("Unknown category '{}' (one of: {})", s, known.join(", "))
    })
}

pub fn parse_kind(s: &str) -> Result<TxKind> {
    TxKind::parse(s).ok_or_else(|| anyhow!("Unknown type '{}' (expense|income)", s))
}

/// `--today` when given, otherwise the local calendar date.
pub fn today_arg(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("today") {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Whole New Taiwan dollars with thousands separators.
pub fn fmt_money(d: &Decimal) -> String {
    let rounded = d.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}NT${}", sign, grouped)
}

/// Tell the user which collections could not be reloaded.
pub fn print_refresh_warnings(report: &RefreshReport) {
    for w in &report.warnings {
        eprintln!("warning: {} (showing no data for it)", w);
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(fmt_money(&Decimal::new(1234567, 0)), "NT$1,234,567");
        assert_eq!(fmt_money(&Decimal::new(999, 0)), "NT$999");
        assert_eq!(fmt_money(&Decimal::new(-12005, 1)), "-NT$1,200");
        assert_eq!(fmt_money(&Decimal::ZERO), "NT$0");
    }

    #[test]
    fn month_argument_is_checked() {
        assert_eq!(parse_month(" 2024-06 ").unwrap(), "2024-06");
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("1999-12").is_err());
    }
}
