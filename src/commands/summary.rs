// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::Summary;
use crate::dates;
use crate::ledger::Ledger;
use crate::store::RecordStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today_arg};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn handle<S: RecordStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = today_arg(sub)?;
    let summary = ledger.summary(today);
    if maybe_print_json(json_flag, jsonl_flag, &summary)? {
        return Ok(());
    }

    let week = sub.get_one::<String>("period").map(String::as_str) == Some("week");
    if week {
        println!("Last 7 days: {}", fmt_money(&summary.week_total));
    } else {
        println!(
            "{}: {}",
            dates::month_key(today),
            fmt_money(&summary.month_total)
        );
        if !summary.category_totals.is_empty() {
            println!(
                "{}",
                pretty_table(&["Category", "Spent", "Share"], category_rows(&summary))
            );
        }
    }

    if summary.recent.is_empty() {
        println!("No transactions yet.");
    } else {
        println!(
            "{}",
            pretty_table(
                &["When", "Category", "Type", "Amount", "Note"],
                recent_rows(&summary, today)
            )
        );
    }
    Ok(())
}

pub fn category_rows(summary: &Summary) -> Vec<Vec<String>> {
    summary
        .category_totals
        .iter()
        .map(|c| {
            let share = c
                .value
                .checked_div(summary.month_total)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO)
                .round_dp(1);
            vec![c.name.clone(), fmt_money(&c.value), format!("{:.1}%", share)]
        })
        .collect()
}

pub fn recent_rows(summary: &Summary, today: NaiveDate) -> Vec<Vec<String>> {
    summary
        .recent
        .iter()
        .map(|t| {
            vec![
                dates::relative_label(t.date, today),
                t.category.label().to_string(),
                t.kind.label().to_string(),
                fmt_money(&t.amount),
                t.note.clone(),
            ]
        })
        .collect()
}
