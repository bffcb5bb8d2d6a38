// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dates;
use crate::installments::RuleStatus;
use crate::ledger::Ledger;
use crate::models::{RecurringDraft, RecurringRule, TxKind};
use crate::store::RecordStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_category, parse_date, parse_decimal, parse_kind,
    pretty_table, print_refresh_warnings, today_arg,
};
use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;

pub fn handle<S: RecordStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("add", sub)) => {
            let draft = draft_from_args(sub, None)?;
            let report = ledger.add_recurring(&draft).context("Add recurring item")?;
            println!(
                "Added {} {} on day {} ({})",
                draft.kind.label(),
                fmt_money(&draft.amount),
                draft.day_of_month,
                draft.category.label()
            );
            print_refresh_warnings(&report);
        }
        Some(("edit", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().to_string();
            let existing = ledger
                .find_recurring(&id)
                .cloned()
                .with_context(|| format!("Recurring item '{}' not found", id))?;
            let draft = draft_from_args(sub, Some(&existing))?;
            let report = ledger
                .update_recurring(&id, &draft)
                .with_context(|| format!("Update recurring item {}", id))?;
            println!("Updated recurring item {}", id);
            print_refresh_warnings(&report);
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let report = ledger.delete_recurring(id)?;
            println!("Deleted recurring item {}", id);
            print_refresh_warnings(&report);
        }
        _ => {}
    }
    Ok(())
}

fn list<S: RecordStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = today_arg(sub)?;
    let overview = ledger.recurring_overview(today);
    if maybe_print_json(json_flag, jsonl_flag, &overview)? {
        return Ok(());
    }
    print_group("Recurring expenses", &overview.expenses, overview.monthly_expense);
    print_group("Expected income", &overview.income, overview.monthly_income);
    Ok(())
}

fn print_group(title: &str, items: &[RuleStatus], total: Decimal) {
    println!("{} ({} / month)", title, fmt_money(&total));
    if items.is_empty() {
        println!("  none");
        return;
    }
    println!(
        "{}",
        pretty_table(
            &["ID", "Category", "Amount", "Day", "Progress", "Paid / Left", "Start - End", "Note"],
            status_rows(items),
        )
    );
}

pub fn status_rows(items: &[RuleStatus]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|s| {
            let (progress, amounts, span) = match &s.schedule {
                Some(p) => (
                    format!("{}/{}", p.paid_periods, p.total_periods),
                    format!(
                        "{} / {}",
                        fmt_money(&p.paid_amount),
                        fmt_money(&p.remaining_amount)
                    ),
                    format!(
                        "{} - {}",
                        dates::format_date(p.start_date),
                        dates::format_date(p.end_date)
                    ),
                ),
                None => ("ongoing".to_string(), String::new(), String::new()),
            };
            vec![
                s.rule.id.clone(),
                s.rule.category.label().to_string(),
                fmt_money(&s.rule.amount),
                s.rule.day_of_month.to_string(),
                progress,
                amounts,
                span,
                s.rule.note.clone(),
            ]
        })
        .collect()
}

pub fn draft_from_args(
    sub: &clap::ArgMatches,
    base: Option<&RecurringRule>,
) -> Result<RecurringDraft> {
    let base = base.map(RecurringDraft::from);
    let arg = |name: &str| sub.get_one::<String>(name).map(|s| s.trim());

    let amount = match (arg("amount"), &base) {
        (Some(s), _) => parse_decimal(s)?,
        (None, Some(b)) => b.amount,
        (None, None) => return Err(anyhow!("--amount is required")),
    };
    let category = match (arg("category"), &base) {
        (Some(s), _) => parse_category(s)?,
        (None, Some(b)) => b.category,
        (None, None) => return Err(anyhow!("--category is required")),
    };
    let day_of_month = match (sub.get_one::<u32>("day"), &base) {
        (Some(d), _) => *d,
        (None, Some(b)) => b.day_of_month,
        (None, None) => return Err(anyhow!("--day is required")),
    };
    let kind = match (arg("type"), &base) {
        (Some(s), _) => parse_kind(s)?,
        (None, Some(b)) => b.kind,
        (None, None) => TxKind::Expense,
    };
    let is_active = if sub.get_flag("inactive") {
        false
    } else if sub.get_flag("active") {
        true
    } else {
        base.as_ref().map(|b| b.is_active).unwrap_or(true)
    };
    // Only `recurring edit` defines --no-plan.
    let plan_base = match sub.try_get_one::<bool>("no_plan") {
        Ok(Some(true)) => None,
        _ => base.as_ref(),
    };
    let start_date = match arg("start") {
        Some(s) => Some(parse_date(s)?),
        None => plan_base.and_then(|b| b.start_date),
    };
    let total_periods = sub
        .get_one::<u32>("periods")
        .copied()
        .or_else(|| plan_base.and_then(|b| b.total_periods));
    let total_amount = match arg("total") {
        Some(s) => Some(parse_decimal(s)?),
        None => plan_base.and_then(|b| b.total_amount),
    };
    let note = match arg("note") {
        Some(s) => Some(s.to_string()).filter(|n| !n.is_empty()),
        None => base.and_then(|b| b.note),
    };

    Ok(RecurringDraft {
        amount,
        category,
        kind,
        note,
        day_of_month,
        is_active,
        start_date,
        total_periods,
        total_amount,
    })
}
