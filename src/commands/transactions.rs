// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::MonthView;
use crate::dates;
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionDraft, TxKind};
use crate::store::RecordStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_category, parse_date, parse_decimal, parse_kind,
    parse_month, pretty_table, print_refresh_warnings, today_arg,
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

pub fn handle<S: RecordStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("months", _)) => months(ledger),
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let report = ledger.delete_transaction(id)?;
            println!("Deleted transaction {}", id);
            print_refresh_warnings(&report);
        }
        _ => {}
    }
    Ok(())
}

pub fn query_view<S: RecordStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<MonthView> {
    let today = today_arg(sub)?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    Ok(ledger.month_view(month.as_deref(), today))
}

fn list<S: RecordStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = query_view(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &view)? {
        println!(
            "{}: {} transactions, expenses {}",
            view.month,
            view.count,
            fmt_money(&view.expense_total)
        );
        let today = today_arg(sub)?;
        println!(
            "{}",
            pretty_table(
                &["Date", "When", "ID", "Category", "Type", "Amount", "Note"],
                view_rows(&view, today),
            )
        );
    }
    Ok(())
}

pub fn view_rows(view: &MonthView, today: NaiveDate) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for day in &view.days {
        for t in &day.items {
            let amount = match t.kind {
                TxKind::Expense => format!("-{}", fmt_money(&t.amount)),
                TxKind::Income => format!("+{}", fmt_money(&t.amount)),
            };
            rows.push(vec![
                dates::format_date(t.date),
                dates::relative_label(t.date, today),
                t.id.clone(),
                t.category.label().to_string(),
                t.kind.label().to_string(),
                amount,
                t.note.clone(),
            ]);
        }
    }
    rows
}

fn months<S: RecordStore>(ledger: &Ledger<S>) {
    let data: Vec<Vec<String>> = ledger.months().into_iter().map(|m| vec![m]).collect();
    println!("{}", pretty_table(&["Month"], data));
}

/// Build a draft from command arguments. With a `base`, omitted arguments
/// keep the existing values.
pub fn draft_from_args(
    sub: &clap::ArgMatches,
    base: Option<&Transaction>,
) -> Result<TransactionDraft> {
    let base = base.map(TransactionDraft::from);
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
    let date = match (arg("date"), &base) {
        (Some(s), _) => parse_date(s)?,
        (None, Some(b)) => b.date,
        (None, None) => return Err(anyhow!("--date is required")),
    };
    let kind = match (arg("type"), &base) {
        (Some(s), _) => parse_kind(s)?,
        (None, Some(b)) => b.kind,
        (None, None) => TxKind::Expense,
    };
    let note = match arg("note") {
        Some(s) => Some(s.to_string()).filter(|n| !n.is_empty()),
        None => base.and_then(|b| b.note),
    };
    Ok(TransactionDraft {
        amount,
        category,
        kind,
        date,
        note,
    })
}

fn add<S: RecordStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub, None)?;
    let report = ledger.add_transaction(&draft).context("Add transaction")?;
    println!(
        "Recorded {} {} on {} ({})",
        draft.kind.label(),
        fmt_money(&draft.amount),
        draft.date,
        draft.category.label()
    );
    print_refresh_warnings(&report);
    Ok(())
}

fn edit<S: RecordStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let existing = ledger
        .find_transaction(&id)
        .cloned()
        .with_context(|| format!("Transaction '{}' not found", id))?;
    let draft = draft_from_args(sub, Some(&existing))?;
    let report = ledger
        .update_transaction(&id, &draft)
        .with_context(|| format!("Update transaction {}", id))?;
    println!("Updated transaction {}", id);
    print_refresh_warnings(&report);
    Ok(())
}
