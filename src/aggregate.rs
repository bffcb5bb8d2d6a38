// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summaries over a transaction snapshot: this month's and this week's
//! spending, the month's category breakdown, and the most recent entries.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::dates;
use crate::models::{Category, Transaction, TxKind};

pub const RECENT_LIMIT: usize = 5;
pub const WEEK_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub month_total: Decimal,
    pub week_total: Decimal,
    pub category_totals: Vec<CategoryTotal>,
    pub recent: Vec<Transaction>,
}

/// Newest-first ordering. Records carrying a creation timestamp come before
/// those without; ties fall through to the date and then the id, both
/// descending, so no two distinct records compare equal.
pub fn recency_order(a: &Transaction, b: &Transaction) -> Ordering {
    match (&a.created_at, &b.created_at) {
        (Some(x), Some(y)) => y
            .cmp(x)
            .then_with(|| b.date.cmp(&a.date))
            .then_with(|| b.id.cmp(&a.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)),
    }
}

/// Valid transactions in recency order.
pub fn sort_recent(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| dates::in_range(t.date))
        .collect();
    sorted.sort_by(|a, b| recency_order(a, b));
    sorted
}

pub fn aggregate(transactions: &[Transaction], today: NaiveDate) -> Summary {
    let sorted = sort_recent(transactions);
    let week_start = dates::window_start(today, WEEK_DAYS);

    let mut month_total = Decimal::ZERO;
    let mut week_total = Decimal::ZERO;
    let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();

    // Month and week are judged separately: the trailing week can reach
    // back into the previous month. Sums saturate at the Decimal bounds.
    for tx in sorted.iter().filter(|t| t.kind == TxKind::Expense) {
        if dates::same_month(tx.date, today) {
            month_total = month_total.saturating_add(tx.amount);
            let slot = by_category.entry(tx.category).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(tx.amount);
        }
        if tx.date >= week_start {
            week_total = week_total.saturating_add(tx.amount);
        }
    }

    let mut ranked: Vec<(Category, Decimal)> = by_category.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let category_totals = ranked
        .into_iter()
        .map(|(c, value)| CategoryTotal {
            name: c.label().to_string(),
            value,
        })
        .collect();

    let recent: Vec<Transaction> = sorted.iter().take(RECENT_LIMIT).map(|t| (*t).clone()).collect();

    debug!(
        total = transactions.len(),
        valid = sorted.len(),
        month = %dates::month_key(today),
        week_start = %week_start,
        %month_total,
        %week_total,
        "summary computed"
    );

    Summary {
        month_total,
        week_total,
        category_totals,
        recent,
    }
}

/// Distinct `YYYY-MM` months present in the snapshot, newest first.
pub fn months(transactions: &[Transaction]) -> Vec<String> {
    let set: BTreeSet<String> = transactions
        .iter()
        .filter(|t| dates::in_range(t.date))
        .map(|t| dates::month_key(t.date))
        .collect();
    set.into_iter().rev().collect()
}

/// Month of the newest transaction, falling back to the month of `today`.
pub fn default_month(transactions: &[Transaction], today: NaiveDate) -> String {
    transactions
        .iter()
        .map(|t| t.date)
        .filter(|d| dates::in_range(*d))
        .max()
        .map(dates::month_key)
        .unwrap_or_else(|| dates::month_key(today))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub items: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub month: String,
    pub count: usize,
    pub expense_total: Decimal,
    pub days: Vec<DayGroup>,
}

/// Transactions of one `YYYY-MM` month grouped by day, newest day first.
pub fn month_view(transactions: &[Transaction], month: &str) -> MonthView {
    let mut by_day: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
    let mut expense_total = Decimal::ZERO;
    let mut count = 0;
    for tx in sort_recent(transactions) {
        if dates::month_key(tx.date) != month {
            continue;
        }
        count += 1;
        if tx.kind == TxKind::Expense {
            expense_total = expense_total.saturating_add(tx.amount);
        }
        by_day.entry(tx.date).or_default().push(tx.clone());
    }
    let days = by_day
        .into_iter()
        .rev()
        .map(|(date, items)| DayGroup { date, items })
        .collect();
    MonthView {
        month: month.to_string(),
        count,
        expense_total,
        days,
    }
}
