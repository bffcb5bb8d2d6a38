// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dates;
use crate::models::{RecurringRule, TxKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentSchedule {
    pub paid_periods: u32,
    pub remaining_periods: u32,
    pub total_periods: u32,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl InstallmentSchedule {
    pub fn is_complete(&self) -> bool {
        self.remaining_periods == 0
    }
}

/// Monthly payments made from `start` through `today`. The start month is
/// the first period; the current month only counts once `today` has reached
/// the payment day.
pub fn paid_periods(start: NaiveDate, day_of_month: u32, today: NaiveDate) -> u32 {
    if start > today {
        return 0;
    }
    let mut elapsed = dates::month_span(start, today);
    if today.day() < day_of_month {
        elapsed -= 1;
    }
    elapsed.max(0) as u32
}

/// Progress of an installment plan as of `today`, or `None` when the rule is
/// open-ended (no period count or no start date). Amounts saturate at the
/// `Decimal` bounds.
pub fn schedule(rule: &RecurringRule, today: NaiveDate) -> Option<InstallmentSchedule> {
    let total_periods = rule.total_periods.filter(|n| *n > 0)?;
    let start_date = rule.start_date?;
    let end_date = dates::add_months(start_date, total_periods - 1)?;

    let paid = paid_periods(start_date, rule.day_of_month, today);
    let remaining = total_periods.saturating_sub(paid);
    let paid_amount = Decimal::from(paid).saturating_mul(rule.amount);
    let explicit_total = rule.total_amount.filter(|t| !t.is_zero());
    let remaining_amount = match explicit_total {
        Some(total) => total.saturating_sub(paid_amount),
        None => Decimal::from(remaining).saturating_mul(rule.amount),
    };
    let total_amount = explicit_total
        .unwrap_or_else(|| Decimal::from(total_periods).saturating_mul(rule.amount));

    Some(InstallmentSchedule {
        paid_periods: paid,
        remaining_periods: remaining,
        total_periods,
        paid_amount,
        remaining_amount,
        total_amount,
        start_date,
        end_date,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStatus {
    pub rule: RecurringRule,
    pub schedule: Option<InstallmentSchedule>,
}

/// Active rules split into outgoing commitments and expected income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringOverview {
    pub expenses: Vec<RuleStatus>,
    pub income: Vec<RuleStatus>,
    pub monthly_expense: Decimal,
    pub monthly_income: Decimal,
}

pub fn overview(rules: &[RecurringRule], today: NaiveDate) -> RecurringOverview {
    let mut out = RecurringOverview::default();
    for rule in rules.iter().filter(|r| r.is_active) {
        let status = RuleStatus {
            rule: rule.clone(),
            schedule: schedule(rule, today),
        };
        match rule.kind {
            TxKind::Expense => {
                out.monthly_expense = out.monthly_expense.saturating_add(rule.amount);
                out.expenses.push(status);
            }
            TxKind::Income => {
                out.monthly_income = out.monthly_income.saturating_add(rule.amount);
                out.income.push(status);
            }
        }
    }
    out
}
