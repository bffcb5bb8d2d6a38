// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tallybook::installments::{self, paid_periods, schedule};
use tallybook::models::{Category, RecurringRule, TxKind};
use tallybook::wire;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn plan(start: Option<NaiveDate>, day: u32, periods: Option<u32>, amount: i64) -> RecurringRule {
    RecurringRule {
        id: "r1".to_string(),
        amount: Decimal::from(amount),
        category: Category::Household,
        kind: TxKind::Expense,
        note: "phone".to_string(),
        day_of_month: day,
        is_active: true,
        start_date: start,
        total_periods: periods,
        total_amount: None,
    }
}

#[test]
fn twelve_month_plan_midway() {
    let rule = plan(Some(ymd(2024, 1, 15)), 15, Some(12), 1000);
    let s = schedule(&rule, ymd(2024, 6, 20)).unwrap();
    assert_eq!(s.paid_periods, 6);
    assert_eq!(s.remaining_periods, 6);
    assert_eq!(s.total_periods, 12);
    assert_eq!(s.paid_amount, Decimal::from(6000));
    assert_eq!(s.remaining_amount, Decimal::from(6000));
    assert_eq!(s.total_amount, Decimal::from(12000));
    assert_eq!(s.start_date, ymd(2024, 1, 15));
    assert_eq!(s.end_date, ymd(2024, 12, 15));
    assert!(!s.is_complete());
}

#[test]
fn current_month_counts_only_after_payment_day() {
    let rule = plan(Some(ymd(2024, 1, 15)), 15, Some(12), 1000);
    assert_eq!(schedule(&rule, ymd(2024, 6, 10)).unwrap().paid_periods, 5);
    assert_eq!(schedule(&rule, ymd(2024, 6, 15)).unwrap().paid_periods, 6);
}

#[test]
fn open_ended_rules_have_no_schedule() {
    assert!(schedule(&plan(None, 15, Some(12), 1000), ymd(2024, 6, 20)).is_none());
    assert!(schedule(&plan(Some(ymd(2024, 1, 15)), 15, None, 1000), ymd(2024, 6, 20)).is_none());
    assert!(
        schedule(&plan(Some(ymd(2024, 1, 15)), 15, Some(0), 1000), ymd(2024, 6, 20)).is_none()
    );
}

#[test]
fn end_date_clamps_to_month_end() {
    let rule = plan(Some(ymd(2024, 1, 31)), 31, Some(2), 500);
    let s = schedule(&rule, ymd(2024, 1, 31)).unwrap();
    assert_eq!(s.end_date, ymd(2024, 2, 29));
    assert_eq!(s.paid_periods, 1);
}

#[test]
fn plan_starting_later_has_nothing_paid() {
    assert_eq!(paid_periods(ymd(2024, 9, 1), 1, ymd(2024, 6, 20)), 0);
    let rule = plan(Some(ymd(2024, 9, 1)), 1, Some(3), 100);
    let s = schedule(&rule, ymd(2024, 6, 20)).unwrap();
    assert_eq!(s.paid_periods, 0);
    assert_eq!(s.remaining_periods, 3);
    assert_eq!(s.remaining_amount, Decimal::from(300));
}

#[test]
fn start_month_before_payment_day() {
    assert_eq!(paid_periods(ymd(2024, 6, 5), 15, ymd(2024, 6, 10)), 0);
    assert_eq!(paid_periods(ymd(2024, 6, 5), 15, ymd(2024, 6, 15)), 1);
}

#[test]
fn finished_plan_has_nothing_remaining() {
    let rule = plan(Some(ymd(2023, 1, 10)), 10, Some(6), 250);
    let s = schedule(&rule, ymd(2024, 6, 20)).unwrap();
    assert_eq!(s.remaining_periods, 0);
    assert_eq!(s.remaining_amount, Decimal::ZERO);
    assert!(s.is_complete());
}

#[test]
fn explicit_total_drives_remaining_amount() {
    let mut rule = plan(Some(ymd(2024, 1, 15)), 15, Some(12), 1000);
    rule.total_amount = Some(Decimal::from(11500));
    let s = schedule(&rule, ymd(2024, 6, 20)).unwrap();
    assert_eq!(s.total_amount, Decimal::from(11500));
    assert_eq!(s.remaining_amount, Decimal::from(5500));

    rule.total_amount = Some(Decimal::ZERO);
    let s = schedule(&rule, ymd(2024, 6, 20)).unwrap();
    assert_eq!(s.total_amount, Decimal::from(12000));
    assert_eq!(s.remaining_amount, Decimal::from(6000));
}

#[test]
fn overview_splits_active_rules_by_kind() {
    let today = ymd(2024, 6, 20);
    let mut rent = plan(None, 5, None, 18000);
    rent.id = "rent".into();
    let mut salary = plan(None, 10, None, 52000);
    salary.id = "salary".into();
    salary.kind = TxKind::Income;
    salary.category = Category::Salary;
    let mut paused = plan(None, 1, None, 300);
    paused.id = "gym".into();
    paused.is_active = false;
    let phone = plan(Some(ymd(2024, 1, 15)), 15, Some(12), 1000);

    let o = installments::overview(&[rent, salary, paused, phone], today);
    let exp: Vec<&str> = o.expenses.iter().map(|s| s.rule.id.as_str()).collect();
    assert_eq!(exp, vec!["rent", "r1"]);
    assert_eq!(o.income.len(), 1);
    assert_eq!(o.monthly_expense, Decimal::from(19000));
    assert_eq!(o.monthly_income, Decimal::from(52000));
    assert!(o.expenses[0].schedule.is_none());
    assert_eq!(o.expenses[1].schedule.as_ref().unwrap().paid_periods, 6);
}

#[test]
fn huge_plan_amounts_saturate_instead_of_panicking() {
    let row = json!({
        "id": "big",
        "amount": 5e28,
        "dayOfMonth": 1,
        "startDate": "2024-01-01",
        "endDate": "2024-12-01",
    });
    let rule = wire::parse_recurring(&row);
    let s = schedule(&rule, ymd(2024, 6, 20)).unwrap();
    assert_eq!(s.paid_periods, 6);
    assert_eq!(s.paid_amount, Decimal::MAX);
    assert_eq!(s.remaining_amount, Decimal::MAX);
    assert_eq!(s.total_amount, Decimal::MAX);

    let mut twin = rule.clone();
    twin.id = "big2".into();
    let o = installments::overview(&[rule, twin], ymd(2024, 6, 20));
    assert_eq!(o.monthly_expense, Decimal::MAX);
}
