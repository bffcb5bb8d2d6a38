// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tallybook::commands::{doctor, recurring, summary, transactions};
use tallybook::ledger::Ledger;
use tallybook::models::{Category, TxKind};
use tallybook::store::MemoryStore;
use tallybook::cli;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> Ledger<MemoryStore> {
    let store = MemoryStore::with_records(
        vec![
            json!({"id": "1", "amount": 1500, "category": "三餐", "type": "支出",
                   "date": "2024-06-18", "note": "dinner"}),
            json!({"id": "2", "amount": 500, "category": "交通", "type": "支出",
                   "date": "2024-06-19"}),
            json!({"id": "3", "amount": 40, "category": "交通", "type": "支出",
                   "date": "2024-04-02"}),
            json!({"id": "4", "amount": 10, "date": "not a date"}),
        ],
        vec![
            json!({"id": "r1", "amount": 1000, "category": "居家生活", "type": "支出",
                   "dayOfMonth": 15, "startDate": "2024-01-15", "endDate": "2024-12-15"}),
            json!({"id": "r2", "amount": 300, "totalPeriods": 4, "dayOfMonth": 40}),
        ],
    );
    let mut ledger = Ledger::new(store);
    ledger.refresh();
    ledger
}

fn sub(args: &[&str], path: &[&str]) -> clap::ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args.iter().copied());
    for name in path {
        m = m.subcommand_matches(name).unwrap().clone();
    }
    m
}

#[test]
fn tx_add_arguments_build_a_draft() {
    let m = sub(
        &["tallybook", "tx", "add", "--amount", "120.5", "--category", "meals",
          "--date", "2024-06-01", "--note", " noodles "],
        &["tx", "add"],
    );
    let d = transactions::draft_from_args(&m, None).unwrap();
    assert_eq!(d.amount, Decimal::new(1205, 1));
    assert_eq!(d.category, Category::Meals);
    assert_eq!(d.kind, TxKind::Expense);
    assert_eq!(d.date, ymd(2024, 6, 1));
    assert_eq!(d.note.as_deref(), Some("noodles"));

    let m = sub(
        &["tallybook", "tx", "add", "--amount", "3000", "--category", "薪水",
          "--date", "2024-06-05", "--type", "收入"],
        &["tx", "add"],
    );
    let d = transactions::draft_from_args(&m, None).unwrap();
    assert_eq!(d.kind, TxKind::Income);
    assert_eq!(d.category, Category::Salary);
}

#[test]
fn tx_add_rejects_bad_values() {
    let m = sub(
        &["tallybook", "tx", "add", "--amount", "10", "--category", "pets",
          "--date", "2024-06-01"],
        &["tx", "add"],
    );
    assert!(transactions::draft_from_args(&m, None).is_err());

    let m = sub(
        &["tallybook", "tx", "add", "--amount", "10", "--category", "meals",
          "--date", "2024-02-30"],
        &["tx", "add"],
    );
    assert!(transactions::draft_from_args(&m, None).is_err());

    let m = sub(
        &["tallybook", "tx", "add", "--amount", "ten", "--category", "meals",
          "--date", "2024-06-01"],
        &["tx", "add"],
    );
    assert!(transactions::draft_from_args(&m, None).is_err());
}

#[test]
fn tx_edit_keeps_omitted_fields() {
    let ledger = setup();
    let existing = ledger.find_transaction("1").unwrap();
    let m = sub(
        &["tallybook", "tx", "edit", "--id", "1", "--amount", "1800"],
        &["tx", "edit"],
    );
    let d = transactions::draft_from_args(&m, Some(existing)).unwrap();
    assert_eq!(d.amount, Decimal::from(1800));
    assert_eq!(d.category, Category::Meals);
    assert_eq!(d.date, ymd(2024, 6, 18));
    assert_eq!(d.note.as_deref(), Some("dinner"));
}

#[test]
fn tx_list_defaults_to_newest_month() {
    let ledger = setup();
    let m = sub(&["tallybook", "tx", "list", "--today", "2024-09-01"], &["tx", "list"]);
    let view = transactions::query_view(&ledger, &m).unwrap();
    assert_eq!(view.month, "2024-06");
    assert_eq!(view.expense_total, Decimal::from(2000));

    let rows = transactions::view_rows(&view, ymd(2024, 6, 19));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "today");
    assert_eq!(rows[0][5], "-NT$500");
    assert_eq!(rows[1][1], "yesterday");

    let m = sub(&["tallybook", "tx", "list", "--month", "2024-04"], &["tx", "list"]);
    assert_eq!(transactions::query_view(&ledger, &m).unwrap().count, 1);

    let m = sub(&["tallybook", "tx", "list", "--month", "2024-13"], &["tx", "list"]);
    assert!(transactions::query_view(&ledger, &m).is_err());
}

#[test]
fn summary_rows() {
    let ledger = setup();
    let s = ledger.summary(ymd(2024, 6, 20));
    let rows = summary::category_rows(&s);
    assert_eq!(rows[0], vec!["三餐", "NT$1,500", "75.0%"]);
    assert_eq!(rows[1], vec!["交通", "NT$500", "25.0%"]);
    let recent = summary::recent_rows(&s, ymd(2024, 6, 20));
    assert_eq!(recent[0][0], "yesterday");
}

#[test]
fn recurring_arguments_build_a_plan() {
    let m = sub(
        &["tallybook", "recurring", "add", "--amount", "1000", "--category", "household",
          "--day", "15", "--periods", "12", "--start", "2024-01-15"],
        &["recurring", "add"],
    );
    let d = recurring::draft_from_args(&m, None).unwrap();
    assert!(d.is_active);
    assert_eq!(d.total_periods, Some(12));
    assert_eq!(d.end_date(), Some(ymd(2024, 12, 15)));
    assert!(d.validate().is_ok());
}

#[test]
fn recurring_edit_toggles_activity() {
    let ledger = setup();
    let existing = ledger.find_recurring("r1").unwrap();
    let m = sub(
        &["tallybook", "recurring", "edit", "--id", "r1", "--inactive"],
        &["recurring", "edit"],
    );
    let d = recurring::draft_from_args(&m, Some(existing)).unwrap();
    assert!(!d.is_active);
    assert_eq!(d.amount, Decimal::from(1000));
    assert_eq!(d.start_date, Some(ymd(2024, 1, 15)));
    assert_eq!(d.total_periods, Some(12));
}

#[test]
fn recurring_edit_can_drop_the_plan() {
    let mut ledger = setup();
    let existing = ledger.find_recurring("r1").unwrap().clone();
    let m = sub(
        &["tallybook", "recurring", "edit", "--id", "r1", "--no-plan"],
        &["recurring", "edit"],
    );
    let d = recurring::draft_from_args(&m, Some(&existing)).unwrap();
    assert_eq!(d.start_date, None);
    assert_eq!(d.total_periods, None);
    assert_eq!(d.total_amount, None);
    assert_eq!(d.amount, Decimal::from(1000));
    assert!(d.validate().is_ok());

    ledger.update_recurring("r1", &d).unwrap();
    let rule = ledger.find_recurring("r1").unwrap();
    assert!(!rule.is_installment());
    let o = ledger.recurring_overview(ymd(2024, 6, 20));
    assert!(o.expenses[0].schedule.is_none());
}

#[test]
fn no_plan_conflicts_with_plan_fields() {
    let res = cli::build_cli().try_get_matches_from([
        "tallybook", "recurring", "edit", "--id", "r1", "--no-plan", "--periods", "6",
    ]);
    assert!(res.is_err());
}

#[test]
fn recurring_status_rows() {
    let ledger = setup();
    let o = ledger.recurring_overview(ymd(2024, 6, 20));
    let rows = recurring::status_rows(&o.expenses);
    assert_eq!(rows[0][4], "6/12");
    assert_eq!(rows[0][5], "NT$6,000 / NT$6,000");
    assert_eq!(rows[0][6], "2024-01-15 - 2024-12-15");
    assert_eq!(rows[1][4], "ongoing");
}

#[test]
fn doctor_lists_unusable_rows() {
    let ledger = setup();
    let issues = doctor::issues(&ledger);
    let kinds: Vec<(&str, &str)> = issues
        .iter()
        .map(|r| (r[0].as_str(), r[1].as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("unusable_date", "4"),
            ("plan_without_start", "r2"),
            ("bad_day_of_month", "r2"),
        ]
    );
}
