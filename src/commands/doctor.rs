// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store::RecordStore;
use crate::utils::pretty_table;
use anyhow::Result;
use tracing::debug;

pub fn handle<S: RecordStore>(ledger: &Ledger<S>) -> Result<()> {
    let rows = issues(ledger);
    debug!(issues = rows.len(), "doctor finished");
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "ID", "Detail"], rows));
    }
    Ok(())
}

pub fn issues<S: RecordStore>(ledger: &Ledger<S>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Transactions left out of every summary because of their date
    for d in ledger.dropped() {
        rows.push(vec!["unusable_date".into(), d.id.clone(), d.date.to_string()]);
    }

    // 2) Installment plans that cannot be scheduled
    for r in ledger.recurring() {
        if r.total_periods.is_some() && r.start_date.is_none() {
            rows.push(vec![
                "plan_without_start".into(),
                r.id.clone(),
                format!("{} periods, no start date", r.total_periods.unwrap_or_default()),
            ]);
        }
        if !(1..=31).contains(&r.day_of_month) {
            rows.push(vec![
                "bad_day_of_month".into(),
                r.id.clone(),
                r.day_of_month.to_string(),
            ]);
        }
    }
    rows
}
