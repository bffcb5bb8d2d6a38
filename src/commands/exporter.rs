// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::sort_recent;
use crate::dates;
use crate::ledger::Ledger;
use crate::models::Transaction;
use crate::store::RecordStore;
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing::info;

pub fn handle<S: RecordStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let rows = sort_recent(ledger.transactions());
    match fmt.as_str() {
        "csv" => write_csv(&rows, Path::new(out))?,
        "json" => write_json(&rows, Path::new(out))?,
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    info!(format = %fmt, path = out, count = rows.len(), "export written");
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

pub fn write_csv(rows: &[&Transaction], out: &Path) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(out).with_context(|| format!("Create {}", out.display()))?;
    wtr.write_record(["id", "date", "type", "category", "amount", "note", "createdAt"])?;
    for t in rows {
        let date = dates::format_date(t.date);
        let amount = t.amount.to_string();
        wtr.write_record([
            t.id.as_str(),
            date.as_str(),
            t.kind.label(),
            t.category.label(),
            amount.as_str(),
            t.note.as_str(),
            t.created_at.as_deref().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json(rows: &[&Transaction], out: &Path) -> Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(rows)?)
        .with_context(|| format!("Write {}", out.display()))?;
    Ok(())
}
