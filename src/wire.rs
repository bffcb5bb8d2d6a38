// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JSON shapes exchanged with the sheet-backed web app, and the coercions
//! that turn its loosely typed rows into domain records.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};

use crate::dates::{self, DateInput};
use crate::models::{
    Category, RecurringDraft, RecurringRule, Transaction, TransactionDraft, TxKind,
};
use crate::store::StoreError;

static SHEET_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("sheet timestamp pattern")
});

fn snippet(body: &str) -> String {
    body.chars().take(100).collect()
}

/// Unwrap a list response. The web app answers either with a bare array or
/// with `{status, data, message}`; an error status never yields records.
pub fn decode_list(body: &str) -> Result<Vec<Value>, StoreError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|_| StoreError::Malformed(snippet(body)))?;
    match parsed {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => {
            check_status(&obj)?;
            match obj.remove("data") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(StoreError::UnexpectedShape),
            }
        }
        _ => Err(StoreError::UnexpectedShape),
    }
}

/// Check the reply to a mutating call.
pub fn decode_ack(body: &str) -> Result<Value, StoreError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|_| StoreError::Malformed(snippet(body)))?;
    if let Value::Object(obj) = &parsed {
        check_status(obj)?;
    }
    Ok(parsed)
}

fn check_status(obj: &Map<String, Value>) -> Result<(), StoreError> {
    if obj.get("status").and_then(Value::as_str) == Some("error") {
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("operation failed");
        return Err(StoreError::Remote(message.to_string()));
    }
    Ok(())
}

/// Numbers and numeric strings become decimals; anything else counts as zero.
pub fn coerce_amount(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

pub fn coerce_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_u32(v: &Value) -> Option<u32> {
    let n = match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    n.and_then(|n| u32::try_from(n).ok())
}

/// Sheet timestamps (`YYYY-MM-DD HH:MM:SS`) are rewritten to the ISO shape so
/// they compare lexicographically against ISO values from newer rows.
pub fn normalize_created_at(v: &Value) -> Option<String> {
    let raw = coerce_string(v);
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if SHEET_TIMESTAMP.is_match(s) {
        return Some(format!("{}.000Z", s.replacen(' ', "T", 1)));
    }
    Some(s.to_string())
}

fn field<'a>(obj: &'a Value, key: &str) -> &'a Value {
    obj.get(key).unwrap_or(&Value::Null)
}

/// Turn one raw row into a transaction; `None` when its date is unusable.
pub fn parse_transaction(raw: &Value) -> Option<Transaction> {
    let date = dates::normalize(DateInput::from_json(field(raw, "date")))?;
    Some(Transaction {
        id: coerce_string(field(raw, "id")),
        amount: coerce_amount(field(raw, "amount")),
        category: Category::from_label(&coerce_string(field(raw, "category"))),
        kind: TxKind::from_label(&coerce_string(field(raw, "type"))),
        date,
        note: coerce_string(field(raw, "note")),
        created_at: normalize_created_at(field(raw, "createdAt")),
    })
}

fn is_inactive(v: &Value) -> bool {
    match v {
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("false"),
        _ => false,
    }
}

pub fn parse_recurring(raw: &Value) -> RecurringRule {
    let start_date = dates::normalize(DateInput::from_json(field(raw, "startDate")));
    let end_date = dates::normalize(DateInput::from_json(field(raw, "endDate")));
    // The sheet stores an end date rather than a period count.
    let total_periods = coerce_u32(field(raw, "totalPeriods"))
        .filter(|n| *n > 0)
        .or_else(|| match (start_date, end_date) {
            (Some(s), Some(e)) => Some(dates::month_span(s, e).max(1) as u32),
            _ => None,
        });
    let total_amount = Some(coerce_amount(field(raw, "totalAmount"))).filter(|t| !t.is_zero());

    RecurringRule {
        id: coerce_string(field(raw, "id")),
        amount: coerce_amount(field(raw, "amount")),
        category: Category::from_label(&coerce_string(field(raw, "category"))),
        kind: TxKind::from_label(&coerce_string(field(raw, "type"))),
        note: coerce_string(field(raw, "note")),
        day_of_month: coerce_u32(field(raw, "dayOfMonth"))
            .filter(|d| *d > 0)
            .unwrap_or(1),
        is_active: !is_inactive(field(raw, "isActive")),
        start_date,
        total_periods,
        total_amount,
    }
}

/// Amounts go out as JSON numbers; the sheet does arithmetic on them.
pub fn amount_json(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return json!(i);
        }
    }
    d.to_f64().map(|f| json!(f)).unwrap_or_else(|| json!(d.to_string()))
}

pub fn transaction_payload(id: Option<&str>, draft: &TransactionDraft) -> Value {
    let mut data = json!({
        "amount": amount_json(draft.amount),
        "category": draft.category.label(),
        "date": dates::format_date(draft.date),
        "note": draft.note.clone().unwrap_or_default(),
        "type": draft.kind.label(),
    });
    if let Some(id) = id {
        data["id"] = json!(id);
    }
    data
}

pub fn recurring_payload(id: Option<&str>, draft: &RecurringDraft) -> Value {
    let mut data = json!({
        "category": draft.category.label(),
        "amount": amount_json(draft.amount),
        "note": draft.note.clone().unwrap_or_default(),
        "type": draft.kind.label(),
        "dayOfMonth": draft.day_of_month,
        "isActive": draft.is_active,
    });
    if let Some(id) = id {
        data["id"] = json!(id);
    }
    if let Some(start) = draft.start_date {
        data["startDate"] = json!(dates::format_date(start));
    }
    if let Some(end) = draft.end_date() {
        data["endDate"] = json!(dates::format_date(end));
    }
    if let Some(total) = draft.total_amount {
        data["totalAmount"] = amount_json(total);
    }
    data
}

pub fn request(action: &str, data: Option<Value>) -> Value {
    match data {
        Some(data) => json!({ "action": action, "data": data }),
        None => json!({ "action": action }),
    }
}
