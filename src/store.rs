// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The remote record store. The spreadsheet web app is authoritative; this
//! side only lists rows and forwards create/update/delete requests.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{RecurringDraft, TransactionDraft};
use crate::utils::http_client;
use crate::wire;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store answered HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("could not parse store response: {0}")]
    Malformed(String),
    #[error("store reported an error: {0}")]
    Remote(String),
    #[error("store response has an unexpected shape")]
    UnexpectedShape,
    #[error("no record with id '{0}'")]
    NotFound(String),
}

/// Rows come back raw so the caller decides what to keep.
pub trait RecordStore {
    fn fetch_transactions(&self) -> Result<Vec<Value>, StoreError>;
    fn add_transaction(&mut self, draft: &TransactionDraft) -> Result<(), StoreError>;
    fn update_transaction(&mut self, id: &str, draft: &TransactionDraft)
    -> Result<(), StoreError>;
    fn delete_transaction(&mut self, id: &str) -> Result<(), StoreError>;

    fn fetch_recurring(&self) -> Result<Vec<Value>, StoreError>;
    fn add_recurring(&mut self, draft: &RecurringDraft) -> Result<(), StoreError>;
    fn update_recurring(&mut self, id: &str, draft: &RecurringDraft) -> Result<(), StoreError>;
    fn delete_recurring(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Client for the spreadsheet web-app endpoint. Reads of transactions use
/// `GET ?action=...`; everything else is a `POST` of `{action, data}` sent as
/// `text/plain` so browsers and the web app skip CORS preflight handling.
pub struct SheetStore {
    client: Client,
    base_url: String,
}

impl SheetStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        Ok(SheetStore {
            client: http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn read(&self, resp: reqwest::blocking::Response) -> Result<String, StoreError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status(status));
        }
        Ok(resp.text()?)
    }

    fn post(&self, action: &str, data: Option<Value>) -> Result<String, StoreError> {
        let body = wire::request(action, data);
        debug!(action, "posting to store");
        let resp = self
            .client
            .post(&self.base_url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body.to_string())
            .send()?;
        self.read(resp)
    }

    fn mutate(&self, action: &str, data: Value) -> Result<(), StoreError> {
        let body = self.post(action, Some(data))?;
        wire::decode_ack(&body)?;
        info!(action, "store accepted change");
        Ok(())
    }
}

impl RecordStore for SheetStore {
    fn fetch_transactions(&self) -> Result<Vec<Value>, StoreError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("action", "getTransactions")])
            .header(CONTENT_TYPE, "text/plain")
            .send()?;
        let body = self.read(resp)?;
        wire::decode_list(&body)
    }

    fn add_transaction(&mut self, draft: &TransactionDraft) -> Result<(), StoreError> {
        self.mutate("addTransaction", wire::transaction_payload(None, draft))
    }

    fn update_transaction(
        &mut self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<(), StoreError> {
        self.mutate("updateTransaction", wire::transaction_payload(Some(id), draft))
    }

    fn delete_transaction(&mut self, id: &str) -> Result<(), StoreError> {
        self.mutate("deleteTransaction", serde_json::json!({ "id": id }))
    }

    fn fetch_recurring(&self) -> Result<Vec<Value>, StoreError> {
        let body = self.post("getRecurringTransactions", None)?;
        wire::decode_list(&body)
    }

    fn add_recurring(&mut self, draft: &RecurringDraft) -> Result<(), StoreError> {
        self.mutate("addRecurringTransaction", wire::recurring_payload(None, draft))
    }

    fn update_recurring(&mut self, id: &str, draft: &RecurringDraft) -> Result<(), StoreError> {
        self.mutate(
            "updateRecurringTransaction",
            wire::recurring_payload(Some(id), draft),
        )
    }

    fn delete_recurring(&mut self, id: &str) -> Result<(), StoreError> {
        self.mutate("deleteRecurringTransaction", serde_json::json!({ "id": id }))
    }
}

/// In-process store holding rows in the same JSON shape the web app uses.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    transactions: Vec<Value>,
    recurring: Vec<Value>,
    next_id: u64,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(transactions: Vec<Value>, recurring: Vec<Value>) -> Self {
        MemoryStore {
            transactions,
            recurring,
            ..Self::default()
        }
    }

    /// Every call answers as if the web app returned an error envelope.
    pub fn failing(message: impl Into<String>) -> Self {
        MemoryStore {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn transactions(&self) -> &[Value] {
        &self.transactions
    }

    pub fn recurring(&self) -> &[Value] {
        &self.recurring
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(msg) => Err(StoreError::Remote(msg.clone())),
            None => Ok(()),
        }
    }

    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        format!("mem-{}", self.next_id)
    }
}

fn position(rows: &[Value], id: &str) -> Result<usize, StoreError> {
    rows.iter()
        .position(|r| r.get("id").map(wire::coerce_string).as_deref() == Some(id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

impl RecordStore for MemoryStore {
    fn fetch_transactions(&self) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        Ok(self.transactions.clone())
    }

    fn add_transaction(&mut self, draft: &TransactionDraft) -> Result<(), StoreError> {
        self.check()?;
        let id = self.assign_id();
        self.transactions
            .push(wire::transaction_payload(Some(&id), draft));
        Ok(())
    }

    fn update_transaction(
        &mut self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<(), StoreError> {
        self.check()?;
        let idx = position(&self.transactions, id)?;
        let created_at = self.transactions[idx].get("createdAt").cloned();
        let mut row = wire::transaction_payload(Some(id), draft);
        if let Some(c) = created_at {
            row["createdAt"] = c;
        }
        self.transactions[idx] = row;
        Ok(())
    }

    fn delete_transaction(&mut self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let idx = position(&self.transactions, id)?;
        self.transactions.remove(idx);
        Ok(())
    }

    fn fetch_recurring(&self) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        Ok(self.recurring.clone())
    }

    fn add_recurring(&mut self, draft: &RecurringDraft) -> Result<(), StoreError> {
        self.check()?;
        let id = self.assign_id();
        self.recurring.push(wire::recurring_payload(Some(&id), draft));
        Ok(())
    }

    fn update_recurring(&mut self, id: &str, draft: &RecurringDraft) -> Result<(), StoreError> {
        self.check()?;
        let idx = position(&self.recurring, id)?;
        self.recurring[idx] = wire::recurring_payload(Some(id), draft);
        Ok(())
    }

    fn delete_recurring(&mut self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let idx = position(&self.recurring, id)?;
        self.recurring.remove(idx);
        Ok(())
    }
}
