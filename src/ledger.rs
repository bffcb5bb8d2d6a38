// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The working snapshot. Reads come from the last refresh; every change is
//! sent to the store first and followed by a refresh, so the snapshot is
//! never edited in place. Mutations hand back the report of that refresh.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::aggregate::{self, MonthView, Summary};
use crate::installments::{self, RecurringOverview};
use crate::models::{DraftError, RecurringDraft, RecurringRule, Transaction, TransactionDraft};
use crate::store::{RecordStore, StoreError};
use crate::wire;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no transaction with id '{0}'")]
    UnknownTransaction(String),
    #[error("no recurring item with id '{0}'")]
    UnknownRecurring(String),
}

/// A stored row that could not be used, kept so it can be reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    pub id: String,
    pub date: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshReport {
    pub transactions: usize,
    pub recurring: usize,
    pub dropped: usize,
    /// Fetch failures; the affected collection is left empty.
    pub warnings: Vec<String>,
}

pub struct Ledger<S> {
    store: S,
    transactions: Vec<Transaction>,
    recurring: Vec<RecurringRule>,
    dropped: Vec<DroppedRow>,
}

impl<S: RecordStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Ledger {
            store,
            transactions: Vec::new(),
            recurring: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn recurring(&self) -> &[RecurringRule] {
        &self.recurring
    }

    pub fn dropped(&self) -> &[DroppedRow] {
        &self.dropped
    }

    /// Reload both collections. A failed fetch empties that collection
    /// instead of failing the whole refresh.
    pub fn refresh(&mut self) -> RefreshReport {
        let mut report = RefreshReport::default();
        self.transactions.clear();
        self.dropped.clear();
        self.recurring.clear();

        match self.store.fetch_transactions() {
            Ok(rows) => {
                for row in rows {
                    match wire::parse_transaction(&row) {
                        Some(tx) => self.transactions.push(tx),
                        None => {
                            let dropped = DroppedRow {
                                id: row.get("id").map(wire::coerce_string).unwrap_or_default(),
                                date: row.get("date").cloned().unwrap_or(Value::Null),
                            };
                            warn!(
                                id = %dropped.id,
                                date = %dropped.date,
                                "dropping transaction with unusable date"
                            );
                            self.dropped.push(dropped);
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "could not load transactions");
                report.warnings.push(format!("transactions: {}", e));
            }
        }

        match self.store.fetch_recurring() {
            Ok(rows) => {
                self.recurring = rows.iter().map(wire::parse_recurring).collect();
            }
            Err(e) => {
                warn!(error = %e, "could not load recurring items");
                report.warnings.push(format!("recurring: {}", e));
            }
        }

        report.transactions = self.transactions.len();
        report.recurring = self.recurring.len();
        report.dropped = self.dropped.len();
        debug!(?report, "snapshot refreshed");
        report
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        aggregate::aggregate(&self.transactions, today)
    }

    pub fn months(&self) -> Vec<String> {
        aggregate::months(&self.transactions)
    }

    pub fn month_view(&self, month: Option<&str>, today: NaiveDate) -> MonthView {
        let month = month
            .map(str::to_string)
            .unwrap_or_else(|| aggregate::default_month(&self.transactions, today));
        aggregate::month_view(&self.transactions, &month)
    }

    pub fn recurring_overview(&self, today: NaiveDate) -> RecurringOverview {
        installments::overview(&self.recurring, today)
    }

    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn find_recurring(&self, id: &str) -> Option<&RecurringRule> {
        self.recurring.iter().find(|r| r.id == id)
    }

    pub fn add_transaction(
        &mut self,
        draft: &TransactionDraft,
    ) -> Result<RefreshReport, LedgerError> {
        draft.validate()?;
        self.store.add_transaction(draft)?;
        Ok(self.refresh())
    }

    pub fn update_transaction(
        &mut self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<RefreshReport, LedgerError> {
        draft.validate()?;
        if self.find_transaction(id).is_none() {
            return Err(LedgerError::UnknownTransaction(id.to_string()));
        }
        self.store.update_transaction(id, draft)?;
        Ok(self.refresh())
    }

    /// Rows dropped for a bad date can still be deleted.
    pub fn delete_transaction(&mut self, id: &str) -> Result<RefreshReport, LedgerError> {
        if self.find_transaction(id).is_none() && !self.dropped.iter().any(|d| d.id == id) {
            return Err(LedgerError::UnknownTransaction(id.to_string()));
        }
        self.store.delete_transaction(id)?;
        Ok(self.refresh())
    }

    pub fn add_recurring(
        &mut self,
        draft: &RecurringDraft,
    ) -> Result<RefreshReport, LedgerError> {
        draft.validate()?;
        self.store.add_recurring(draft)?;
        Ok(self.refresh())
    }

    pub fn update_recurring(
        &mut self,
        id: &str,
        draft: &RecurringDraft,
    ) -> Result<RefreshReport, LedgerError> {
        draft.validate()?;
        if self.find_recurring(id).is_none() {
            return Err(LedgerError::UnknownRecurring(id.to_string()));
        }
        self.store.update_recurring(id, draft)?;
        Ok(self.refresh())
    }

    pub fn delete_recurring(&mut self, id: &str) -> Result<RefreshReport, LedgerError> {
        if self.find_recurring(id).is_none() {
            return Err(LedgerError::UnknownRecurring(id.to_string()));
        }
        self.store.delete_recurring(id)?;
        Ok(self.refresh())
    }
}
