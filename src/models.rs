// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    #[default]
    #[serde(rename = "支出", alias = "expense")]
    Expense,
    #[serde(rename = "收入", alias = "income")]
    Income,
}

impl TxKind {
    pub fn label(&self) -> &'static str {
        match self {
            TxKind::Expense => "支出",
            TxKind::Income => "收入",
        }
    }

    /// The store treats anything that is not explicitly income as an expense.
    pub fn from_label(s: &str) -> Self {
        match s.trim() {
            "收入" => TxKind::Income,
            s if s.eq_ignore_ascii_case("income") => TxKind::Income,
            _ => TxKind::Expense,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "支出" => Some(TxKind::Expense),
            "收入" => Some(TxKind::Income),
            s if s.eq_ignore_ascii_case("expense") => Some(TxKind::Expense),
            s if s.eq_ignore_ascii_case("income") => Some(TxKind::Income),
            _ => None,
        }
    }
}

/// The fixed category set. Declaration order is the display order and the
/// tie-break for equal category totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "三餐", alias = "meals")]
    Meals,
    #[serde(rename = "食品飲料", alias = "groceries")]
    Groceries,
    #[serde(rename = "交通", alias = "transport")]
    Transport,
    #[serde(rename = "居家生活", alias = "household")]
    Household,
    #[serde(rename = "娛樂休閒", alias = "leisure")]
    Leisure,
    #[serde(rename = "美妝服飾", alias = "apparel")]
    Apparel,
    #[serde(rename = "教育學習", alias = "education")]
    Education,
    #[serde(rename = "小孩", alias = "kids")]
    Kids,
    #[serde(rename = "醫療藥品", alias = "medical")]
    Medical,
    #[serde(rename = "水電居住", alias = "housing")]
    Housing,
    #[serde(rename = "禮金禮物", alias = "gifts")]
    Gifts,
    #[serde(rename = "社交", alias = "social")]
    Social,
    #[serde(rename = "薪水", alias = "salary")]
    Salary,
    #[serde(rename = "投資", alias = "investment")]
    Investment,
    #[serde(rename = "其他雜項", alias = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Meals,
        Category::Groceries,
        Category::Transport,
        Category::Household,
        Category::Leisure,
        Category::Apparel,
        Category::Education,
        Category::Kids,
        Category::Medical,
        Category::Housing,
        Category::Gifts,
        Category::Social,
        Category::Salary,
        Category::Investment,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Meals => "三餐",
            Category::Groceries => "食品飲料",
            Category::Transport => "交通",
            Category::Household => "居家生活",
            Category::Leisure => "娛樂休閒",
            Category::Apparel => "美妝服飾",
            Category::Education => "教育學習",
            Category::Kids => "小孩",
            Category::Medical => "醫療藥品",
            Category::Housing => "水電居住",
            Category::Gifts => "禮金禮物",
            Category::Social => "社交",
            Category::Salary => "薪水",
            Category::Investment => "投資",
            Category::Other => "其他雜項",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Meals => "meals",
            Category::Groceries => "groceries",
            Category::Transport => "transport",
            Category::Household => "household",
            Category::Leisure => "leisure",
            Category::Apparel => "apparel",
            Category::Education => "education",
            Category::Kids => "kids",
            Category::Medical => "medical",
            Category::Housing => "housing",
            Category::Gifts => "gifts",
            Category::Social => "social",
            Category::Salary => "salary",
            Category::Investment => "investment",
            Category::Other => "other",
        }
    }

    /// Exact label or slug match; `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
    }

    /// Boundary normalization for stored records: blank and unknown labels
    /// land in the `Other` bucket.
    pub fn from_label(s: &str) -> Self {
        Category::parse(s).unwrap_or(Category::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub id: String,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TxKind,
    #[serde(default)]
    pub note: String,
    pub day_of_month: u32,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_periods: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
}

impl RecurringRule {
    /// A finite installment plan rather than an open-ended recurring item.
    pub fn is_installment(&self) -> bool {
        self.total_periods.is_some() && self.start_date.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("amount must be a non-zero number")]
    ZeroAmount,
    #[error("date {0} is outside {min}-{max}", min = dates::MIN_YEAR, max = dates::MAX_YEAR)]
    DateOutOfRange(NaiveDate),
    #[error("day of month must be between 1 and 31, got {0}")]
    DayOutOfRange(u32),
    #[error("total periods must be at least 1")]
    ZeroPeriods,
    #[error("total amount must be positive, got {0}")]
    NonPositiveTotal(Decimal),
    #[error("an installment plan with total periods needs a start date")]
    PeriodsWithoutStart,
}

/// A transaction as entered by the user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub category: Category,
    pub kind: TxKind,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.amount.is_zero() {
            return Err(DraftError::ZeroAmount);
        }
        if !dates::in_range(self.date) {
            return Err(DraftError::DateOutOfRange(self.date));
        }
        Ok(())
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(t: &Transaction) -> Self {
        TransactionDraft {
            amount: t.amount,
            category: t.category,
            kind: t.kind,
            date: t.date,
            note: (!t.note.is_empty()).then(|| t.note.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringDraft {
    pub amount: Decimal,
    pub category: Category,
    pub kind: TxKind,
    pub note: Option<String>,
    pub day_of_month: u32,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub total_periods: Option<u32>,
    pub total_amount: Option<Decimal>,
}

impl RecurringDraft {
    /// Authoring-time checks. The installment calculator tolerates a rule
    /// that slipped past these, but nothing created here should need it to.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.amount.is_zero() {
            return Err(DraftError::ZeroAmount);
        }
        if !(1..=31).contains(&self.day_of_month) {
            return Err(DraftError::DayOutOfRange(self.day_of_month));
        }
        if self.total_periods == Some(0) {
            return Err(DraftError::ZeroPeriods);
        }
        if let Some(total) = self.total_amount {
            if total <= Decimal::ZERO {
                return Err(DraftError::NonPositiveTotal(total));
            }
        }
        if self.total_periods.is_some() && self.start_date.is_none() {
            return Err(DraftError::PeriodsWithoutStart);
        }
        if let Some(start) = self.start_date {
            if !dates::in_range(start) {
                return Err(DraftError::DateOutOfRange(start));
            }
        }
        Ok(())
    }

    /// Last scheduled payment date of an installment plan.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let start = self.start_date?;
        let periods = self.total_periods.filter(|n| *n > 0)?;
        dates::add_months(start, periods - 1)
    }
}

impl From<&RecurringRule> for RecurringDraft {
    fn from(r: &RecurringRule) -> Self {
        RecurringDraft {
            amount: r.amount,
            category: r.category,
            kind: r.kind,
            note: (!r.note.is_empty()).then(|| r.note.clone()),
            day_of_month: r.day_of_month,
            is_active: r.is_active,
            start_date: r.start_date,
            total_periods: r.total_periods,
            total_amount: r.total_amount,
        }
    }
}
