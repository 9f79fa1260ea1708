//! Persisted report snapshots
//!
//! A report stores the aggregator's computed totals verbatim alongside its
//! own metadata. It is a point-in-time snapshot: regenerating over the same
//! period produces a new report rather than refreshing an old one.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reporting::aggregator::{BalanceSheet, ProfitAndLoss};
use crate::types::{BooksError, BooksResult, ReportStatus};

/// Which statement a report carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    ProfitAndLoss,
    BalanceSheet,
}

/// The computed totals a report snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportBody {
    ProfitAndLoss(ProfitAndLoss),
    BalanceSheet(BalanceSheet),
}

impl ReportBody {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportBody::ProfitAndLoss(_) => ReportKind::ProfitAndLoss,
            ReportBody::BalanceSheet(_) => ReportKind::BalanceSheet,
        }
    }

    /// Advisory balance flag; only balance sheets carry one
    pub fn balance_flag(&self) -> Option<bool> {
        match self {
            ReportBody::ProfitAndLoss(_) => None,
            ReportBody::BalanceSheet(sheet) => Some(sheet.is_balanced),
        }
    }
}

/// A generated financial report with its audit metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub id: Uuid,
    /// Display name, e.g. "P&L March 2024"
    pub name: String,
    /// Who requested the generation
    pub generated_by: String,
    pub generated_at: NaiveDateTime,
    /// Lifecycle status; unbalanced sheets stay in Draft for investigation
    pub status: ReportStatus,
    pub body: ReportBody,
}

impl FinancialReport {
    /// Wrap computed totals in a new draft report
    pub fn new(name: String, generated_by: String, body: ReportBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            generated_by,
            generated_at: chrono::Utc::now().naive_utc(),
            status: ReportStatus::Draft,
            body,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.body.kind()
    }

    /// Transition `Draft -> Finalized`.
    ///
    /// The only defined transition; finalizing a finalized report fails and
    /// leaves the report untouched.
    pub fn finalize(&mut self) -> BooksResult<()> {
        match self.status {
            ReportStatus::Draft => {
                self.status = ReportStatus::Finalized;
                Ok(())
            }
            ReportStatus::Finalized => Err(BooksError::InvalidTransition(format!(
                "report '{}' is already finalized",
                self.name
            ))),
        }
    }
}
