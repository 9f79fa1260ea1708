//! Customers and suppliers, and the subledger view behind their control accounts
//!
//! Every party is linked to a control account in the chart (accounts
//! receivable for customers, accounts payable for suppliers). The detailed
//! per-party history lives in ordinary transactions tagged with the party's
//! ID; the statement here is the subledger read over those transactions.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::traits::BooksStorage;
use crate::types::{BooksError, BooksResult, Transaction, TransactionStatus};

/// Which side of the business a party sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyKind {
    /// Buys print work from us; tracked through accounts receivable
    Customer,
    /// Sells stock or services to us; tracked through accounts payable
    Supplier,
}

/// Lifecycle status of a party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyStatus {
    Active,
    Archived,
}

/// Contact details kept on file for a party
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A customer or supplier of the print shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    pub kind: PartyKind,
    pub contact: ContactInfo,
    /// Chart account this party's balance rolls up into
    pub control_account_code: String,
    pub status: PartyStatus,
    pub notes: Option<String>,
    pub metadata: HashMap<String, String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Party {
    /// Create a new active party
    pub fn new(name: String, kind: PartyKind, control_account_code: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            contact: ContactInfo::default(),
            control_account_code,
            status: PartyStatus::Active,
            notes: None,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether new transactions may reference this party
    pub fn can_transact(&self) -> bool {
        self.status == PartyStatus::Active
    }

    /// Archive the party. Archived parties keep their history but cannot be
    /// referenced by new transactions.
    pub fn archive(&mut self) {
        self.status = PartyStatus::Archived;
        self.updated_at = Utc::now().naive_utc();
    }

    /// Bring an archived party back into use
    pub fn reactivate(&mut self) {
        self.status = PartyStatus::Active;
        self.updated_at = Utc::now().naive_utc();
    }
}

/// One movement on a party's control account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    pub date: NaiveDate,
    pub transaction_id: String,
    pub description: String,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    /// Balance after this line, in the party's natural orientation
    pub running_balance: BigDecimal,
}

/// Subledger statement for a single party over a period
///
/// Balances are oriented so that a positive number means "money owed in the
/// party's direction": what the customer owes us, or what we owe the
/// supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyStatement {
    pub party_id: Uuid,
    pub party_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub opening_balance: BigDecimal,
    pub lines: Vec<StatementLine>,
    pub closing_balance: BigDecimal,
}

/// Signed movement of one control-account leg in the party's orientation.
///
/// Customers are debit-normal (an invoice debits receivables and raises what
/// they owe); suppliers are credit-normal (a bill credits payables and raises
/// what we owe).
fn signed_movement(kind: PartyKind, debit: &BigDecimal, credit: &BigDecimal) -> BigDecimal {
    match kind {
        PartyKind::Customer => debit - credit,
        PartyKind::Supplier => credit - debit,
    }
}

/// Manages parties and derives their subledger statements
pub struct PartyManager<S: BooksStorage> {
    storage: S,
}

impl<S: BooksStorage> PartyManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a new customer or supplier.
    ///
    /// The control account must already exist in the chart; linking a party
    /// to a missing account would leave its subledger orphaned.
    pub async fn create_party(
        &mut self,
        name: String,
        kind: PartyKind,
        control_account_code: String,
    ) -> BooksResult<Party> {
        if name.trim().is_empty() {
            return Err(BooksError::Validation(
                "Party name cannot be empty".to_string(),
            ));
        }

        if self
            .storage
            .get_account(&control_account_code)
            .await?
            .is_none()
        {
            return Err(BooksError::AccountNotFound(control_account_code));
        }

        let party = Party::new(name, kind, control_account_code);
        self.storage.save_party(&party).await?;
        info!(party_id = %party.id, name = %party.name, "registered party");
        Ok(party)
    }

    /// Get a party by ID
    pub async fn get_party(&self, party_id: Uuid) -> BooksResult<Party> {
        self.storage
            .get_party(party_id)
            .await?
            .ok_or(BooksError::PartyNotFound(party_id))
    }

    /// List parties, optionally restricted to one kind
    pub async fn list_parties(&self, kind: Option<PartyKind>) -> BooksResult<Vec<Party>> {
        self.storage.list_parties(kind).await
    }

    /// Update contact details and notes on an existing party
    pub async fn update_party(&mut self, party: &mut Party) -> BooksResult<()> {
        // Make sure it exists before writing
        self.get_party(party.id).await?;
        party.updated_at = Utc::now().naive_utc();
        self.storage.update_party(party).await
    }

    /// Archive a party, keeping its transaction history readable
    pub async fn archive_party(&mut self, party_id: Uuid) -> BooksResult<Party> {
        let mut party = self.get_party(party_id).await?;
        party.archive();
        self.storage.update_party(&party).await?;
        info!(party_id = %party.id, "archived party");
        Ok(party)
    }

    /// Subledger balance for a party, in its natural orientation.
    /// With `as_of` set, only transactions up to and including that date count.
    pub async fn party_balance(
        &self,
        party_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> BooksResult<BigDecimal> {
        let party = self.get_party(party_id).await?;
        let transactions = self
            .storage
            .get_party_transactions(party_id, None, as_of)
            .await?;
        Ok(Self::control_movement(&party, &transactions))
    }

    /// Build a dated statement for the party: opening balance, every
    /// control-account movement in the period, and the closing balance.
    pub async fn statement(
        &self,
        party_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> BooksResult<PartyStatement> {
        let party = self.get_party(party_id).await?;

        let prior = self
            .storage
            .get_party_transactions(party_id, None, period_start.pred_opt())
            .await?;
        let opening_balance = Self::control_movement(&party, &prior);

        let mut in_period = self
            .storage
            .get_party_transactions(party_id, Some(period_start), Some(period_end))
            .await?;
        in_period.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let mut lines = Vec::new();
        let mut running = opening_balance.clone();
        for transaction in &in_period {
            if transaction.status != TransactionStatus::Approved {
                continue;
            }
            for entry in &transaction.entries {
                if entry.account_code != party.control_account_code {
                    continue;
                }
                running += signed_movement(party.kind, &entry.debit_amount, &entry.credit_amount);
                lines.push(StatementLine {
                    date: transaction.date,
                    transaction_id: transaction.id.clone(),
                    description: transaction.description.clone(),
                    debit_amount: entry.debit_amount.clone(),
                    credit_amount: entry.credit_amount.clone(),
                    running_balance: running.clone(),
                });
            }
        }

        Ok(PartyStatement {
            party_id,
            party_name: party.name.clone(),
            period_start,
            period_end,
            opening_balance,
            closing_balance: running,
            lines,
        })
    }

    /// Sum of approved control-account movements across the given
    /// transactions, oriented for the party.
    fn control_movement(party: &Party, transactions: &[Transaction]) -> BigDecimal {
        let mut total = BigDecimal::from(0);
        for transaction in transactions {
            if transaction.status != TransactionStatus::Approved {
                continue;
            }
            for entry in &transaction.entries {
                if entry.account_code == party.control_account_code {
                    total +=
                        signed_movement(party.kind, &entry.debit_amount, &entry.credit_amount);
                }
            }
        }
        total
    }

    /// Access the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Access the underlying storage mutably
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
