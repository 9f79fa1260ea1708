//! Core types and data structures for the print-shop books

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Account classification following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Receivables, Press Equipment, etc.)
    Asset,
    /// Liabilities - what the business owes (Payables, Equipment Loans, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Revenue - money earned from printing jobs and services
    Revenue,
    /// Expenses - operating costs (Rent, Utilities, Maintenance, etc.)
    Expense,
    /// Cost of goods sold - direct costs of delivered jobs (paper, ink, outsourced runs)
    CostOfGoodsSold,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets, Expenses, and COGS normally carry debit balances;
    /// Liabilities, Equity, and Revenue normally carry credit balances.
    pub fn normal_balance(&self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense | AccountType::CostOfGoodsSold => {
                EntrySide::Debit
            }
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                EntrySide::Credit
            }
        }
    }
}

/// Account subtype used by balance-sheet classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountSubtype {
    CurrentAssets,
    FixedAssets,
    CurrentLiabilities,
    LongTermLiabilities,
    OwnersEquity,
    OperatingRevenue,
    DirectCosts,
    OperatingExpenses,
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySide {
    /// Debit - increases Assets, Expenses, and COGS
    Debit,
    /// Credit - increases Liabilities, Equity, and Revenue
    Credit,
}

/// Chart-of-accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account code, e.g. "1000"
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Subtype used when classifying balance-sheet buckets
    pub subtype: AccountSubtype,
    /// Optional parent account code for a hierarchical chart
    pub parent_code: Option<String>,
    /// Running balance, maintained as transactions are approved
    pub balance: BigDecimal,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the account was last updated
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        code: String,
        name: String,
        account_type: AccountType,
        subtype: AccountSubtype,
        parent_code: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            code,
            name,
            account_type,
            subtype,
            parent_code,
            balance: BigDecimal::from(0),
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an entry's legs to the running balance.
    ///
    /// The debit leg moves the balance toward the debit side and the credit
    /// leg toward the credit side; the sign of the effect depends on the
    /// account's normal balance.
    pub fn apply_entry(&mut self, entry: &TransactionEntry) {
        let toward_debit = &entry.debit_amount - &entry.credit_amount;
        match self.account_type.normal_balance() {
            EntrySide::Debit => self.balance += &toward_debit,
            EntrySide::Credit => self.balance -= &toward_debit,
        }
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// One leg of a posted transaction.
///
/// Carries both a debit and a credit amount; by convention exactly one of
/// the two is non-zero (enforced at write time, tolerated at read time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// Code of the account being affected
    pub account_code: String,
    /// Debit leg amount, zero if this is a credit entry
    pub debit_amount: BigDecimal,
    /// Credit leg amount, zero if this is a debit entry
    pub credit_amount: BigDecimal,
    /// Optional description for this specific entry
    pub description: Option<String>,
}

impl TransactionEntry {
    pub fn new(
        account_code: String,
        debit_amount: BigDecimal,
        credit_amount: BigDecimal,
        description: Option<String>,
    ) -> Self {
        Self {
            account_code,
            debit_amount,
            credit_amount,
            description,
        }
    }

    /// Create a debit entry
    pub fn debit(account_code: String, amount: BigDecimal, description: Option<String>) -> Self {
        Self::new(account_code, amount, BigDecimal::from(0), description)
    }

    /// Create a credit entry
    pub fn credit(account_code: String, amount: BigDecimal, description: Option<String>) -> Self {
        Self::new(account_code, BigDecimal::from(0), amount, description)
    }

    /// Signed amount: positive toward the debit side
    pub fn net_amount(&self) -> BigDecimal {
        &self.debit_amount - &self.credit_amount
    }

    /// The side this entry posts to, judged by which leg is non-zero.
    /// Entries with both legs set (legacy bad rows) report the larger leg.
    pub fn side(&self) -> EntrySide {
        if self.debit_amount >= self.credit_amount {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        }
    }
}

/// Transaction status lifecycle: `Pending -> Approved`, one way.
///
/// Entries become immutable once the transaction is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Approved,
}

/// Report status lifecycle: `Draft -> Finalized`, one way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Draft,
    Finalized,
}

/// Dated, described group of entries, optionally linked to a counterparty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Caller-supplied identifier (e.g. "INV-0042")
    pub id: String,
    /// Date the transaction occurred
    pub date: NaiveDate,
    /// List of entries that make up this transaction
    pub entries: Vec<TransactionEntry>,
    /// Description of the transaction
    pub description: String,
    /// Optional reference number (job number, cheque number, etc.)
    pub reference: Option<String>,
    /// Optional counterparty this transaction belongs to
    pub party_id: Option<Uuid>,
    /// Lifecycle status; entries freeze on approval
    pub status: TransactionStatus,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
    /// When the transaction was created
    pub created_at: NaiveDateTime,
    /// When the transaction was last updated
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Create a new, pending transaction
    pub fn new(
        id: String,
        date: NaiveDate,
        description: String,
        reference: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            date,
            entries: Vec::new(),
            description,
            reference,
            party_id: None,
            status: TransactionStatus::Pending,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add an entry while the transaction is still being assembled
    pub fn add_entry(&mut self, entry: TransactionEntry) {
        self.entries.push(entry);
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Calculate total debits
    pub fn total_debits(&self) -> BigDecimal {
        self.entries.iter().map(|e| &e.debit_amount).sum()
    }

    /// Calculate total credits
    pub fn total_credits(&self) -> BigDecimal {
        self.entries.iter().map(|e| &e.credit_amount).sum()
    }

    /// Check whether the transaction is balanced (debits = credits)
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Transition `Pending -> Approved`.
    ///
    /// The only defined transition; approving an already-approved
    /// transaction fails and leaves the status untouched.
    pub fn approve(&mut self) -> BooksResult<()> {
        match self.status {
            TransactionStatus::Pending => {
                self.status = TransactionStatus::Approved;
                self.updated_at = chrono::Utc::now().naive_utc();
                Ok(())
            }
            TransactionStatus::Approved => Err(BooksError::InvalidTransition(format!(
                "transaction '{}' is already approved",
                self.id
            ))),
        }
    }

    /// Validate the transaction for posting
    pub fn validate(&self) -> BooksResult<()> {
        if self.entries.is_empty() {
            return Err(BooksError::InvalidTransaction(
                "Transaction must have at least one entry".to_string(),
            ));
        }

        if self.entries.len() < 2 {
            return Err(BooksError::InvalidTransaction(
                "Transaction must have at least two entries for double-entry bookkeeping"
                    .to_string(),
            ));
        }

        if !self.is_balanced() {
            return Err(BooksError::InvalidTransaction(format!(
                "Transaction is not balanced: debits = {}, credits = {}",
                self.total_debits(),
                self.total_credits()
            )));
        }

        // Each entry carries exactly one positive leg
        for entry in &self.entries {
            crate::utils::validation::validate_entry_amounts(entry)?;
        }

        Ok(())
    }
}

/// Errors that can occur in the books
#[derive(Debug, thiserror::Error)]
pub enum BooksError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Party not found: {0}")]
    PartyNotFound(Uuid),
    #[error("Job sheet not found: {0}")]
    JobNotFound(Uuid),
    #[error("Report not found: {0}")]
    ReportNotFound(Uuid),
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for books operations
pub type BooksResult<T> = Result<T, BooksError>;
