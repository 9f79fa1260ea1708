//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::jobs::{JobSheet, JobStatus};
use crate::party::{Party, PartyKind};
use crate::reporting::{EntryRecord, FinancialReport, ReportKind};
use crate::types::*;

/// Storage abstraction for the books.
///
/// All row-level persistence, querying, and transactional integrity are
/// delegated to the implementation (PostgreSQL, MySQL, SQLite, in-memory,
/// a hosted data service, ...); the core only speaks this generic
/// save/get/list/update/delete surface.
#[async_trait]
pub trait BooksStorage: Send + Sync {
    /// Save an account to storage
    async fn save_account(&mut self, account: &Account) -> BooksResult<()>;

    /// Get an account by code
    async fn get_account(&self, code: &str) -> BooksResult<Option<Account>>;

    /// List all accounts, optionally filtered by type
    async fn list_accounts(&self, account_type: Option<AccountType>) -> BooksResult<Vec<Account>>;

    /// Update an account
    async fn update_account(&mut self, account: &Account) -> BooksResult<()>;

    /// Delete an account (if no transactions reference it)
    async fn delete_account(&mut self, code: &str) -> BooksResult<()>;

    /// Save a transaction to storage
    async fn save_transaction(&mut self, transaction: &Transaction) -> BooksResult<()>;

    /// Get a transaction by ID
    async fn get_transaction(&self, transaction_id: &str) -> BooksResult<Option<Transaction>>;

    /// List transactions touching a specific account
    async fn get_account_transactions(
        &self,
        account_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>>;

    /// List transactions linked to a counterparty
    async fn get_party_transactions(
        &self,
        party_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>>;

    /// List all transactions within a date range
    async fn get_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>>;

    /// Update a transaction
    async fn update_transaction(&mut self, transaction: &Transaction) -> BooksResult<()>;

    /// Delete a transaction
    async fn delete_transaction(&mut self, transaction_id: &str) -> BooksResult<()>;

    /// The joined entry/transaction/account view consumed by the report
    /// aggregator. Implementations may pre-filter by date for efficiency;
    /// the aggregator re-applies status and date filters itself.
    async fn entry_records(&self) -> BooksResult<Vec<EntryRecord>>;

    /// Save a party to storage
    async fn save_party(&mut self, party: &Party) -> BooksResult<()>;

    /// Get a party by ID
    async fn get_party(&self, party_id: Uuid) -> BooksResult<Option<Party>>;

    /// List all parties, optionally filtered by kind
    async fn list_parties(&self, kind: Option<PartyKind>) -> BooksResult<Vec<Party>>;

    /// Update a party
    async fn update_party(&mut self, party: &Party) -> BooksResult<()>;

    /// Save a job sheet to storage
    async fn save_job_sheet(&mut self, job: &JobSheet) -> BooksResult<()>;

    /// Get a job sheet by ID
    async fn get_job_sheet(&self, job_id: Uuid) -> BooksResult<Option<JobSheet>>;

    /// List job sheets, optionally filtered by party and status
    async fn list_job_sheets(
        &self,
        party_id: Option<Uuid>,
        status: Option<JobStatus>,
    ) -> BooksResult<Vec<JobSheet>>;

    /// Update a job sheet
    async fn update_job_sheet(&mut self, job: &JobSheet) -> BooksResult<()>;

    /// Save a generated report to storage
    async fn save_report(&mut self, report: &FinancialReport) -> BooksResult<()>;

    /// Get a report by ID
    async fn get_report(&self, report_id: Uuid) -> BooksResult<Option<FinancialReport>>;

    /// List generated reports, optionally filtered by kind
    async fn list_reports(&self, kind: Option<ReportKind>) -> BooksResult<Vec<FinancialReport>>;

    /// Update a report (status transitions)
    async fn update_report(&mut self, report: &FinancialReport) -> BooksResult<()>;
}

/// Trait for implementing custom account validation rules
pub trait AccountValidator: Send + Sync {
    /// Validate an account before saving
    fn validate_account(&self, account: &Account) -> BooksResult<()>;

    /// Validate account deletion (e.g., check for existing transactions)
    fn validate_account_deletion(&self, code: &str) -> BooksResult<()>;
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator: Send + Sync {
    /// Validate a transaction before saving
    fn validate_transaction(&self, transaction: &Transaction) -> BooksResult<()>;

    /// Validate that all referenced accounts exist
    fn validate_account_references(&self, transaction: &Transaction) -> BooksResult<()>;
}

/// Default account validator with basic rules
pub struct DefaultAccountValidator;

impl AccountValidator for DefaultAccountValidator {
    fn validate_account(&self, account: &Account) -> BooksResult<()> {
        if account.code.trim().is_empty() {
            return Err(BooksError::Validation(
                "Account code cannot be empty".to_string(),
            ));
        }

        if account.name.trim().is_empty() {
            return Err(BooksError::Validation(
                "Account name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_account_deletion(&self, _code: &str) -> BooksResult<()> {
        Ok(())
    }
}

/// Default transaction validator with basic double-entry rules
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> BooksResult<()> {
        transaction.validate()
    }

    fn validate_account_references(&self, _transaction: &Transaction) -> BooksResult<()> {
        // Reference checks need storage access; the manager performs them.
        Ok(())
    }
}
