//! Main orchestrator that coordinates accounts, transactions, parties,
//! jobs, and report generation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::jobs::{JobManager, JobSheet, JobStatus};
use crate::ledger::{AccountManager, TransactionManager};
use crate::party::{Party, PartyKind, PartyManager, PartyStatement};
use crate::reporting::{
    self, BalanceSheet, FinancialReport, ProfitAndLoss, ReportBody, ReportKind, TrialBalance,
};
use crate::traits::*;
use crate::types::*;

/// The books of the business: one facade over the chart, the journal,
/// counterparties, job sheets, and financial reports.
pub struct Books<S: BooksStorage> {
    account_manager: AccountManager<S>,
    transaction_manager: TransactionManager<S>,
    party_manager: PartyManager<S>,
    job_manager: JobManager<S>,
    storage: S,
}

impl<S: BooksStorage + Clone> Books<S> {
    /// Open the books over the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            account_manager: AccountManager::new(storage.clone()),
            transaction_manager: TransactionManager::new(storage.clone()),
            party_manager: PartyManager::new(storage.clone()),
            job_manager: JobManager::new(storage.clone()),
            storage,
        }
    }

    /// Open the books with custom validators
    pub fn with_validators(
        storage: S,
        account_validator: Box<dyn AccountValidator>,
        transaction_validator: Box<dyn TransactionValidator>,
    ) -> Self {
        Self {
            account_manager: AccountManager::with_validator(storage.clone(), account_validator),
            transaction_manager: TransactionManager::with_validator(
                storage.clone(),
                transaction_validator,
            ),
            party_manager: PartyManager::new(storage.clone()),
            job_manager: JobManager::new(storage.clone()),
            storage,
        }
    }

    // Account operations

    /// Create a new account
    pub async fn create_account(
        &mut self,
        code: String,
        name: String,
        account_type: AccountType,
        subtype: AccountSubtype,
        parent_code: Option<String>,
    ) -> BooksResult<Account> {
        self.account_manager
            .create_account(code, name, account_type, subtype, parent_code)
            .await
    }

    /// Get an account by code
    pub async fn get_account(&self, code: &str) -> BooksResult<Option<Account>> {
        self.account_manager.get_account(code).await
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> BooksResult<Vec<Account>> {
        self.account_manager.list_accounts().await
    }

    /// List accounts by type
    pub async fn list_accounts_by_type(
        &self,
        account_type: AccountType,
    ) -> BooksResult<Vec<Account>> {
        self.account_manager
            .list_accounts_by_type(account_type)
            .await
    }

    /// Update an account
    pub async fn update_account(&mut self, account: &Account) -> BooksResult<()> {
        self.account_manager.update_account(account).await
    }

    /// Delete an account with no transaction history
    pub async fn delete_account(&mut self, code: &str) -> BooksResult<()> {
        self.account_manager.delete_account(code).await
    }

    /// Running balance of an account
    pub async fn account_balance(&self, code: &str) -> BooksResult<BigDecimal> {
        self.account_manager.account_balance(code).await
    }

    /// Accounts whose parent is the given code
    pub async fn child_accounts(&self, parent_code: &str) -> BooksResult<Vec<Account>> {
        self.account_manager.child_accounts(parent_code).await
    }

    /// Path from the root of the chart down to the given account
    pub async fn account_path(&self, code: &str) -> BooksResult<Vec<Account>> {
        self.account_manager.account_path(code).await
    }

    /// Create the standard print-shop chart of accounts
    pub async fn setup_print_shop_chart(&mut self) -> BooksResult<HashMap<String, Account>> {
        crate::ledger::account::chart::create_print_shop_chart(&mut self.account_manager).await
    }

    // Transaction operations

    /// Record a new pending transaction
    pub async fn record_transaction(&mut self, transaction: Transaction) -> BooksResult<()> {
        self.transaction_manager
            .record_transaction(transaction)
            .await
    }

    /// Approve a pending transaction, applying it to account balances
    pub async fn approve_transaction(&mut self, transaction_id: &str) -> BooksResult<Transaction> {
        self.transaction_manager
            .approve_transaction(transaction_id)
            .await
    }

    /// Record and immediately approve a transaction
    pub async fn post_transaction(&mut self, transaction: Transaction) -> BooksResult<Transaction> {
        self.transaction_manager.post_transaction(transaction).await
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> BooksResult<Option<Transaction>> {
        self.transaction_manager
            .get_transaction(transaction_id)
            .await
    }

    /// Get transactions for a specific account
    pub async fn get_account_transactions(
        &self,
        account_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        self.transaction_manager
            .get_account_transactions(account_code, start_date, end_date)
            .await
    }

    /// Get transactions linked to a counterparty
    pub async fn get_party_transactions(
        &self,
        party_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        self.transaction_manager
            .get_party_transactions(party_id, start_date, end_date)
            .await
    }

    /// Get all transactions within a date range
    pub async fn get_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        self.transaction_manager
            .get_transactions(start_date, end_date)
            .await
    }

    /// Update a pending transaction
    pub async fn update_transaction(&mut self, transaction: &Transaction) -> BooksResult<()> {
        self.transaction_manager
            .update_transaction(transaction)
            .await
    }

    /// Remove a pending transaction
    pub async fn remove_transaction(&mut self, transaction_id: &str) -> BooksResult<()> {
        self.transaction_manager
            .remove_transaction(transaction_id)
            .await
    }

    // Party operations

    /// Register a customer or supplier
    pub async fn create_party(
        &mut self,
        name: String,
        kind: PartyKind,
        control_account_code: String,
    ) -> BooksResult<Party> {
        self.party_manager
            .create_party(name, kind, control_account_code)
            .await
    }

    /// Get a party by ID
    pub async fn get_party(&self, party_id: Uuid) -> BooksResult<Party> {
        self.party_manager.get_party(party_id).await
    }

    /// List parties, optionally restricted to one kind
    pub async fn list_parties(&self, kind: Option<PartyKind>) -> BooksResult<Vec<Party>> {
        self.party_manager.list_parties(kind).await
    }

    /// Archive a party
    pub async fn archive_party(&mut self, party_id: Uuid) -> BooksResult<Party> {
        self.party_manager.archive_party(party_id).await
    }

    /// Subledger balance of a party, up to and including `as_of` when given
    pub async fn party_balance(
        &self,
        party_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> BooksResult<BigDecimal> {
        self.party_manager.party_balance(party_id, as_of).await
    }

    /// Subledger statement for a party over a period
    pub async fn party_statement(
        &self,
        party_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> BooksResult<PartyStatement> {
        self.party_manager
            .statement(party_id, period_start, period_end)
            .await
    }

    // Job sheet operations

    /// Open a job sheet for a customer
    pub async fn open_job(
        &mut self,
        job_number: String,
        customer_id: Uuid,
        title: String,
        quantity: u32,
        unit_price: BigDecimal,
        opened_on: NaiveDate,
    ) -> BooksResult<JobSheet> {
        self.job_manager
            .create_job(job_number, customer_id, title, quantity, unit_price, opened_on)
            .await
    }

    /// Get a job sheet by ID
    pub async fn get_job(&self, job_id: Uuid) -> BooksResult<JobSheet> {
        self.job_manager.get_job(job_id).await
    }

    /// List job sheets, optionally filtered by customer and status
    pub async fn list_jobs(
        &self,
        customer_id: Option<Uuid>,
        status: Option<JobStatus>,
    ) -> BooksResult<Vec<JobSheet>> {
        self.job_manager.list_jobs(customer_id, status).await
    }

    /// Move a job onto the press
    pub async fn start_job(&mut self, job_id: Uuid) -> BooksResult<JobSheet> {
        self.job_manager.start_job(job_id).await
    }

    /// Mark a job's work finished
    pub async fn complete_job(
        &mut self,
        job_id: Uuid,
        completed_on: NaiveDate,
    ) -> BooksResult<JobSheet> {
        self.job_manager.complete_job(job_id, completed_on).await
    }

    /// Cancel a job before it is invoiced
    pub async fn cancel_job(&mut self, job_id: Uuid) -> BooksResult<JobSheet> {
        self.job_manager.cancel_job(job_id).await
    }

    /// Invoice a completed job into the books.
    ///
    /// Posts a receivable transaction against the customer's control
    /// account (amount defaults to the job's quoted total) and marks the
    /// job Invoiced with a link back to the posted transaction.
    pub async fn invoice_job(
        &mut self,
        job_id: Uuid,
        invoice_id: String,
        date: NaiveDate,
        revenue_account_code: String,
        amount: Option<BigDecimal>,
    ) -> BooksResult<(JobSheet, Transaction)> {
        let job = self.job_manager.get_job(job_id).await?;
        if !job.status.can_transition_to(JobStatus::Invoiced) {
            return Err(BooksError::InvalidTransition(format!(
                "job {} is {:?} and cannot be invoiced",
                job.job_number, job.status
            )));
        }

        let customer = self.party_manager.get_party(job.customer_id).await?;
        let amount = amount.unwrap_or_else(|| job.total());
        if amount <= BigDecimal::from(0) {
            return Err(BooksError::Validation(
                "Invoice amount must be positive".to_string(),
            ));
        }

        let invoice = crate::ledger::transaction::patterns::customer_invoice(
            invoice_id,
            date,
            format!("Invoice {}: {}", job.job_number, job.title),
            customer.control_account_code.clone(),
            revenue_account_code,
            amount,
            customer.id,
        )?;

        let posted = self.transaction_manager.post_transaction(invoice).await?;
        let job = self
            .job_manager
            .mark_invoiced(job_id, posted.id.clone())
            .await?;
        info!(job_number = %job.job_number, transaction_id = %posted.id, "invoiced job");

        Ok((job, posted))
    }

    // Reporting operations

    /// Compute a profit and loss statement over a period.
    /// Pure read; nothing is persisted.
    pub async fn profit_and_loss(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> BooksResult<ProfitAndLoss> {
        let records = self.storage.entry_records().await?;
        Ok(reporting::profit_and_loss(&records, period_start, period_end))
    }

    /// Compute a balance sheet as of a date.
    /// Pure read; nothing is persisted.
    pub async fn balance_sheet(&self, as_of_date: NaiveDate) -> BooksResult<BalanceSheet> {
        let records = self.storage.entry_records().await?;
        Ok(reporting::balance_sheet(&records, as_of_date))
    }

    /// Compute a trial balance as of a date
    pub async fn trial_balance(&self, as_of_date: NaiveDate) -> BooksResult<TrialBalance> {
        let records = self.storage.entry_records().await?;
        Ok(reporting::trial_balance(&records, as_of_date))
    }

    /// Compute a profit and loss statement and save it as a draft report
    pub async fn generate_profit_and_loss_report(
        &mut self,
        generated_by: String,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> BooksResult<FinancialReport> {
        let statement = self.profit_and_loss(period_start, period_end).await?;
        let report = FinancialReport::new(
            format!("Profit & Loss {} to {}", period_start, period_end),
            generated_by,
            ReportBody::ProfitAndLoss(statement),
        );
        self.storage.save_report(&report).await?;
        info!(report_id = %report.id, name = %report.name, "generated report");
        Ok(report)
    }

    /// Compute a balance sheet and save it as a draft report.
    /// An unbalanced sheet still saves; the imbalance is data to act on.
    pub async fn generate_balance_sheet_report(
        &mut self,
        generated_by: String,
        as_of_date: NaiveDate,
    ) -> BooksResult<FinancialReport> {
        let sheet = self.balance_sheet(as_of_date).await?;
        let report = FinancialReport::new(
            format!("Balance Sheet as of {}", as_of_date),
            generated_by,
            ReportBody::BalanceSheet(sheet),
        );
        self.storage.save_report(&report).await?;
        info!(report_id = %report.id, name = %report.name, "generated report");
        Ok(report)
    }

    /// Get a saved report by ID
    pub async fn get_report(&self, report_id: Uuid) -> BooksResult<FinancialReport> {
        self.storage
            .get_report(report_id)
            .await?
            .ok_or(BooksError::ReportNotFound(report_id))
    }

    /// List saved reports, optionally filtered by kind
    pub async fn list_reports(&self, kind: Option<ReportKind>) -> BooksResult<Vec<FinancialReport>> {
        self.storage.list_reports(kind).await
    }

    /// Finalize a draft report; finalized reports are immutable
    pub async fn finalize_report(&mut self, report_id: Uuid) -> BooksResult<FinancialReport> {
        let mut report = self.get_report(report_id).await?;
        report.finalize()?;
        self.storage.update_report(&report).await?;
        info!(report_id = %report.id, "finalized report");
        Ok(report)
    }

    /// Validate the integrity of the books as of a date
    pub async fn validate_integrity(
        &self,
        as_of_date: NaiveDate,
    ) -> BooksResult<BooksIntegrityReport> {
        let trial_balance = self.trial_balance(as_of_date).await?;
        let balance_sheet = self.balance_sheet(as_of_date).await?;

        let mut issues = Vec::new();

        if !trial_balance.is_balanced {
            issues.push(format!(
                "Trial balance is not balanced: debits = {}, credits = {}",
                trial_balance.total_debits, trial_balance.total_credits
            ));
        }

        if !balance_sheet.is_balanced {
            issues.push(format!(
                "Balance sheet is not balanced: assets = {}, liabilities + equity = {}",
                balance_sheet.total_assets, balance_sheet.total_liabilities_and_equity
            ));
        }

        Ok(BooksIntegrityReport {
            as_of_date,
            is_valid: issues.is_empty(),
            issues,
            trial_balance_total_debits: trial_balance.total_debits,
            trial_balance_total_credits: trial_balance.total_credits,
            balance_sheet_total_assets: balance_sheet.total_assets,
            balance_sheet_total_liabilities_and_equity: balance_sheet
                .total_liabilities_and_equity,
        })
    }
}

/// Outcome of an integrity sweep over the books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksIntegrityReport {
    pub as_of_date: NaiveDate,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub trial_balance_total_debits: BigDecimal,
    pub trial_balance_total_credits: BigDecimal,
    pub balance_sheet_total_assets: BigDecimal,
    pub balance_sheet_total_liabilities_and_equity: BigDecimal,
}
