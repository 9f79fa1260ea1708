//! Transaction recording, approval, and common posting patterns

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// Transaction manager for handling transaction operations
///
/// Transactions are recorded as Pending and touch no balances until
/// approved. Approval freezes the entries and applies them to the running
/// account balances; approved transactions can no longer be edited or
/// removed.
pub struct TransactionManager<S: BooksStorage> {
    storage: S,
    validator: Box<dyn TransactionValidator>,
}

impl<S: BooksStorage> TransactionManager<S> {
    /// Create a new transaction manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultTransactionValidator),
        }
    }

    /// Create a new transaction manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn TransactionValidator>) -> Self {
        Self { storage, validator }
    }

    /// Record a new pending transaction
    pub async fn record_transaction(&mut self, mut transaction: Transaction) -> BooksResult<()> {
        if transaction.status != TransactionStatus::Pending {
            return Err(BooksError::InvalidTransaction(
                "Only pending transactions can be recorded".to_string(),
            ));
        }

        self.validator.validate_transaction(&transaction)?;
        self.validator.validate_account_references(&transaction)?;
        self.verify_references(&transaction).await?;

        if self.storage.get_transaction(&transaction.id).await?.is_some() {
            return Err(BooksError::Validation(format!(
                "Transaction with ID '{}' already exists",
                transaction.id
            )));
        }

        transaction.updated_at = chrono::Utc::now().naive_utc();
        self.storage.save_transaction(&transaction).await?;
        info!(transaction_id = %transaction.id, "recorded pending transaction");

        Ok(())
    }

    /// Approve a pending transaction and apply it to account balances
    pub async fn approve_transaction(&mut self, transaction_id: &str) -> BooksResult<Transaction> {
        let mut transaction = self.get_transaction_required(transaction_id).await?;
        transaction.approve()?;

        for entry in &transaction.entries {
            if let Some(mut account) = self.storage.get_account(&entry.account_code).await? {
                account.apply_entry(entry);
                self.storage.update_account(&account).await?;
            }
        }

        self.storage.update_transaction(&transaction).await?;
        info!(transaction_id = %transaction.id, "approved transaction");

        Ok(transaction)
    }

    /// Record and immediately approve a transaction
    pub async fn post_transaction(&mut self, transaction: Transaction) -> BooksResult<Transaction> {
        let id = transaction.id.clone();
        self.record_transaction(transaction).await?;
        self.approve_transaction(&id).await
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> BooksResult<Option<Transaction>> {
        self.storage.get_transaction(transaction_id).await
    }

    /// Get a transaction by ID, returning an error if not found
    pub async fn get_transaction_required(
        &self,
        transaction_id: &str,
    ) -> BooksResult<Transaction> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| BooksError::TransactionNotFound(transaction_id.to_string()))
    }

    /// Get transactions for a specific account
    pub async fn get_account_transactions(
        &self,
        account_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        self.storage
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
        self.storage
            .get_party_transactions(party_id, start_date, end_date)
            .await
    }

    /// Get all transactions within a date range
    pub async fn get_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        self.storage.get_transactions(start_date, end_date).await
    }

    /// Update a transaction that is still pending
    pub async fn update_transaction(&mut self, transaction: &Transaction) -> BooksResult<()> {
        let existing = self.get_transaction_required(&transaction.id).await?;
        if existing.status != TransactionStatus::Pending {
            return Err(BooksError::InvalidTransaction(format!(
                "Transaction '{}' is approved and cannot be edited",
                transaction.id
            )));
        }
        if transaction.status != TransactionStatus::Pending {
            return Err(BooksError::InvalidTransaction(
                "Use approve_transaction to change transaction status".to_string(),
            ));
        }

        self.validator.validate_transaction(transaction)?;
        self.validator.validate_account_references(transaction)?;
        self.verify_references(transaction).await?;

        self.storage.update_transaction(transaction).await
    }

    /// Remove a transaction that is still pending.
    /// Approved transactions are part of the books and stay put.
    pub async fn remove_transaction(&mut self, transaction_id: &str) -> BooksResult<()> {
        let transaction = self.get_transaction_required(transaction_id).await?;
        if transaction.status != TransactionStatus::Pending {
            return Err(BooksError::InvalidTransaction(format!(
                "Transaction '{}' is approved and cannot be removed",
                transaction_id
            )));
        }

        self.storage.delete_transaction(transaction_id).await
    }

    /// Check that every referenced account and the party (if any) exist
    /// and accept new activity.
    async fn verify_references(&self, transaction: &Transaction) -> BooksResult<()> {
        for entry in &transaction.entries {
            if self.storage.get_account(&entry.account_code).await?.is_none() {
                return Err(BooksError::AccountNotFound(entry.account_code.clone()));
            }
        }

        if let Some(party_id) = transaction.party_id {
            let party = self
                .storage
                .get_party(party_id)
                .await?
                .ok_or(BooksError::PartyNotFound(party_id))?;
            if !party.can_transact() {
                return Err(BooksError::Validation(format!(
                    "Party '{}' is archived and cannot take new transactions",
                    party.name
                )));
            }
        }

        Ok(())
    }
}

/// Transaction builder for assembling multi-entry transactions
#[derive(Debug)]
pub struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    /// Create a new transaction builder
    pub fn new(id: String, date: NaiveDate, description: String) -> Self {
        Self {
            transaction: Transaction::new(id, date, description, None),
        }
    }

    /// Set the reference for the transaction
    pub fn reference(mut self, reference: String) -> Self {
        self.transaction.reference = Some(reference);
        self
    }

    /// Link the transaction to a counterparty
    pub fn party(mut self, party_id: Uuid) -> Self {
        self.transaction.party_id = Some(party_id);
        self
    }

    /// Add metadata to the transaction
    pub fn metadata(mut self, key: String, value: String) -> Self {
        self.transaction.metadata.insert(key, value);
        self
    }

    /// Add a debit entry
    pub fn debit(
        mut self,
        account_code: String,
        amount: BigDecimal,
        description: Option<String>,
    ) -> Self {
        self.transaction
            .add_entry(TransactionEntry::debit(account_code, amount, description));
        self
    }

    /// Add a credit entry
    pub fn credit(
        mut self,
        account_code: String,
        amount: BigDecimal,
        description: Option<String>,
    ) -> Self {
        self.transaction
            .add_entry(TransactionEntry::credit(account_code, amount, description));
        self
    }

    /// Add a custom entry
    pub fn entry(mut self, entry: TransactionEntry) -> Self {
        self.transaction.add_entry(entry);
        self
    }

    /// Build the transaction, validating structure and balance
    pub fn build(self) -> BooksResult<Transaction> {
        self.transaction.validate()?;
        Ok(self.transaction)
    }
}

/// Common posting patterns for the day-to-day of a print shop
pub mod patterns {
    use super::*;

    /// Pay a running cost from cash (debit expense, credit cash)
    pub fn expense_payment(
        id: String,
        date: NaiveDate,
        description: String,
        expense_account_code: String,
        cash_account_code: String,
        amount: BigDecimal,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .debit(expense_account_code, amount.clone(), None)
            .credit(cash_account_code, amount, None)
            .build()
    }

    /// Invoice a customer for finished work
    /// (debit their receivable control account, credit revenue)
    pub fn customer_invoice(
        id: String,
        date: NaiveDate,
        description: String,
        receivable_account_code: String,
        revenue_account_code: String,
        amount: BigDecimal,
        party_id: Uuid,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .party(party_id)
            .debit(receivable_account_code, amount.clone(), None)
            .credit(revenue_account_code, amount, None)
            .build()
    }

    /// Receive payment against a customer's account
    /// (debit cash, credit their receivable control account)
    pub fn customer_payment(
        id: String,
        date: NaiveDate,
        description: String,
        cash_account_code: String,
        receivable_account_code: String,
        amount: BigDecimal,
        party_id: Uuid,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .party(party_id)
            .debit(cash_account_code, amount.clone(), None)
            .credit(receivable_account_code, amount, None)
            .build()
    }

    /// Record a supplier's bill for stock or services
    /// (debit the cost account, credit their payable control account)
    pub fn supplier_bill(
        id: String,
        date: NaiveDate,
        description: String,
        cost_account_code: String,
        payable_account_code: String,
        amount: BigDecimal,
        party_id: Uuid,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .party(party_id)
            .debit(cost_account_code, amount.clone(), None)
            .credit(payable_account_code, amount, None)
            .build()
    }

    /// Settle a supplier's account
    /// (debit their payable control account, credit cash)
    pub fn supplier_payment(
        id: String,
        date: NaiveDate,
        description: String,
        payable_account_code: String,
        cash_account_code: String,
        amount: BigDecimal,
        party_id: Uuid,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .party(party_id)
            .debit(payable_account_code, amount.clone(), None)
            .credit(cash_account_code, amount, None)
            .build()
    }

    /// Buy equipment (debit asset, credit cash or payables)
    pub fn asset_purchase(
        id: String,
        date: NaiveDate,
        description: String,
        asset_account_code: String,
        cash_or_payables_account_code: String,
        amount: BigDecimal,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .debit(asset_account_code, amount.clone(), None)
            .credit(cash_or_payables_account_code, amount, None)
            .build()
    }

    /// Draw down a loan (debit cash, credit the loan liability)
    pub fn loan_received(
        id: String,
        date: NaiveDate,
        description: String,
        cash_account_code: String,
        loan_account_code: String,
        amount: BigDecimal,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .debit(
                cash_account_code,
                amount.clone(),
                Some("Cash received from loan".to_string()),
            )
            .credit(loan_account_code, amount, Some("Loan payable".to_string()))
            .build()
    }

    /// Owner puts money into the business (debit cash, credit equity)
    pub fn owner_investment(
        id: String,
        date: NaiveDate,
        description: String,
        cash_account_code: String,
        equity_account_code: String,
        amount: BigDecimal,
    ) -> BooksResult<Transaction> {
        TransactionBuilder::new(id, date, description)
            .debit(
                cash_account_code,
                amount.clone(),
                Some("Cash invested by owner".to_string()),
            )
            .credit(
                equity_account_code,
                amount,
                Some("Owner's equity contribution".to_string()),
            )
            .build()
    }
}
