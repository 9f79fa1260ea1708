//! Chart of accounts management

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use tracing::info;

use crate::traits::*;
use crate::types::*;

/// Account manager for handling chart of accounts operations
pub struct AccountManager<S: BooksStorage> {
    pub(crate) storage: S,
    validator: Box<dyn AccountValidator>,
}

impl<S: BooksStorage> AccountManager<S> {
    /// Create a new account manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultAccountValidator),
        }
    }

    /// Create a new account manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn AccountValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a new account
    pub async fn create_account(
        &mut self,
        code: String,
        name: String,
        account_type: AccountType,
        subtype: AccountSubtype,
        parent_code: Option<String>,
    ) -> BooksResult<Account> {
        let account = Account::new(code, name, account_type, subtype, parent_code);

        self.validator.validate_account(&account)?;
        crate::utils::validation::validate_account_classification(&account)?;

        if self.storage.get_account(&account.code).await?.is_some() {
            return Err(BooksError::Validation(format!(
                "Account with code '{}' already exists",
                account.code
            )));
        }

        if let Some(ref parent_code) = account.parent_code {
            if self.storage.get_account(parent_code).await?.is_none() {
                return Err(BooksError::Validation(format!(
                    "Parent account '{}' does not exist",
                    parent_code
                )));
            }
        }

        self.storage.save_account(&account).await?;
        info!(code = %account.code, name = %account.name, "created account");

        Ok(account)
    }

    /// Get an account by code
    pub async fn get_account(&self, code: &str) -> BooksResult<Option<Account>> {
        self.storage.get_account(code).await
    }

    /// Get an account by code, returning an error if not found
    pub async fn get_account_required(&self, code: &str) -> BooksResult<Account> {
        self.storage
            .get_account(code)
            .await?
            .ok_or_else(|| BooksError::AccountNotFound(code.to_string()))
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> BooksResult<Vec<Account>> {
        self.storage.list_accounts(None).await
    }

    /// List accounts by type
    pub async fn list_accounts_by_type(
        &self,
        account_type: AccountType,
    ) -> BooksResult<Vec<Account>> {
        self.storage.list_accounts(Some(account_type)).await
    }

    /// Update an account's descriptive fields
    pub async fn update_account(&mut self, account: &Account) -> BooksResult<()> {
        self.validator.validate_account(account)?;
        crate::utils::validation::validate_account_classification(account)?;

        if self.storage.get_account(&account.code).await?.is_none() {
            return Err(BooksError::AccountNotFound(account.code.clone()));
        }

        self.storage.update_account(account).await
    }

    /// Delete an account that no transaction references
    pub async fn delete_account(&mut self, code: &str) -> BooksResult<()> {
        self.validator.validate_account_deletion(code)?;

        if self.storage.get_account(code).await?.is_none() {
            return Err(BooksError::AccountNotFound(code.to_string()));
        }

        let referencing = self
            .storage
            .get_account_transactions(code, None, None)
            .await?;
        if !referencing.is_empty() {
            return Err(BooksError::Validation(format!(
                "Account '{}' has {} transaction(s) and cannot be deleted",
                code,
                referencing.len()
            )));
        }

        self.storage.delete_account(code).await
    }

    /// Running balance of an account, in its normal-balance orientation
    pub async fn account_balance(&self, code: &str) -> BooksResult<BigDecimal> {
        Ok(self.get_account_required(code).await?.balance)
    }

    /// Accounts whose parent is the given code
    pub async fn child_accounts(&self, parent_code: &str) -> BooksResult<Vec<Account>> {
        let all_accounts = self.list_accounts().await?;
        Ok(all_accounts
            .into_iter()
            .filter(|account| account.parent_code.as_deref() == Some(parent_code))
            .collect())
    }

    /// Path from the root of the chart down to the given account
    pub async fn account_path(&self, code: &str) -> BooksResult<Vec<Account>> {
        let mut path = Vec::new();
        let mut current_code = Some(code.to_string());

        while let Some(code) = current_code {
            match self.get_account(&code).await? {
                Some(account) => {
                    current_code = account.parent_code.clone();
                    path.insert(0, account);
                }
                None => {
                    return Err(BooksError::AccountNotFound(code));
                }
            }
        }

        Ok(path)
    }
}

/// Ready-made chart for a small print shop
pub mod chart {
    use super::*;

    /// Create the standard print-shop chart of accounts.
    ///
    /// Returns the created accounts keyed by a stable handle so callers can
    /// reference them without hardcoding codes.
    pub async fn create_print_shop_chart<S: BooksStorage>(
        account_manager: &mut AccountManager<S>,
    ) -> BooksResult<HashMap<String, Account>> {
        use AccountSubtype::*;
        use AccountType::*;

        let definitions: [(&str, &str, &str, AccountType, AccountSubtype); 15] = [
            ("cash", "1000", "Cash", Asset, CurrentAssets),
            ("accounts_receivable", "1200", "Accounts Receivable", Asset, CurrentAssets),
            ("materials_inventory", "1300", "Materials Inventory", Asset, CurrentAssets),
            ("press_equipment", "1500", "Press Equipment", Asset, FixedAssets),
            ("accounts_payable", "2000", "Accounts Payable", Liability, CurrentLiabilities),
            ("equipment_loan", "2500", "Equipment Loan", Liability, LongTermLiabilities),
            ("owners_equity", "3000", "Owner's Equity", Equity, OwnersEquity),
            ("retained_earnings", "3200", "Retained Earnings", Equity, OwnersEquity),
            ("job_revenue", "4000", "Job Revenue", Revenue, OperatingRevenue),
            ("design_revenue", "4100", "Design Services Revenue", Revenue, OperatingRevenue),
            ("materials_cost", "5000", "Materials Cost", CostOfGoodsSold, DirectCosts),
            ("outsourced_printing", "5100", "Outsourced Printing", CostOfGoodsSold, DirectCosts),
            ("rent_expense", "6000", "Rent Expense", Expense, OperatingExpenses),
            ("utilities_expense", "6100", "Utilities Expense", Expense, OperatingExpenses),
            ("press_maintenance", "6200", "Press Maintenance", Expense, OperatingExpenses),
        ];

        let mut accounts = HashMap::new();
        for (handle, code, name, account_type, subtype) in definitions {
            let account = account_manager
                .create_account(
                    code.to_string(),
                    name.to_string(),
                    account_type,
                    subtype,
                    None,
                )
                .await?;
            accounts.insert(handle.to_string(), account);
        }

        Ok(accounts)
    }
}
