//! Validation utilities
//!
//! Write-time rules are strict: entries must carry exactly one positive
//! leg, accounts must carry a subtype that belongs to their type. Reads
//! stay tolerant; the report aggregator never calls into this module.

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BooksResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(BooksError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate an entry's debit/credit legs: no negatives, and exactly one
/// of the two legs non-zero.
pub fn validate_entry_amounts(entry: &TransactionEntry) -> BooksResult<()> {
    let zero = BigDecimal::from(0);

    if entry.debit_amount < zero || entry.credit_amount < zero {
        return Err(BooksError::Validation(format!(
            "Entry for account '{}' has a negative amount",
            entry.account_code
        )));
    }

    let debit_set = entry.debit_amount != zero;
    let credit_set = entry.credit_amount != zero;
    if debit_set == credit_set {
        return Err(BooksError::Validation(format!(
            "Entry for account '{}' must have exactly one of debit or credit set",
            entry.account_code
        )));
    }

    Ok(())
}

/// Validate that an account code is well formed
pub fn validate_account_code(code: &str) -> BooksResult<()> {
    if code.trim().is_empty() {
        return Err(BooksError::Validation(
            "Account code cannot be empty".to_string(),
        ));
    }

    if code.len() > 50 {
        return Err(BooksError::Validation(
            "Account code cannot exceed 50 characters".to_string(),
        ));
    }

    // Alphanumeric plus dashes and underscores
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BooksError::Validation(
            "Account code can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that an account name is well formed
pub fn validate_account_name(name: &str) -> BooksResult<()> {
    if name.trim().is_empty() {
        return Err(BooksError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(BooksError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a transaction description is well formed
pub fn validate_transaction_description(description: &str) -> BooksResult<()> {
    if description.trim().is_empty() {
        return Err(BooksError::Validation(
            "Transaction description cannot be empty".to_string(),
        ));
    }

    if description.len() > 500 {
        return Err(BooksError::Validation(
            "Transaction description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an account's subtype belongs to its type
pub fn validate_account_classification(account: &Account) -> BooksResult<()> {
    use AccountSubtype::*;
    use AccountType::*;

    let coherent = matches!(
        (account.account_type, account.subtype),
        (Asset, CurrentAssets | FixedAssets)
            | (Liability, CurrentLiabilities | LongTermLiabilities)
            | (Equity, OwnersEquity)
            | (Revenue, OperatingRevenue)
            | (CostOfGoodsSold, DirectCosts)
            | (Expense, OperatingExpenses)
    );

    if coherent {
        Ok(())
    } else {
        Err(BooksError::Validation(format!(
            "Subtype {:?} does not belong to account type {:?}",
            account.subtype, account.account_type
        )))
    }
}

/// Enhanced transaction validator with detailed checks
pub struct EnhancedTransactionValidator;

impl TransactionValidator for EnhancedTransactionValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> BooksResult<()> {
        // Basic structure, balance, and per-entry leg rules
        transaction.validate()?;

        validate_transaction_description(&transaction.description)?;

        for entry in &transaction.entries {
            validate_account_code(&entry.account_code)?;
        }

        // The same account cannot appear twice on the same side
        let mut seen = std::collections::HashSet::new();
        for entry in &transaction.entries {
            let combination = (entry.account_code.clone(), entry.side());
            if !seen.insert(combination) {
                return Err(BooksError::Validation(format!(
                    "Account '{}' appears multiple times on the same side of the transaction",
                    entry.account_code
                )));
            }
        }

        Ok(())
    }

    fn validate_account_references(&self, _transaction: &Transaction) -> BooksResult<()> {
        // Existence checks are the manager's job; it has storage access.
        Ok(())
    }
}

/// Enhanced account validator with detailed checks
pub struct EnhancedAccountValidator;

impl AccountValidator for EnhancedAccountValidator {
    fn validate_account(&self, account: &Account) -> BooksResult<()> {
        validate_account_code(&account.code)?;
        validate_account_name(&account.name)?;
        validate_account_classification(account)?;
        Ok(())
    }

    fn validate_account_deletion(&self, _code: &str) -> BooksResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(debit: i64, credit: i64) -> TransactionEntry {
        TransactionEntry::new(
            "1000".to_string(),
            BigDecimal::from(debit),
            BigDecimal::from(credit),
            None,
        )
    }

    #[test]
    fn entry_needs_exactly_one_leg() {
        assert!(validate_entry_amounts(&entry(100, 0)).is_ok());
        assert!(validate_entry_amounts(&entry(0, 100)).is_ok());
        assert!(validate_entry_amounts(&entry(100, 100)).is_err());
        assert!(validate_entry_amounts(&entry(0, 0)).is_err());
    }

    #[test]
    fn negative_legs_are_rejected() {
        assert!(validate_entry_amounts(&entry(-100, 0)).is_err());
        assert!(validate_entry_amounts(&entry(0, -50)).is_err());
    }

    #[test]
    fn classification_must_be_coherent() {
        let good = Account::new(
            "1000".to_string(),
            "Cash".to_string(),
            AccountType::Asset,
            AccountSubtype::CurrentAssets,
            None,
        );
        assert!(validate_account_classification(&good).is_ok());

        let bad = Account::new(
            "4000".to_string(),
            "Job Revenue".to_string(),
            AccountType::Revenue,
            AccountSubtype::CurrentLiabilities,
            None,
        );
        assert!(validate_account_classification(&bad).is_err());
    }

    #[test]
    fn duplicate_account_on_one_side_is_rejected() {
        let mut transaction = Transaction::new(
            "TXN-D".to_string(),
            chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            "Split deposit".to_string(),
            None,
        );
        transaction.add_entry(TransactionEntry::debit(
            "1000".to_string(),
            BigDecimal::from(50),
            None,
        ));
        transaction.add_entry(TransactionEntry::debit(
            "1000".to_string(),
            BigDecimal::from(50),
            None,
        ));
        transaction.add_entry(TransactionEntry::credit(
            "4000".to_string(),
            BigDecimal::from(100),
            None,
        ));

        let validator = EnhancedTransactionValidator;
        assert!(validator.validate_transaction(&transaction).is_err());
    }
}
