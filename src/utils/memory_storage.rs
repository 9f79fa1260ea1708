//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::jobs::{JobSheet, JobStatus};
use crate::party::{Party, PartyKind};
use crate::reporting::{EntryRecord, FinancialReport, ReportKind};
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development.
///
/// Clones share the same underlying maps, so the managers a `Books`
/// facade spawns all see one set of data.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    parties: Arc<RwLock<HashMap<Uuid, Party>>>,
    job_sheets: Arc<RwLock<HashMap<Uuid, JobSheet>>>,
    reports: Arc<RwLock<HashMap<Uuid, FinancialReport>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            parties: Arc::new(RwLock::new(HashMap::new())),
            job_sheets: Arc::new(RwLock::new(HashMap::new())),
            reports: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.accounts.write().unwrap().clear();
        self.transactions.write().unwrap().clear();
        self.parties.write().unwrap().clear();
        self.job_sheets.write().unwrap().clear();
        self.reports.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn within(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end {
        if date > end {
            return false;
        }
    }
    true
}

#[async_trait]
impl BooksStorage for MemoryStorage {
    async fn save_account(&mut self, account: &Account) -> BooksResult<()> {
        self.accounts
            .write()
            .unwrap()
            .insert(account.code.clone(), account.clone());
        Ok(())
    }

    async fn get_account(&self, code: &str) -> BooksResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(code).cloned())
    }

    async fn list_accounts(&self, account_type: Option<AccountType>) -> BooksResult<Vec<Account>> {
        let accounts = self.accounts.read().unwrap();
        let filtered: Vec<Account> = accounts
            .values()
            .filter(|account| {
                account_type
                    .as_ref()
                    .is_none_or(|t| &account.account_type == t)
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_account(&mut self, account: &Account) -> BooksResult<()> {
        if self.accounts.read().unwrap().contains_key(&account.code) {
            self.accounts
                .write()
                .unwrap()
                .insert(account.code.clone(), account.clone());
            Ok(())
        } else {
            Err(BooksError::AccountNotFound(account.code.clone()))
        }
    }

    async fn delete_account(&mut self, code: &str) -> BooksResult<()> {
        if self.accounts.write().unwrap().remove(code).is_some() {
            Ok(())
        } else {
            Err(BooksError::AccountNotFound(code.to_string()))
        }
    }

    async fn save_transaction(&mut self, transaction: &Transaction) -> BooksResult<()> {
        self.transactions
            .write()
            .unwrap()
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: &str) -> BooksResult<Option<Transaction>> {
        Ok(self
            .transactions
            .read()
            .unwrap()
            .get(transaction_id)
            .cloned())
    }

    async fn get_account_transactions(
        &self,
        account_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        let transactions = self.transactions.read().unwrap();
        let filtered: Vec<Transaction> = transactions
            .values()
            .filter(|txn| {
                txn.entries
                    .iter()
                    .any(|entry| entry.account_code == account_code)
                    && within(txn.date, start_date, end_date)
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn get_party_transactions(
        &self,
        party_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        let transactions = self.transactions.read().unwrap();
        let filtered: Vec<Transaction> = transactions
            .values()
            .filter(|txn| {
                txn.party_id == Some(party_id) && within(txn.date, start_date, end_date)
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn get_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BooksResult<Vec<Transaction>> {
        let transactions = self.transactions.read().unwrap();
        let filtered: Vec<Transaction> = transactions
            .values()
            .filter(|txn| within(txn.date, start_date, end_date))
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_transaction(&mut self, transaction: &Transaction) -> BooksResult<()> {
        if self
            .transactions
            .read()
            .unwrap()
            .contains_key(&transaction.id)
        {
            self.transactions
                .write()
                .unwrap()
                .insert(transaction.id.clone(), transaction.clone());
            Ok(())
        } else {
            Err(BooksError::TransactionNotFound(transaction.id.clone()))
        }
    }

    async fn delete_transaction(&mut self, transaction_id: &str) -> BooksResult<()> {
        if self
            .transactions
            .write()
            .unwrap()
            .remove(transaction_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(BooksError::TransactionNotFound(transaction_id.to_string()))
        }
    }

    async fn entry_records(&self) -> BooksResult<Vec<EntryRecord>> {
        let accounts = self.accounts.read().unwrap();
        let transactions = self.transactions.read().unwrap();

        let mut records = Vec::new();
        for transaction in transactions.values() {
            for entry in &transaction.entries {
                let account = accounts.get(&entry.account_code);
                records.push(EntryRecord::from_parts(transaction, entry, account));
            }
        }
        Ok(records)
    }

    async fn save_party(&mut self, party: &Party) -> BooksResult<()> {
        self.parties
            .write()
            .unwrap()
            .insert(party.id, party.clone());
        Ok(())
    }

    async fn get_party(&self, party_id: Uuid) -> BooksResult<Option<Party>> {
        Ok(self.parties.read().unwrap().get(&party_id).cloned())
    }

    async fn list_parties(&self, kind: Option<PartyKind>) -> BooksResult<Vec<Party>> {
        let parties = self.parties.read().unwrap();
        let filtered: Vec<Party> = parties
            .values()
            .filter(|party| kind.as_ref().is_none_or(|k| &party.kind == k))
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_party(&mut self, party: &Party) -> BooksResult<()> {
        if self.parties.read().unwrap().contains_key(&party.id) {
            self.parties
                .write()
                .unwrap()
                .insert(party.id, party.clone());
            Ok(())
        } else {
            Err(BooksError::PartyNotFound(party.id))
        }
    }

    async fn save_job_sheet(&mut self, job: &JobSheet) -> BooksResult<()> {
        self.job_sheets.write().unwrap().insert(job.id, job.clone());
        Ok(())
    }

    async fn get_job_sheet(&self, job_id: Uuid) -> BooksResult<Option<JobSheet>> {
        Ok(self.job_sheets.read().unwrap().get(&job_id).cloned())
    }

    async fn list_job_sheets(
        &self,
        party_id: Option<Uuid>,
        status: Option<JobStatus>,
    ) -> BooksResult<Vec<JobSheet>> {
        let job_sheets = self.job_sheets.read().unwrap();
        let filtered: Vec<JobSheet> = job_sheets
            .values()
            .filter(|job| {
                party_id.is_none_or(|p| job.customer_id == p)
                    && status.as_ref().is_none_or(|s| &job.status == s)
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_job_sheet(&mut self, job: &JobSheet) -> BooksResult<()> {
        if self.job_sheets.read().unwrap().contains_key(&job.id) {
            self.job_sheets.write().unwrap().insert(job.id, job.clone());
            Ok(())
        } else {
            Err(BooksError::JobNotFound(job.id))
        }
    }

    async fn save_report(&mut self, report: &FinancialReport) -> BooksResult<()> {
        self.reports
            .write()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(())
    }

    async fn get_report(&self, report_id: Uuid) -> BooksResult<Option<FinancialReport>> {
        Ok(self.reports.read().unwrap().get(&report_id).cloned())
    }

    async fn list_reports(&self, kind: Option<ReportKind>) -> BooksResult<Vec<FinancialReport>> {
        let reports = self.reports.read().unwrap();
        let filtered: Vec<FinancialReport> = reports
            .values()
            .filter(|report| kind.as_ref().is_none_or(|k| &report.kind() == k))
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn update_report(&mut self, report: &FinancialReport) -> BooksResult<()> {
        if self.reports.read().unwrap().contains_key(&report.id) {
            self.reports
                .write()
                .unwrap()
                .insert(report.id, report.clone());
            Ok(())
        } else {
            Err(BooksError::ReportNotFound(report.id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn entry_records_join_tolerates_missing_accounts() {
        let mut storage = MemoryStorage::new();

        let cash = Account::new(
            "1000".to_string(),
            "Cash".to_string(),
            AccountType::Asset,
            AccountSubtype::CurrentAssets,
            None,
        );
        storage.save_account(&cash).await.unwrap();

        let mut txn = Transaction::new(
            "TXN-1".to_string(),
            NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            "Mystery deposit".to_string(),
            None,
        );
        txn.add_entry(TransactionEntry::debit(
            "1000".to_string(),
            BigDecimal::from(75),
            None,
        ));
        // References an account nobody created
        txn.add_entry(TransactionEntry::credit(
            "9999".to_string(),
            BigDecimal::from(75),
            None,
        ));
        storage.save_transaction(&txn).await.unwrap();

        let records = storage.entry_records().await.unwrap();
        assert_eq!(records.len(), 2);

        let cash_leg = records
            .iter()
            .find(|r| r.account_code.as_deref() == Some("1000"))
            .unwrap();
        assert_eq!(cash_leg.account_type, Some(AccountType::Asset));

        let ghost_leg = records
            .iter()
            .find(|r| r.account_code.as_deref() == Some("9999"))
            .unwrap();
        assert_eq!(ghost_leg.account_type, None);
        assert_eq!(ghost_leg.account_subtype, None);
    }
}
