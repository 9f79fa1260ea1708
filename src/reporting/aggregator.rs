//! Ledger aggregation engine deriving report totals from posted entries
//!
//! All functions here are pure and total: they perform no IO, never error,
//! and degrade malformed input to skipped entries or zero-valued fields so a
//! single bad row cannot block an entire report.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{
    Account, AccountSubtype, AccountType, Transaction, TransactionEntry, TransactionStatus,
};

/// Read-only entry view joined with its transaction and account context.
///
/// Produced by the storage layer; the account fields are `None` when the
/// account lookup failed, which marks the record as unclassifiable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Date of the parent transaction
    pub transaction_date: NaiveDate,
    /// Status of the parent transaction; only approved entries count
    pub status: TransactionStatus,
    /// Debit leg amount, zero if this is a credit entry
    pub debit_amount: BigDecimal,
    /// Credit leg amount, zero if this is a debit entry
    pub credit_amount: BigDecimal,
    /// Code of the referenced account, if it resolved
    pub account_code: Option<String>,
    /// Classification of the referenced account, if it resolved
    pub account_type: Option<AccountType>,
    /// Subtype of the referenced account, if it resolved
    pub account_subtype: Option<AccountSubtype>,
}

impl EntryRecord {
    /// Join one entry with its parent transaction and (possibly missing)
    /// account. Storage implementations use this to build the aggregator
    /// input view.
    pub fn from_parts(
        transaction: &Transaction,
        entry: &TransactionEntry,
        account: Option<&Account>,
    ) -> Self {
        Self {
            transaction_date: transaction.date,
            status: transaction.status,
            debit_amount: entry.debit_amount.clone(),
            credit_amount: entry.credit_amount.clone(),
            account_code: Some(entry.account_code.clone()),
            account_type: account.map(|a| a.account_type),
            account_subtype: account.map(|a| a.subtype),
        }
    }

    /// Signed amount: positive toward the debit side
    pub fn net_amount(&self) -> BigDecimal {
        &self.debit_amount - &self.credit_amount
    }

    fn is_approved(&self) -> bool {
        self.status == TransactionStatus::Approved
    }

    fn dated_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.transaction_date >= start && self.transaction_date <= end
    }

    fn dated_on_or_before(&self, as_of: NaiveDate) -> bool {
        self.transaction_date <= as_of
    }
}

/// Equality tolerance for balance checks: 0.01 currency units
pub fn balance_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Profit-and-loss totals for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Sum of credit amounts on revenue accounts
    pub total_revenue: BigDecimal,
    /// Sum of debit amounts on cost-of-goods-sold accounts
    pub total_cogs: BigDecimal,
    /// `total_revenue - total_cogs`
    pub gross_profit: BigDecimal,
    /// Sum of debit amounts on expense accounts
    pub total_expenses: BigDecimal,
    /// `gross_profit - total_expenses`
    pub operating_income: BigDecimal,
    /// Equal to operating income; no tax or interest adjustment layer
    pub net_income: BigDecimal,
}

impl ProfitAndLoss {
    /// Gross profit as a percentage of revenue; zero when there is no revenue
    pub fn gross_margin_percent(&self) -> BigDecimal {
        percent_of(&self.gross_profit, &self.total_revenue)
    }

    /// Net income as a percentage of revenue; zero when there is no revenue
    pub fn net_margin_percent(&self) -> BigDecimal {
        percent_of(&self.net_income, &self.total_revenue)
    }

    /// Operating expenses as a percentage of revenue; zero when there is no revenue
    pub fn expense_ratio_percent(&self) -> BigDecimal {
        percent_of(&self.total_expenses, &self.total_revenue)
    }
}

/// Balance-sheet totals as of a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub as_of_date: NaiveDate,
    /// Signed net of asset entries with the current-assets subtype
    pub current_assets: BigDecimal,
    /// Signed net of asset entries with any other subtype
    pub fixed_assets: BigDecimal,
    pub total_assets: BigDecimal,
    /// Credit magnitude of current-liability entries
    pub current_liabilities: BigDecimal,
    /// Credit magnitude of long-term-liability entries
    pub long_term_liabilities: BigDecimal,
    pub total_liabilities: BigDecimal,
    /// Credit magnitude of equity entries
    pub equity: BigDecimal,
    pub total_liabilities_and_equity: BigDecimal,
    /// Advisory flag: assets equal liabilities plus equity within tolerance.
    /// An unbalanced sheet is data to investigate, never an error.
    pub is_balanced: bool,
}

impl BalanceSheet {
    /// Re-derive the aggregate totals and the balance flag from the bucket
    /// fields. Used after report totals are edited by hand.
    pub fn revalidate(&mut self) {
        self.total_assets = &self.current_assets + &self.fixed_assets;
        self.total_liabilities = &self.current_liabilities + &self.long_term_liabilities;
        self.total_liabilities_and_equity = &self.total_liabilities + &self.equity;
        self.is_balanced = validate_balance(
            &self.total_assets,
            &self.total_liabilities,
            &self.equity,
        );
    }
}

/// Trial-balance totals: every approved debit against every approved credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub as_of_date: NaiveDate,
    pub total_debits: BigDecimal,
    pub total_credits: BigDecimal,
    pub is_balanced: bool,
}

/// Returns true iff `|assets - (liabilities + equity)| < 0.01`.
///
/// Applied at report-generation time and again whenever a report's totals
/// are edited after the fact.
pub fn validate_balance(
    total_assets: &BigDecimal,
    total_liabilities: &BigDecimal,
    total_equity: &BigDecimal,
) -> bool {
    let difference = total_assets - (total_liabilities + total_equity);
    difference.abs() < balance_tolerance()
}

/// Compute profit-and-loss totals over `[period_start, period_end]`
/// (inclusive both ends).
///
/// Only entries whose parent transaction is approved and dated within the
/// period contribute. Revenue accumulates credit amounts; expenses and COGS
/// accumulate debit amounts; balance-sheet account types are ignored.
/// Entries without a resolved account type are skipped.
pub fn profit_and_loss(
    entries: &[EntryRecord],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> ProfitAndLoss {
    let mut total_revenue = BigDecimal::from(0);
    let mut total_cogs = BigDecimal::from(0);
    let mut total_expenses = BigDecimal::from(0);

    for record in entries {
        if !record.is_approved() || !record.dated_within(period_start, period_end) {
            continue;
        }

        let Some(account_type) = record.account_type else {
            warn!(
                account_code = record.account_code.as_deref().unwrap_or("<unknown>"),
                date = %record.transaction_date,
                "skipping entry without account classification"
            );
            continue;
        };

        match account_type {
            AccountType::Revenue => total_revenue += &record.credit_amount,
            AccountType::Expense => total_expenses += &record.debit_amount,
            AccountType::CostOfGoodsSold => total_cogs += &record.debit_amount,
            AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
        }
    }

    let gross_profit = &total_revenue - &total_cogs;
    let operating_income = &gross_profit - &total_expenses;
    let net_income = operating_income.clone();

    ProfitAndLoss {
        period_start,
        period_end,
        total_revenue,
        total_cogs,
        gross_profit,
        total_expenses,
        operating_income,
        net_income,
    }
}

/// Compute balance-sheet totals from approved entries dated on or before
/// `as_of`.
///
/// Assets accumulate the signed net (`debit - credit`) so contra movements
/// reduce the bucket; liabilities and equity accumulate the magnitude of the
/// net, matching how credit-normal balances are reported. Asset and
/// liability entries without a resolved subtype are skipped.
pub fn balance_sheet(entries: &[EntryRecord], as_of: NaiveDate) -> BalanceSheet {
    let mut current_assets = BigDecimal::from(0);
    let mut fixed_assets = BigDecimal::from(0);
    let mut current_liabilities = BigDecimal::from(0);
    let mut long_term_liabilities = BigDecimal::from(0);
    let mut equity = BigDecimal::from(0);

    for record in entries {
        if !record.is_approved() || !record.dated_on_or_before(as_of) {
            continue;
        }

        let Some(account_type) = record.account_type else {
            warn!(
                account_code = record.account_code.as_deref().unwrap_or("<unknown>"),
                date = %record.transaction_date,
                "skipping entry without account classification"
            );
            continue;
        };

        let net = record.net_amount();
        match account_type {
            AccountType::Asset => match record.account_subtype {
                Some(AccountSubtype::CurrentAssets) => current_assets += &net,
                Some(_) => fixed_assets += &net,
                None => skip_unclassified(record),
            },
            AccountType::Liability => match record.account_subtype {
                Some(AccountSubtype::CurrentLiabilities) => current_liabilities += net.abs(),
                Some(_) => long_term_liabilities += net.abs(),
                None => skip_unclassified(record),
            },
            AccountType::Equity => equity += net.abs(),
            AccountType::Revenue | AccountType::Expense | AccountType::CostOfGoodsSold => {}
        }
    }

    let total_assets = &current_assets + &fixed_assets;
    let total_liabilities = &current_liabilities + &long_term_liabilities;
    let total_liabilities_and_equity = &total_liabilities + &equity;
    let is_balanced = validate_balance(&total_assets, &total_liabilities, &equity);

    BalanceSheet {
        as_of_date: as_of,
        current_assets,
        fixed_assets,
        total_assets,
        current_liabilities,
        long_term_liabilities,
        total_liabilities,
        equity,
        total_liabilities_and_equity,
        is_balanced,
    }
}

/// Sum every approved debit and credit leg dated on or before `as_of`.
///
/// Account classification is not consulted: the trial balance checks posting
/// integrity of the journal itself, so orphaned entries still count.
pub fn trial_balance(entries: &[EntryRecord], as_of: NaiveDate) -> TrialBalance {
    let mut total_debits = BigDecimal::from(0);
    let mut total_credits = BigDecimal::from(0);

    for record in entries {
        if !record.is_approved() || !record.dated_on_or_before(as_of) {
            continue;
        }
        total_debits += &record.debit_amount;
        total_credits += &record.credit_amount;
    }

    let is_balanced = total_debits == total_credits;

    TrialBalance {
        as_of_date: as_of,
        total_debits,
        total_credits,
        is_balanced,
    }
}

fn skip_unclassified(record: &EntryRecord) {
    warn!(
        account_code = record.account_code.as_deref().unwrap_or("<unknown>"),
        date = %record.transaction_date,
        "skipping balance-sheet entry without account subtype"
    );
}

fn percent_of(part: &BigDecimal, whole: &BigDecimal) -> BigDecimal {
    if *whole == BigDecimal::from(0) {
        return BigDecimal::from(0);
    }
    part * BigDecimal::from(100) / whole
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        account_type: Option<AccountType>,
        subtype: Option<AccountSubtype>,
        debit: i64,
        credit: i64,
    ) -> EntryRecord {
        EntryRecord {
            transaction_date: date(2024, 3, 15),
            status: TransactionStatus::Approved,
            debit_amount: BigDecimal::from(debit),
            credit_amount: BigDecimal::from(credit),
            account_code: Some("0000".to_string()),
            account_type,
            account_subtype: subtype,
        }
    }

    #[test]
    fn net_income_identity_holds() {
        let entries = vec![
            record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 12000),
            record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 3000),
            record(Some(AccountType::CostOfGoodsSold), Some(AccountSubtype::DirectCosts), 4500, 0),
            record(Some(AccountType::Expense), Some(AccountSubtype::OperatingExpenses), 2000, 0),
            record(Some(AccountType::Expense), Some(AccountSubtype::OperatingExpenses), 750, 0),
        ];

        let pnl = profit_and_loss(&entries, date(2024, 1, 1), date(2024, 12, 31));

        assert_eq!(pnl.total_revenue, BigDecimal::from(15000));
        assert_eq!(pnl.total_cogs, BigDecimal::from(4500));
        assert_eq!(pnl.total_expenses, BigDecimal::from(2750));
        assert_eq!(pnl.gross_profit, BigDecimal::from(10500));
        assert_eq!(pnl.operating_income, BigDecimal::from(7750));
        assert_eq!(
            pnl.net_income,
            &pnl.total_revenue - &pnl.total_cogs - &pnl.total_expenses
        );
        assert_eq!(pnl.net_income, pnl.operating_income);
    }

    #[test]
    fn empty_input_yields_zeroed_reports() {
        let pnl = profit_and_loss(&[], date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(pnl.total_revenue, BigDecimal::from(0));
        assert_eq!(pnl.total_cogs, BigDecimal::from(0));
        assert_eq!(pnl.total_expenses, BigDecimal::from(0));
        assert_eq!(pnl.net_income, BigDecimal::from(0));

        let sheet = balance_sheet(&[], date(2024, 1, 31));
        assert_eq!(sheet.total_assets, BigDecimal::from(0));
        assert_eq!(sheet.total_liabilities_and_equity, BigDecimal::from(0));
        assert!(sheet.is_balanced);

        let trial = trial_balance(&[], date(2024, 1, 31));
        assert_eq!(trial.total_debits, BigDecimal::from(0));
        assert!(trial.is_balanced);
    }

    #[test]
    fn balance_sheet_is_pure_and_repeatable() {
        let entries = vec![
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 5000, 1200),
            record(Some(AccountType::Liability), Some(AccountSubtype::CurrentLiabilities), 0, 3800),
        ];

        let first = balance_sheet(&entries, date(2024, 6, 30));
        let second = balance_sheet(&entries, date(2024, 6, 30));
        assert_eq!(first, second);
    }

    #[test]
    fn current_asset_debit_contributes_only_to_current_assets() {
        let entries = vec![record(
            Some(AccountType::Asset),
            Some(AccountSubtype::CurrentAssets),
            100,
            0,
        )];

        let sheet = balance_sheet(&entries, date(2024, 3, 31));
        assert_eq!(sheet.current_assets, BigDecimal::from(100));
        assert_eq!(sheet.fixed_assets, BigDecimal::from(0));
        assert_eq!(sheet.current_liabilities, BigDecimal::from(0));
        assert_eq!(sheet.long_term_liabilities, BigDecimal::from(0));
        assert_eq!(sheet.equity, BigDecimal::from(0));
        assert_eq!(sheet.total_assets, BigDecimal::from(100));
    }

    #[test]
    fn cash_sale_shows_in_both_reports() {
        let entries = vec![
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 85000, 0),
            record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 85000),
        ];

        let sheet = balance_sheet(&entries, date(2024, 12, 31));
        assert_eq!(sheet.current_assets, BigDecimal::from(85000));
        assert_eq!(sheet.total_assets, BigDecimal::from(85000));
        // Equity has not captured retained earnings, so the sheet reports
        // the imbalance instead of erroring.
        assert!(!sheet.is_balanced);

        let pnl = profit_and_loss(&entries, date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(pnl.total_revenue, BigDecimal::from(85000));
        assert_eq!(pnl.net_income, BigDecimal::from(85000));
    }

    #[test]
    fn liabilities_sum_credit_magnitudes_while_assets_net() {
        let entries = vec![
            record(Some(AccountType::Liability), Some(AccountSubtype::CurrentLiabilities), 0, 45000),
            record(Some(AccountType::Liability), Some(AccountSubtype::LongTermLiabilities), 0, 20000),
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 65000, 15000),
        ];

        let sheet = balance_sheet(&entries, date(2024, 12, 31));
        // Credit-normal buckets report magnitude, not signed net.
        assert_eq!(sheet.current_liabilities, BigDecimal::from(45000));
        assert_eq!(sheet.long_term_liabilities, BigDecimal::from(20000));
        assert_eq!(sheet.total_liabilities, BigDecimal::from(65000));
        // Asset buckets report signed net.
        assert_eq!(sheet.current_assets, BigDecimal::from(50000));
    }

    #[test]
    fn validate_balance_applies_tolerance() {
        assert!(validate_balance(
            &BigDecimal::from(100000),
            &BigDecimal::from(60000),
            &BigDecimal::from(40000),
        ));
        assert!(!validate_balance(
            &BigDecimal::from(100000),
            &BigDecimal::from(60000),
            &BigDecimal::from(39000),
        ));

        // A difference of exactly 0.01 is out; anything smaller is in.
        let cent = balance_tolerance();
        let assets = BigDecimal::from(100) + &cent;
        assert!(!validate_balance(
            &assets,
            &BigDecimal::from(40),
            &BigDecimal::from(60),
        ));
        let shaved = BigDecimal::from(100) + &cent / BigDecimal::from(2);
        assert!(validate_balance(
            &shaved,
            &BigDecimal::from(40),
            &BigDecimal::from(60),
        ));
    }

    #[test]
    fn unclassified_entries_are_skipped_not_fatal() {
        let mut orphan = record(None, None, 0, 9999);
        orphan.account_code = None;

        let mut untyped_asset = record(Some(AccountType::Asset), None, 500, 0);
        untyped_asset.account_code = Some("1400".to_string());

        let entries = vec![
            orphan,
            untyped_asset,
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 300, 0),
        ];

        let sheet = balance_sheet(&entries, date(2024, 12, 31));
        assert_eq!(sheet.current_assets, BigDecimal::from(300));
        assert_eq!(sheet.fixed_assets, BigDecimal::from(0));
        assert_eq!(sheet.total_assets, BigDecimal::from(300));

        let pnl = profit_and_loss(&entries, date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(pnl.total_revenue, BigDecimal::from(0));
    }

    #[test]
    fn equity_without_subtype_still_classifies() {
        // Only asset/liability dispatch needs the subtype.
        let entries = vec![record(Some(AccountType::Equity), None, 0, 70000)];

        let sheet = balance_sheet(&entries, date(2024, 12, 31));
        assert_eq!(sheet.equity, BigDecimal::from(70000));
    }

    #[test]
    fn pending_and_out_of_period_entries_are_excluded() {
        let mut pending = record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 1000);
        pending.status = TransactionStatus::Pending;

        let mut too_late = record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 2000);
        too_late.transaction_date = date(2024, 4, 1);

        let mut on_start = record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 300);
        on_start.transaction_date = date(2024, 3, 1);

        let mut on_end = record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 400);
        on_end.transaction_date = date(2024, 3, 31);

        let entries = vec![pending, too_late, on_start, on_end];

        let pnl = profit_and_loss(&entries, date(2024, 3, 1), date(2024, 3, 31));
        // Period bounds are inclusive; pending and April entries fall out.
        assert_eq!(pnl.total_revenue, BigDecimal::from(700));

        let sheet_march = balance_sheet(&entries, date(2024, 3, 31));
        let trial_march = trial_balance(&entries, date(2024, 3, 31));
        assert_eq!(trial_march.total_credits, BigDecimal::from(700));
        assert!(sheet_march.is_balanced); // revenue entries don't hit the sheet
    }

    #[test]
    fn margins_degrade_to_zero_without_revenue() {
        let entries = vec![record(
            Some(AccountType::Expense),
            Some(AccountSubtype::OperatingExpenses),
            5000,
            0,
        )];

        let pnl = profit_and_loss(&entries, date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(pnl.gross_margin_percent(), BigDecimal::from(0));
        assert_eq!(pnl.net_margin_percent(), BigDecimal::from(0));
        assert_eq!(pnl.expense_ratio_percent(), BigDecimal::from(0));
    }

    #[test]
    fn margins_compute_as_percent_of_revenue() {
        let entries = vec![
            record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 1000),
            record(Some(AccountType::CostOfGoodsSold), Some(AccountSubtype::DirectCosts), 400, 0),
            record(Some(AccountType::Expense), Some(AccountSubtype::OperatingExpenses), 100, 0),
        ];

        let pnl = profit_and_loss(&entries, date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(pnl.gross_margin_percent(), BigDecimal::from(60));
        assert_eq!(pnl.net_margin_percent(), BigDecimal::from(50));
        assert_eq!(pnl.expense_ratio_percent(), BigDecimal::from(10));
    }

    #[test]
    fn trial_balance_totals_match_posted_legs() {
        let entries = vec![
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 5000, 0),
            record(Some(AccountType::Revenue), Some(AccountSubtype::OperatingRevenue), 0, 5000),
            record(Some(AccountType::Expense), Some(AccountSubtype::OperatingExpenses), 800, 0),
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 0, 800),
        ];

        let trial = trial_balance(&entries, date(2024, 12, 31));
        assert_eq!(trial.total_debits, BigDecimal::from(5800));
        assert_eq!(trial.total_credits, BigDecimal::from(5800));
        assert!(trial.is_balanced);
    }

    #[test]
    fn revalidate_recomputes_totals_after_edit() {
        let entries = vec![
            record(Some(AccountType::Asset), Some(AccountSubtype::CurrentAssets), 60000, 0),
            record(Some(AccountType::Liability), Some(AccountSubtype::CurrentLiabilities), 0, 25000),
            record(Some(AccountType::Equity), Some(AccountSubtype::OwnersEquity), 0, 35000),
        ];

        let mut sheet = balance_sheet(&entries, date(2024, 12, 31));
        assert!(sheet.is_balanced);

        sheet.current_assets = BigDecimal::from(61000);
        sheet.revalidate();
        assert_eq!(sheet.total_assets, BigDecimal::from(61000));
        assert!(!sheet.is_balanced);
    }
}
