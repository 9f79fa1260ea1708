//! Integration tests for printbooks-core

use printbooks_core::{
    patterns,
    utils::{EnhancedAccountValidator, EnhancedTransactionValidator, MemoryStorage},
    Account, AccountSubtype, AccountType, Books, BooksError, BooksStorage, JobStatus, PartyKind,
    ReportKind, ReportStatus, TransactionBuilder, TransactionStatus,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn complete_print_shop_workflow() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);

    // Set up chart of accounts
    let chart = books.setup_print_shop_chart().await.unwrap();
    assert!(chart.contains_key("cash"));
    assert!(chart.contains_key("accounts_receivable"));
    assert!(chart.contains_key("job_revenue"));

    // Owner funds the shop
    let investment = patterns::owner_investment(
        "TXN-1".to_string(),
        date(2026, 1, 5),
        "Opening capital".to_string(),
        chart["cash"].code.clone(),
        chart["owners_equity"].code.clone(),
        BigDecimal::from(50000),
    )
    .unwrap();
    books.post_transaction(investment).await.unwrap();

    // A customer walks in with a job
    let customer = books
        .create_party(
            "Harbour Cafe".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await
        .unwrap();

    let job = books
        .open_job(
            "J-2026-0001".to_string(),
            customer.id,
            "500 menus, full colour".to_string(),
            500,
            BigDecimal::from_str("1.70").unwrap(),
            date(2026, 1, 10),
        )
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(job.total(), BigDecimal::from(850));

    // Work the job and invoice it
    books.start_job(job.id).await.unwrap();
    books.complete_job(job.id, date(2026, 1, 14)).await.unwrap();
    let (invoiced_job, invoice) = books
        .invoice_job(
            job.id,
            "INV-0001".to_string(),
            date(2026, 1, 15),
            chart["job_revenue"].code.clone(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(invoiced_job.status, JobStatus::Invoiced);
    assert_eq!(
        invoiced_job.invoice_transaction_id.as_deref(),
        Some("INV-0001")
    );
    assert_eq!(invoice.party_id, Some(customer.id));

    // Receivable carries the quoted total
    assert_eq!(
        books
            .account_balance(&chart["accounts_receivable"].code)
            .await
            .unwrap(),
        BigDecimal::from(850)
    );
    assert_eq!(
        books.party_balance(customer.id, None).await.unwrap(),
        BigDecimal::from(850)
    );

    // Customer pays
    let payment = patterns::customer_payment(
        "PAY-0001".to_string(),
        date(2026, 1, 25),
        "Payment for INV-0001".to_string(),
        chart["cash"].code.clone(),
        chart["accounts_receivable"].code.clone(),
        BigDecimal::from(850),
        customer.id,
    )
    .unwrap();
    books.post_transaction(payment).await.unwrap();

    assert_eq!(
        books.party_balance(customer.id, None).await.unwrap(),
        BigDecimal::from(0)
    );
    // Before the payment landed, the receivable was still outstanding
    assert_eq!(
        books
            .party_balance(customer.id, Some(date(2026, 1, 20)))
            .await
            .unwrap(),
        BigDecimal::from(850)
    );
    assert_eq!(
        books.account_balance(&chart["cash"].code).await.unwrap(),
        BigDecimal::from(50850)
    );

    // Month-end reporting
    let statement = books
        .profit_and_loss(date(2026, 1, 1), date(2026, 1, 31))
        .await
        .unwrap();
    assert_eq!(statement.total_revenue, BigDecimal::from(850));
    assert_eq!(statement.net_income, BigDecimal::from(850));

    // Until the month is closed, January's earnings sit outside equity
    // and the sheet reports the gap instead of erroring
    let sheet = books.balance_sheet(date(2026, 1, 31)).await.unwrap();
    assert_eq!(sheet.total_assets, BigDecimal::from(50850));
    assert_eq!(sheet.equity, BigDecimal::from(50000));
    assert!(!sheet.is_balanced);

    let close = TransactionBuilder::new(
        "TXN-CLOSE".to_string(),
        date(2026, 1, 31),
        "Close January to retained earnings".to_string(),
    )
    .debit(chart["job_revenue"].code.clone(), BigDecimal::from(850), None)
    .credit(
        chart["retained_earnings"].code.clone(),
        BigDecimal::from(850),
        None,
    )
    .build()
    .unwrap();
    books.post_transaction(close).await.unwrap();

    let sheet = books.balance_sheet(date(2026, 1, 31)).await.unwrap();
    assert_eq!(sheet.equity, BigDecimal::from(50850));
    assert!(sheet.is_balanced);

    // Revenue accumulates credit legs only, so the closing debit does not
    // disturb the P&L for the same period
    let statement = books
        .profit_and_loss(date(2026, 1, 1), date(2026, 1, 31))
        .await
        .unwrap();
    assert_eq!(statement.total_revenue, BigDecimal::from(850));

    let integrity = books.validate_integrity(date(2026, 1, 31)).await.unwrap();
    assert!(integrity.is_valid, "issues: {:?}", integrity.issues);
}

#[tokio::test]
async fn approval_freezes_transactions() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    let mut rent = patterns::expense_payment(
        "TXN-RENT".to_string(),
        date(2026, 2, 1),
        "February rent".to_string(),
        chart["rent_expense"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(1500),
    )
    .unwrap();
    books.record_transaction(rent.clone()).await.unwrap();

    // Pending transactions are editable and invisible to reports
    rent.description = "February rent, unit 4".to_string();
    books.update_transaction(&rent).await.unwrap();

    let statement = books
        .profit_and_loss(date(2026, 2, 1), date(2026, 2, 28))
        .await
        .unwrap();
    assert_eq!(statement.total_expenses, BigDecimal::from(0));

    // Approval applies balances and locks the transaction down
    let approved = books.approve_transaction("TXN-RENT").await.unwrap();
    assert_eq!(approved.status, TransactionStatus::Approved);
    assert_eq!(
        books
            .account_balance(&chart["rent_expense"].code)
            .await
            .unwrap(),
        BigDecimal::from(1500)
    );

    let statement = books
        .profit_and_loss(date(2026, 2, 1), date(2026, 2, 28))
        .await
        .unwrap();
    assert_eq!(statement.total_expenses, BigDecimal::from(1500));

    let edit = books.update_transaction(&approved).await;
    assert!(matches!(edit, Err(BooksError::InvalidTransaction(_))));

    let removal = books.remove_transaction("TXN-RENT").await;
    assert!(matches!(removal, Err(BooksError::InvalidTransaction(_))));

    // Approving twice is rejected
    let again = books.approve_transaction("TXN-RENT").await;
    assert!(matches!(again, Err(BooksError::InvalidTransition(_))));
}

#[tokio::test]
async fn party_statement_tracks_the_control_account() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    let customer = books
        .create_party(
            "Westside Gallery".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await
        .unwrap();

    // An invoice before the statement period forms the opening balance
    let early_invoice = patterns::customer_invoice(
        "INV-OLD".to_string(),
        date(2026, 2, 20),
        "Exhibition posters".to_string(),
        chart["accounts_receivable"].code.clone(),
        chart["job_revenue"].code.clone(),
        BigDecimal::from(400),
        customer.id,
    )
    .unwrap();
    books.post_transaction(early_invoice).await.unwrap();

    // Activity inside the period
    let march_invoice = patterns::customer_invoice(
        "INV-100".to_string(),
        date(2026, 3, 4),
        "Catalogue print run".to_string(),
        chart["accounts_receivable"].code.clone(),
        chart["job_revenue"].code.clone(),
        BigDecimal::from(1200),
        customer.id,
    )
    .unwrap();
    books.post_transaction(march_invoice).await.unwrap();

    let payment = patterns::customer_payment(
        "PAY-100".to_string(),
        date(2026, 3, 18),
        "Part payment".to_string(),
        chart["cash"].code.clone(),
        chart["accounts_receivable"].code.clone(),
        BigDecimal::from(900),
        customer.id,
    )
    .unwrap();
    books.post_transaction(payment).await.unwrap();

    let statement = books
        .party_statement(customer.id, date(2026, 3, 1), date(2026, 3, 31))
        .await
        .unwrap();

    assert_eq!(statement.opening_balance, BigDecimal::from(400));
    assert_eq!(statement.lines.len(), 2);
    assert_eq!(statement.lines[0].transaction_id, "INV-100");
    assert_eq!(statement.lines[0].running_balance, BigDecimal::from(1600));
    assert_eq!(statement.lines[1].transaction_id, "PAY-100");
    assert_eq!(statement.lines[1].running_balance, BigDecimal::from(700));
    assert_eq!(statement.closing_balance, BigDecimal::from(700));
}

#[tokio::test]
async fn supplier_balances_run_credit_normal() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    let supplier = books
        .create_party(
            "Rollins Paper Supply".to_string(),
            PartyKind::Supplier,
            chart["accounts_payable"].code.clone(),
        )
        .await
        .unwrap();

    let bill = patterns::supplier_bill(
        "BILL-7".to_string(),
        date(2026, 3, 2),
        "Coated stock, 20 reams".to_string(),
        chart["materials_cost"].code.clone(),
        chart["accounts_payable"].code.clone(),
        BigDecimal::from(640),
        supplier.id,
    )
    .unwrap();
    books.post_transaction(bill).await.unwrap();

    assert_eq!(
        books.party_balance(supplier.id, None).await.unwrap(),
        BigDecimal::from(640)
    );

    let payment = patterns::supplier_payment(
        "PAY-7".to_string(),
        date(2026, 3, 28),
        "Settle BILL-7".to_string(),
        chart["accounts_payable"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(640),
        supplier.id,
    )
    .unwrap();
    books.post_transaction(payment).await.unwrap();

    assert_eq!(
        books.party_balance(supplier.id, None).await.unwrap(),
        BigDecimal::from(0)
    );
}

#[tokio::test]
async fn archived_parties_take_no_new_postings() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    let customer = books
        .create_party(
            "Pop-up Market Stall".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await
        .unwrap();
    books.archive_party(customer.id).await.unwrap();

    let invoice = patterns::customer_invoice(
        "INV-X".to_string(),
        date(2026, 4, 1),
        "Flyers".to_string(),
        chart["accounts_receivable"].code.clone(),
        chart["job_revenue"].code.clone(),
        BigDecimal::from(100),
        customer.id,
    )
    .unwrap();

    let result = books.post_transaction(invoice).await;
    assert!(matches!(result, Err(BooksError::Validation(_))));

    // Opening a job for an archived customer fails the same way
    let job = books
        .open_job(
            "J-2026-0099".to_string(),
            customer.id,
            "Banner".to_string(),
            1,
            BigDecimal::from(200),
            date(2026, 4, 2),
        )
        .await;
    assert!(matches!(job, Err(BooksError::Validation(_))));
}

#[tokio::test]
async fn reports_are_snapshots_and_finalize_once() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    let customer = books
        .create_party(
            "Quick Cards".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await
        .unwrap();
    let sale = patterns::customer_invoice(
        "INV-1".to_string(),
        date(2026, 5, 5),
        "Business cards".to_string(),
        chart["accounts_receivable"].code.clone(),
        chart["job_revenue"].code.clone(),
        BigDecimal::from(300),
        customer.id,
    )
    .unwrap();
    books.post_transaction(sale).await.unwrap();

    let report = books
        .generate_profit_and_loss_report("june".to_string(), date(2026, 5, 1), date(2026, 5, 31))
        .await
        .unwrap();
    assert_eq!(report.status, ReportStatus::Draft);

    // Later postings do not rewrite the saved snapshot
    let rent = patterns::expense_payment(
        "TXN-RENT".to_string(),
        date(2026, 5, 20),
        "May rent".to_string(),
        chart["rent_expense"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(1500),
    )
    .unwrap();
    books.post_transaction(rent).await.unwrap();

    let reread = books.get_report(report.id).await.unwrap();
    match &reread.body {
        printbooks_core::ReportBody::ProfitAndLoss(statement) => {
            assert_eq!(statement.total_expenses, BigDecimal::from(0));
            assert_eq!(statement.net_income, BigDecimal::from(300));
        }
        other => panic!("expected a profit and loss body, got {:?}", other.kind()),
    }

    let sheet_report = books
        .generate_balance_sheet_report("june".to_string(), date(2026, 5, 31))
        .await
        .unwrap();

    // Listing filters by kind
    let pnl_reports = books
        .list_reports(Some(ReportKind::ProfitAndLoss))
        .await
        .unwrap();
    assert_eq!(pnl_reports.len(), 1);
    let all_reports = books.list_reports(None).await.unwrap();
    assert_eq!(all_reports.len(), 2);

    // Finalize exactly once
    let finalized = books.finalize_report(sheet_report.id).await.unwrap();
    assert_eq!(finalized.status, ReportStatus::Finalized);

    let second = books.finalize_report(sheet_report.id).await;
    assert!(matches!(second, Err(BooksError::InvalidTransition(_))));

    let stored = books.get_report(sheet_report.id).await.unwrap();
    assert_eq!(stored.status, ReportStatus::Finalized);
}

#[tokio::test]
async fn job_lifecycle_guards_hold() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    let customer = books
        .create_party(
            "Night Market Collective".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await
        .unwrap();

    let job = books
        .open_job(
            "J-2026-0050".to_string(),
            customer.id,
            "Vinyl banners x3".to_string(),
            3,
            BigDecimal::from(180),
            date(2026, 6, 1),
        )
        .await
        .unwrap();

    // Cannot invoice straight from Open
    let premature = books
        .invoice_job(
            job.id,
            "INV-50".to_string(),
            date(2026, 6, 2),
            chart["job_revenue"].code.clone(),
            None,
        )
        .await;
    assert!(matches!(premature, Err(BooksError::InvalidTransition(_))));

    // And the failed attempt posted nothing
    assert!(books.get_transaction("INV-50").await.unwrap().is_none());

    // Cancel, then nothing further is possible
    books.cancel_job(job.id).await.unwrap();
    let restart = books.start_job(job.id).await;
    assert!(matches!(restart, Err(BooksError::InvalidTransition(_))));

    let listed = books
        .list_jobs(Some(customer.id), Some(JobStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn enhanced_validators_tighten_write_rules() {
    let storage = MemoryStorage::new();
    let mut books = Books::with_validators(
        storage,
        Box::new(EnhancedAccountValidator),
        Box::new(EnhancedTransactionValidator),
    );
    let chart = books.setup_print_shop_chart().await.unwrap();

    // Whitespace-only description is rejected
    let blank = TransactionBuilder::new("TXN-B".to_string(), date(2026, 7, 1), "   ".to_string())
        .debit(chart["cash"].code.clone(), BigDecimal::from(10), None)
        .credit(chart["job_revenue"].code.clone(), BigDecimal::from(10), None)
        .build()
        .unwrap();
    let result = books.record_transaction(blank).await;
    assert!(matches!(result, Err(BooksError::Validation(_))));

    // Same account twice on one side is rejected
    let doubled = TransactionBuilder::new(
        "TXN-D".to_string(),
        date(2026, 7, 1),
        "Split deposit".to_string(),
    )
    .debit(chart["cash"].code.clone(), BigDecimal::from(60), None)
    .debit(chart["cash"].code.clone(), BigDecimal::from(40), None)
    .credit(chart["job_revenue"].code.clone(), BigDecimal::from(100), None)
    .build()
    .unwrap();
    let result = books.record_transaction(doubled).await;
    assert!(matches!(result, Err(BooksError::Validation(_))));

    // Account code with spaces is rejected at creation
    let bad_account = books
        .create_account(
            "10 00".to_string(),
            "Petty Cash".to_string(),
            AccountType::Asset,
            AccountSubtype::CurrentAssets,
            None,
        )
        .await;
    assert!(matches!(bad_account, Err(BooksError::Validation(_))));
}

#[tokio::test]
async fn account_hierarchy_paths_resolve() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    // Large-format printer sits under press equipment
    let printer = books
        .create_account(
            "1510".to_string(),
            "Large Format Printer".to_string(),
            AccountType::Asset,
            AccountSubtype::FixedAssets,
            Some(chart["press_equipment"].code.clone()),
        )
        .await
        .unwrap();
    assert_eq!(
        printer.parent_code.as_deref(),
        Some(chart["press_equipment"].code.as_str())
    );

    let asset_accounts = books
        .list_accounts_by_type(AccountType::Asset)
        .await
        .unwrap();
    assert_eq!(asset_accounts.len(), 5);

    let children = books
        .child_accounts(&chart["press_equipment"].code)
        .await
        .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].code, "1510");

    let path = books.account_path("1510").await.unwrap();
    let codes: Vec<&str> = path.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["1500", "1510"]);

    // Creating under a missing parent fails
    let orphan = books
        .create_account(
            "1520".to_string(),
            "Guillotine".to_string(),
            AccountType::Asset,
            AccountSubtype::FixedAssets,
            Some("1999".to_string()),
        )
        .await;
    assert!(matches!(orphan, Err(BooksError::Validation(_))));
}

#[tokio::test]
async fn date_range_filtering_is_inclusive() {
    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await.unwrap();

    for (id, on, amount) in [
        ("TXN-J", date(2026, 1, 31), 1000),
        ("TXN-F", date(2026, 2, 1), 2000),
    ] {
        let sale = TransactionBuilder::new(id.to_string(), on, "Walk-in sale".to_string())
            .debit(chart["cash"].code.clone(), BigDecimal::from(amount), None)
            .credit(
                chart["job_revenue"].code.clone(),
                BigDecimal::from(amount),
                None,
            )
            .build()
            .unwrap();
        books.post_transaction(sale).await.unwrap();
    }

    let january = books
        .get_transactions(Some(date(2026, 1, 1)), Some(date(2026, 1, 31)))
        .await
        .unwrap();
    assert_eq!(january.len(), 1);
    assert_eq!(january[0].id, "TXN-J");

    // Period boundaries are inclusive on both ends
    let statement = books
        .profit_and_loss(date(2026, 1, 31), date(2026, 2, 1))
        .await
        .unwrap();
    assert_eq!(statement.total_revenue, BigDecimal::from(3000));
}

#[tokio::test]
async fn memory_storage_round_trips_every_entity() {
    let mut storage = MemoryStorage::new();

    let account = Account::new(
        "1000".to_string(),
        "Cash".to_string(),
        AccountType::Asset,
        AccountSubtype::CurrentAssets,
        None,
    );
    storage.save_account(&account).await.unwrap();
    assert_eq!(
        storage.get_account("1000").await.unwrap().unwrap().name,
        "Cash"
    );

    let transaction = TransactionBuilder::new(
        "TXN-1".to_string(),
        date(2026, 8, 1),
        "Stock purchase".to_string(),
    )
    .debit("1300".to_string(), BigDecimal::from(100), None)
    .credit("1000".to_string(), BigDecimal::from(100), None)
    .build()
    .unwrap();
    storage.save_transaction(&transaction).await.unwrap();
    assert!(storage.get_transaction("TXN-1").await.unwrap().is_some());

    let by_account = storage
        .get_account_transactions("1300", None, None)
        .await
        .unwrap();
    assert_eq!(by_account.len(), 1);

    // Updating entities that were never saved reports not-found
    let ghost = Account::new(
        "8888".to_string(),
        "Ghost".to_string(),
        AccountType::Expense,
        AccountSubtype::OperatingExpenses,
        None,
    );
    assert!(matches!(
        storage.update_account(&ghost).await,
        Err(BooksError::AccountNotFound(_))
    ));
}

#[test]
fn report_json_uses_screaming_snake_case_tags() {
    let statement = printbooks_core::ProfitAndLoss {
        period_start: date(2026, 1, 1),
        period_end: date(2026, 1, 31),
        total_revenue: BigDecimal::from(850),
        total_cogs: BigDecimal::from(200),
        gross_profit: BigDecimal::from(650),
        total_expenses: BigDecimal::from(150),
        operating_income: BigDecimal::from(500),
        net_income: BigDecimal::from(500),
    };
    let report = printbooks_core::FinancialReport::new(
        "January P&L".to_string(),
        "owner".to_string(),
        printbooks_core::ReportBody::ProfitAndLoss(statement),
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "DRAFT");
    assert_eq!(json["body"]["report_type"], "PROFIT_AND_LOSS");
    assert_eq!(json["body"]["total_revenue"], "850");
}
