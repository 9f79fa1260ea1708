//! Month-end reporting: P&L, balance sheet, trial balance, and saved reports

use printbooks_core::utils::MemoryStorage;
use printbooks_core::{patterns, Books, PartyKind, ReportKind, TransactionBuilder};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📈 Printbooks - Financial Reports Example\n");

    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);
    let chart = books.setup_print_shop_chart().await?;

    // 1. A month of trading
    println!("💰 Posting a month of activity...\n");

    let opening = patterns::owner_investment(
        "TXN-100".to_string(),
        date(1),
        "Working capital top-up".to_string(),
        chart["cash"].code.clone(),
        chart["owners_equity"].code.clone(),
        BigDecimal::from(10000),
    )?;
    books.post_transaction(opening).await?;

    let customer = books
        .create_party(
            "Civic Theatre".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await?;
    let supplier = books
        .create_party(
            "Rollins Paper Supply".to_string(),
            PartyKind::Supplier,
            chart["accounts_payable"].code.clone(),
        )
        .await?;

    let invoice = patterns::customer_invoice(
        "INV-200".to_string(),
        date(6),
        "Season programmes, 2000 copies".to_string(),
        chart["accounts_receivable"].code.clone(),
        chart["job_revenue"].code.clone(),
        BigDecimal::from(5200),
        customer.id,
    )?;
    books.post_transaction(invoice).await?;
    println!("  ✓ Invoiced Civic Theatre $5,200");

    let stock = patterns::supplier_bill(
        "BILL-31".to_string(),
        date(8),
        "Gloss stock for programmes".to_string(),
        chart["materials_cost"].code.clone(),
        chart["accounts_payable"].code.clone(),
        BigDecimal::from(1400),
        supplier.id,
    )?;
    books.post_transaction(stock).await?;
    println!("  ✓ Billed by Rollins Paper $1,400 (materials)");

    let rent = patterns::expense_payment(
        "TXN-101".to_string(),
        date(15),
        "March rent".to_string(),
        chart["rent_expense"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(1500),
    )?;
    books.post_transaction(rent).await?;

    let power = patterns::expense_payment(
        "TXN-102".to_string(),
        date(20),
        "Electricity".to_string(),
        chart["utilities_expense"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(320),
    )?;
    books.post_transaction(power).await?;
    println!("  ✓ Paid rent $1,500 and utilities $320");

    // 2. Profit and loss for the month
    let statement = books.profit_and_loss(date(1), date(31)).await?;

    println!("\n💹 Profit & Loss for March 2026:");
    println!("  Revenue:          ${}", statement.total_revenue);
    println!("  Cost of goods:    ${}", statement.total_cogs);
    println!("  Gross profit:     ${}", statement.gross_profit);
    println!("  Expenses:         ${}", statement.total_expenses);
    println!("  Operating income: ${}", statement.operating_income);
    println!("  Net income:       ${}", statement.net_income);
    println!("  Gross margin:     {}%", statement.gross_margin_percent());
    println!("  Net margin:       {}%", statement.net_margin_percent());

    // 3. Balance sheet before the close: the month's earnings have not
    //    reached equity yet, so the sheet reports the gap
    let sheet = books.balance_sheet(date(31)).await?;

    println!("\n📊 Balance Sheet as of March 31, 2026 (before close):");
    println!("  Current assets:        ${}", sheet.current_assets);
    println!("  Fixed assets:          ${}", sheet.fixed_assets);
    println!("  Total assets:          ${}", sheet.total_assets);
    println!("  Current liabilities:   ${}", sheet.current_liabilities);
    println!("  Long-term liabilities: ${}", sheet.long_term_liabilities);
    println!("  Equity:                ${}", sheet.equity);
    println!(
        "  Balanced: {}",
        if sheet.is_balanced { "✅ Yes" } else { "❌ No" }
    );

    let trial = books.trial_balance(date(31)).await?;
    println!("\n🔍 Trial Balance:");
    println!("  Total debits:  ${}", trial.total_debits);
    println!("  Total credits: ${}", trial.total_credits);

    // 4. Close March into retained earnings: zero out each income account
    //    and move the net to equity
    println!("\n🔒 Closing the month to retained earnings...");
    let close = TransactionBuilder::new(
        "TXN-CLOSE-MAR".to_string(),
        date(31),
        "Close March 2026 to retained earnings".to_string(),
    )
    .debit(
        chart["job_revenue"].code.clone(),
        statement.total_revenue.clone(),
        None,
    )
    .credit(
        chart["materials_cost"].code.clone(),
        statement.total_cogs.clone(),
        None,
    )
    .credit(chart["rent_expense"].code.clone(), BigDecimal::from(1500), None)
    .credit(
        chart["utilities_expense"].code.clone(),
        BigDecimal::from(320),
        None,
    )
    .credit(
        chart["retained_earnings"].code.clone(),
        statement.net_income.clone(),
        None,
    )
    .build()?;
    books.post_transaction(close).await?;

    let sheet = books.balance_sheet(date(31)).await?;
    println!("  Equity after close:    ${}", sheet.equity);
    println!(
        "  Balanced: {}",
        if sheet.is_balanced { "✅ Yes" } else { "❌ No" }
    );

    // 5. Persist the month-end reports and finalize them
    println!("\n🗂  Saving month-end reports...");
    let pnl_report = books
        .generate_profit_and_loss_report("owner".to_string(), date(1), date(31))
        .await?;
    let sheet_report = books
        .generate_balance_sheet_report("owner".to_string(), date(31))
        .await?;

    books.finalize_report(pnl_report.id).await?;
    books.finalize_report(sheet_report.id).await?;

    for report in books.list_reports(Some(ReportKind::BalanceSheet)).await? {
        println!("  ✓ {} ({:?})", report.name, report.status);
    }

    // 6. Integrity sweep
    let integrity = books.validate_integrity(date(31)).await?;
    if integrity.is_valid {
        println!("\n✅ Books are in balance.");
    } else {
        println!("\n❌ Integrity issues:");
        for issue in &integrity.issues {
            println!("  - {}", issue);
        }
    }

    Ok(())
}
