//! A print job from quote to cash in the bank

use printbooks_core::utils::MemoryStorage;
use printbooks_core::{patterns, Books, PartyKind};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🖨️  Printbooks - Job to Cash Example\n");

    let storage = MemoryStorage::new();
    let mut books = Books::new(storage);

    // 1. Set up the shop's chart of accounts
    println!("📊 Setting up Chart of Accounts...");
    let chart = books.setup_print_shop_chart().await?;
    for account in chart.values() {
        println!(
            "  ✓ Created account: {} - {} ({:?})",
            account.code, account.name, account.account_type
        );
    }
    println!();

    // 2. Fund the shop and buy the press
    println!("💰 Opening the books...\n");

    let investment = patterns::owner_investment(
        "TXN-001".to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        "Initial owner investment".to_string(),
        chart["cash"].code.clone(),
        chart["owners_equity"].code.clone(),
        BigDecimal::from(40000),
    )?;
    books.post_transaction(investment).await?;
    println!("  ✓ Posted: Owner investment of $40,000");

    let loan = patterns::loan_received(
        "TXN-002".to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
        "Equipment loan drawdown".to_string(),
        chart["cash"].code.clone(),
        chart["equipment_loan"].code.clone(),
        BigDecimal::from(25000),
    )?;
    books.post_transaction(loan).await?;
    println!("  ✓ Posted: Equipment loan of $25,000");

    let press = patterns::asset_purchase(
        "TXN-003".to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
        "Refurbished offset press".to_string(),
        chart["press_equipment"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(25000),
    )?;
    books.post_transaction(press).await?;
    println!("  ✓ Posted: Press purchase of $25,000");

    // 3. A customer brings in a job
    println!("\n📋 Taking a job...\n");

    let customer = books
        .create_party(
            "Harbour Cafe".to_string(),
            PartyKind::Customer,
            chart["accounts_receivable"].code.clone(),
        )
        .await?;
    println!("  ✓ Registered customer: {}", customer.name);

    let job = books
        .open_job(
            "J-2026-0001".to_string(),
            customer.id,
            "500 menus, full colour, laminated".to_string(),
            500,
            BigDecimal::from_str("1.70")?,
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        )
        .await?;
    println!(
        "  ✓ Opened job {} ({:?}), quoted at ${}",
        job.job_number,
        job.status,
        job.total()
    );

    books.start_job(job.id).await?;
    println!("  ✓ Job on the press");

    let materials = patterns::expense_payment(
        "TXN-004".to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 11).unwrap(),
        "Laminate film for J-2026-0001".to_string(),
        chart["materials_cost"].code.clone(),
        chart["cash"].code.clone(),
        BigDecimal::from(120),
    )?;
    books.post_transaction(materials).await?;
    println!("  ✓ Posted: Materials for the job, $120");

    books
        .complete_job(job.id, NaiveDate::from_ymd_opt(2026, 1, 14).unwrap())
        .await?;
    println!("  ✓ Job completed");

    // 4. Invoice the finished work and collect
    println!("\n🧾 Invoicing and collecting...\n");

    let (job, invoice) = books
        .invoice_job(
            job.id,
            "INV-0001".to_string(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            chart["job_revenue"].code.clone(),
            None,
        )
        .await?;
    println!(
        "  ✓ Invoiced job {} as {} ({:?})",
        job.job_number, invoice.id, job.status
    );

    let payment = patterns::customer_payment(
        "PAY-0001".to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 28).unwrap(),
        "Payment for INV-0001".to_string(),
        chart["cash"].code.clone(),
        chart["accounts_receivable"].code.clone(),
        BigDecimal::from(850),
        customer.id,
    )?;
    books.post_transaction(payment).await?;
    println!("  ✓ Posted: Customer payment of $850");

    // 5. Where does the customer stand?
    let statement = books
        .party_statement(
            customer.id,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .await?;

    println!("\n📄 Statement for {}:", statement.party_name);
    println!("  Opening balance: ${}", statement.opening_balance);
    for line in &statement.lines {
        println!(
            "    {} {} debit ${} credit ${} -> ${}",
            line.date, line.transaction_id, line.debit_amount, line.credit_amount,
            line.running_balance
        );
    }
    println!("  Closing balance: ${}", statement.closing_balance);

    println!(
        "\n  Cash on hand: ${}",
        books.account_balance(&chart["cash"].code).await?
    );

    println!("\n🎉 Job delivered, invoiced, and paid!");
    Ok(())
}
