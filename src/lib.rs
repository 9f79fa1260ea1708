//! # Printbooks Core
//!
//! The bookkeeping engine for a small print shop: double-entry books,
//! customers and suppliers with control-account subledgers, job sheets
//! from quote to invoice, and financial reporting.
//!
//! ## Features
//!
//! - **Double-entry bookkeeping**: Pending/Approved transaction lifecycle
//!   with balance tracking across Assets, Liabilities, Equity, Revenue,
//!   Cost of Goods Sold, and Expense accounts
//! - **Report aggregation**: Profit & loss, balance sheet, and trial
//!   balance derived from posted entries by pure, total functions
//! - **Counterparties**: Customer and supplier records with per-party
//!   statements over their receivable/payable control accounts
//! - **Job sheets**: Print jobs tracked Open through Invoiced, with
//!   invoicing posting straight into the books
//! - **Access control**: Pure role-to-scope capability checks
//! - **Storage abstraction**: Database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use printbooks_core::{Books, MemoryStorage, patterns};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), printbooks_core::BooksError> {
//! let mut books = Books::new(MemoryStorage::new());
//! let chart = books.setup_print_shop_chart().await?;
//!
//! let investment = patterns::owner_investment(
//!     "TXN-1".to_string(),
//!     NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!     "Opening capital".to_string(),
//!     chart["cash"].code.clone(),
//!     chart["owners_equity"].code.clone(),
//!     BigDecimal::from(20000),
//! )?;
//! books.post_transaction(investment).await?;
//!
//! let sheet = books
//!     .balance_sheet(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap())
//!     .await?;
//! assert!(sheet.is_balanced);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod jobs;
pub mod ledger;
pub mod party;
pub mod reporting;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use access::*;
pub use jobs::*;
pub use ledger::*;
pub use party::*;
pub use reporting::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_storage::MemoryStorage;
pub use utils::session::{SessionStore, UserSession};
pub use utils::throttle::{RateLimiter, RateLimiterConfig};

// Re-export transaction patterns for convenience
pub use ledger::transaction::patterns;
