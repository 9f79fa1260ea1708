//! Ledger module: chart management, transaction processing, and the
//! orchestrating `Books` facade

pub mod account;
pub mod core;
pub mod transaction;

pub use self::account::*;
pub use self::core::*;
pub use self::transaction::*;
