//! Financial reporting: the ledger aggregation engine and report snapshots

pub mod aggregator;
pub mod report;

pub use aggregator::*;
pub use report::*;
