//! Utility modules

pub mod memory_storage;
pub mod session;
pub mod throttle;
pub mod validation;

pub use memory_storage::*;
pub use session::*;
pub use throttle::*;
pub use validation::*;
