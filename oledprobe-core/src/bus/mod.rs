//! Bus transaction layer
//!
//! Builds command links and classifies the driver's answer.

pub mod result;
pub mod transaction;

pub use result::CommandResult;
pub use transaction::{submit, Transaction, TransactionBuilder, MAX_OPERATIONS};
