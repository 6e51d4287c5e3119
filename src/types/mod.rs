//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account records and reporting statements
//! - `loan`: Loan records and aggregate counters
//! - `operation`: Identifiers and script operation records
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod error;
pub mod loan;
pub mod operation;

pub use account::{Account, AccountStatement};
pub use error::{CustodyError, LedgerError};
pub use loan::{Loan, PlatformStats};
pub use operation::{
    Amount, Identity, LoanId, OperationRecord, OperationType, Outcome, Timestamp,
};
