//! Ledger Engine Library
//!
//! # Overview
//!
//! A single-ledger accounting engine: owners open interest-bearing deposit
//! accounts, move principal between accounts, and borrow against
//! over-collateralized loans. Every movement of value is mirrored by a
//! transfer through a custody collaborator, and time comes from a clock
//! collaborator.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Identity, Account, Loan, LedgerError, ...)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Ledger operations and their atomic commit
//!   - [`core::account_manager`] - Deposit account state
//!   - [`core::loan_book`] - Loan records and the global loan id counter
//!   - [`core::interest`] - Integer interest and collateral arithmetic
//!   - [`core::traits`] - `Custody` and `Clock` collaborator traits
//!   - [`core::r#async`] - Actor front-end for concurrent callers
//! - [`io`] - CSV script reading and statement output
//! - [`strategy`] - Sync and async replay pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Accounting rules
//!
//! - Interest is simple and whole-year: `floor(principal * rate / 100)` per
//!   full year elapsed since the account's accrual anchor.
//! - Withdrawals realize accrued interest into the balance. Deposits do
//!   not, so interest accrued before a deposit is forfeited. Both reset the
//!   anchor; transfers move principal only.
//! - Loans need collateral of at least 150% of principal and are repaid
//!   with interest at the rate snapshotted when they were issued.
//!
//! # Atomicity
//!
//! An operation either completes every custody transfer and state update
//! or leaves the ledger unchanged and returns a [`LedgerError`].

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    AdminMode, Clock, Custody, DefaultEngine, InMemoryCustody, LedgerActor, LedgerConfig,
    LedgerEngine, LedgerHandle, ManualClock,
};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountStatement, Amount, CustodyError, Identity, LedgerError, Loan, LoanId,
    OperationRecord, OperationType, Outcome, PlatformStats, Timestamp,
};
