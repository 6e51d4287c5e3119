//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Collaborator abstractions (custody of funds, time source)
//! - `engine` - Ledger operations and their atomic commit
//! - `dispatcher` - Routing of operation records to engine operations
//! - `account_manager` - Deposit account state
//! - `loan_book` - Loan records and identifiers
//! - `interest` - Interest and collateral arithmetic
//! - `config` - Ledger parameters
//! - `custody` / `clock` - In-memory collaborators
//! - `async` - Actor front-end for concurrent callers

pub mod account_manager;
pub mod r#async;
pub mod clock;
pub mod config;
pub mod custody;
pub mod dispatcher;
pub mod engine;
pub mod interest;
pub mod loan_book;
pub mod traits;

pub use account_manager::AccountManager;
pub use clock::ManualClock;
pub use config::{AdminMode, LedgerConfig};
pub use custody::InMemoryCustody;
pub use engine::{DefaultEngine, LedgerEngine};
pub use loan_book::LoanBook;
pub use r#async::{LedgerActor, LedgerHandle, LedgerSnapshot};
pub use traits::{Clock, Custody};
