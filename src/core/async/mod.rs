//! Asynchronous access to the ledger
//!
//! The engine itself is single-threaded. Concurrent callers reach it through
//! an actor task that owns the engine and applies requests one at a time:
//!
//! - **LedgerActor**: tokio task owning a `DefaultEngine`
//! - **LedgerHandle**: cloneable sender used to submit operations and reads
//!
//! Operations on the ledger are therefore linearized in the order the actor
//! receives them, and no operation ever observes another half-applied.

pub mod actor;

pub use actor::{LedgerActor, LedgerHandle, LedgerSnapshot};
