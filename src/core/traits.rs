//! Collaborator traits
//!
//! The engine owns all accounting state but relies on the surrounding
//! platform for moving external funds and for telling the time. These
//! traits are the seams those collaborators plug into.

use crate::types::{Amount, CustodyError, Identity, Timestamp};

/// External funds-transfer primitive
///
/// Moves raw units between identities outside the ledger. The custody pool
/// identity is one endpoint of every transfer the engine requests.
pub trait Custody {
    /// Move `amount` from `from` to `to`
    ///
    /// Must either apply completely or fail without effect.
    fn transfer(&mut self, amount: Amount, from: &Identity, to: &Identity)
        -> Result<(), CustodyError>;

    /// External funds currently held by `identity`
    fn balance_of(&self, identity: &Identity) -> Amount;
}

/// Monotonic time source
pub trait Clock {
    /// Current time; never decreases between calls
    fn now(&self) -> Timestamp;
}
