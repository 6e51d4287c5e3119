//! Account-related types for the ledger engine
//!
//! This module defines the Account record and the statement row produced
//! for reporting.

use super::operation::{Amount, Identity, Timestamp};

/// Deposit account state
///
/// Represents the principal an owner has on deposit together with the
/// anchor used for interest accrual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The owning identity
    pub owner: Identity,

    /// Principal currently on deposit
    ///
    /// Accrued-but-unrealized interest is not included. Interest is only
    /// folded into the balance when the owner withdraws.
    pub balance: Amount,

    /// Accrual anchor
    ///
    /// Last time the balance was set or reset by a deposit or withdrawal.
    /// Transfers leave it untouched.
    pub deposit_timestamp: Timestamp,

    /// Whether the account may be operated on
    ///
    /// Accounts are created active. No operation currently clears the flag.
    pub is_active: bool,
}

impl Account {
    /// Create a new active account
    ///
    /// # Arguments
    ///
    /// * `owner` - The identity owning the account
    /// * `balance` - Initial principal
    /// * `now` - Creation time, used as the first accrual anchor
    pub fn new(owner: Identity, balance: Amount, now: Timestamp) -> Self {
        Account {
            owner,
            balance,
            deposit_timestamp: now,
            is_active: true,
        }
    }
}

/// Reporting row for a single account
///
/// Produced by the engine at a given clock value and written out by the
/// CSV output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatement {
    pub owner: Identity,

    /// Stored principal
    pub balance: Amount,

    /// Principal plus interest accrued up to the statement time
    pub accrued_balance: Amount,

    pub deposit_timestamp: Timestamp,
    pub is_active: bool,

    /// Number of loans ever issued to the owner
    pub loan_count: u64,
}
