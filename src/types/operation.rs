//! Operation-related types for the ledger engine
//!
//! This module defines the identifiers shared across the ledger (identities,
//! amounts, timestamps, loan ids) and the operation records replayed by the
//! script driver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unsigned amount of ledger units
pub type Amount = u64;

/// Monotonic time value supplied by the clock collaborator (seconds)
pub type Timestamp = u64;

/// Global loan identifier
///
/// Drawn from a single process-wide counter shared by all owners.
pub type LoanId = u64;

/// Opaque caller identity
///
/// Identities are compared by value and never interpreted by the engine.
/// The custody pool is also addressed through an `Identity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Identity(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Identity::new(name)
    }
}

impl From<String> for Identity {
    fn from(name: String) -> Self {
        Identity(name)
    }
}

/// Operation types understood by the script driver
///
/// All variants except `Fund` map to a ledger operation. `Fund` credits the
/// caller's external wallet in the custody collaborator and never touches
/// ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Mint external funds for the caller (driver faucet)
    Fund,

    /// Open an account with an initial deposit
    Create,

    /// Add principal to an existing account
    Deposit,

    /// Withdraw principal plus realized interest
    Withdraw,

    /// Move principal between two ledger accounts
    Transfer,

    /// Request a collateralized loan
    Loan,

    /// Repay an outstanding loan and recover its collateral
    Repay,

    /// Administrative emergency pause
    Pause,

    /// Administrative resume after a pause
    Resume,

    /// Administrative interest rate update
    Rate,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Fund => "fund",
            OperationType::Create => "create",
            OperationType::Deposit => "deposit",
            OperationType::Withdraw => "withdraw",
            OperationType::Transfer => "transfer",
            OperationType::Loan => "loan",
            OperationType::Repay => "repay",
            OperationType::Pause => "pause",
            OperationType::Resume => "resume",
            OperationType::Rate => "rate",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single operation as read from a script
///
/// Optional fields are only meaningful for the operation types that use
/// them: `amount` for fund/create/deposit/withdraw/transfer/loan/rate,
/// `collateral` for loan, `recipient` for transfer and `loan` for repay.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    pub op_type: OperationType,

    /// Identity the operation is executed on behalf of
    pub caller: Identity,

    /// Clock value the operation is executed at
    pub time: Timestamp,

    pub amount: Option<Amount>,
    pub collateral: Option<Amount>,
    pub recipient: Option<Identity>,
    pub loan: Option<LoanId>,
}

impl OperationRecord {
    /// Create a record with no optional fields set
    pub fn new(op_type: OperationType, caller: impl Into<Identity>, time: Timestamp) -> Self {
        OperationRecord {
            op_type,
            caller: caller.into(),
            time,
            amount: None,
            collateral: None,
            recipient: None,
            loan: None,
        }
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_collateral(mut self, collateral: Amount) -> Self {
        self.collateral = Some(collateral);
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<Identity>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_loan(mut self, loan: LoanId) -> Self {
        self.loan = Some(loan);
        self
    }
}

/// Result of a successfully applied operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation succeeded and has nothing to report
    Completed,

    /// A loan was issued under the given id
    LoanIssued(LoanId),

    /// A loan was repaid; carries the total repayment pulled from the caller
    LoanRepaid(Amount),

    /// The interest rate update was accepted; carries the echoed rate
    RateUpdated(u64),
}
