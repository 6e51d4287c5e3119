//! Operation record dispatch
//!
//! Routes script records to the matching engine operation. This is the
//! "request dispatcher" that sits in front of the engine: it moves the
//! clock to the record's time, supplies the caller identity, and handles
//! the driver-only `fund` operation against the in-memory custody.

use crate::core::engine::DefaultEngine;
use crate::types::{Amount, Identity, LedgerError, OperationRecord, OperationType, Outcome};

impl DefaultEngine {
    /// Apply a single operation record
    ///
    /// # Errors
    ///
    /// - `ClockRegression` if the record's time is earlier than the clock
    /// - `MissingField` if a field the operation needs is absent
    /// - any error of the underlying ledger operation
    pub fn process(&mut self, record: &OperationRecord) -> Result<Outcome, LedgerError> {
        self.clock_mut().advance_to(record.time)?;

        let caller = &record.caller;
        match record.op_type {
            OperationType::Fund => {
                let amount = required_amount(record)?;
                let pool = self.config().pool.clone();
                self.custody_mut().fund(caller, amount).map_err(|e| {
                    LedgerError::transfer_failed(&pool, caller, amount, e)
                })?;
                Ok(Outcome::Completed)
            }
            OperationType::Create => {
                self.create_account(caller, required_amount(record)?)?;
                Ok(Outcome::Completed)
            }
            OperationType::Deposit => {
                self.deposit(caller, required_amount(record)?)?;
                Ok(Outcome::Completed)
            }
            OperationType::Withdraw => {
                self.withdraw(caller, required_amount(record)?)?;
                Ok(Outcome::Completed)
            }
            OperationType::Transfer => {
                let recipient = required_recipient(record)?;
                self.transfer(caller, recipient, required_amount(record)?)?;
                Ok(Outcome::Completed)
            }
            OperationType::Loan => {
                let amount = required_amount(record)?;
                let collateral = record
                    .collateral
                    .ok_or_else(|| missing(record, "collateral"))?;
                self.request_loan(caller, amount, collateral)
                    .map(Outcome::LoanIssued)
            }
            OperationType::Repay => {
                let loan_id = record.loan.ok_or_else(|| missing(record, "loan"))?;
                self.repay_loan(caller, loan_id).map(Outcome::LoanRepaid)
            }
            OperationType::Pause => {
                self.emergency_pause(caller)?;
                Ok(Outcome::Completed)
            }
            OperationType::Resume => {
                self.resume(caller)?;
                Ok(Outcome::Completed)
            }
            OperationType::Rate => self
                .update_interest_rate(caller, required_amount(record)?)
                .map(Outcome::RateUpdated),
        }
    }
}

fn missing(record: &OperationRecord, field: &str) -> LedgerError {
    LedgerError::missing_field(record.op_type.as_str(), &record.caller, field)
}

fn required_amount(record: &OperationRecord) -> Result<Amount, LedgerError> {
    record.amount.ok_or_else(|| missing(record, "amount"))
}

fn required_recipient(record: &OperationRecord) -> Result<&Identity, LedgerError> {
    record
        .recipient
        .as_ref()
        .ok_or_else(|| missing(record, "recipient"))
}
