//! CSV format handling for operation scripts and account statements
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to operation records
//! - Statement output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! Conversion only checks syntax: the operation type and the numeric
//! fields. Whether an operation has every field it needs is decided when
//! the record is applied, which reports `MissingField`.

use crate::types::{
    AccountStatement, Amount, Identity, LedgerError, OperationRecord, OperationType, Timestamp,
};
use serde::Deserialize;
use std::io::Write;

/// Column order of a script file
pub const SCRIPT_HEADER: [&str; 7] = [
    "type",
    "caller",
    "time",
    "amount",
    "collateral",
    "recipient",
    "loan",
];

/// Column order of the statement output
pub const STATEMENT_HEADER: [&str; 6] = [
    "owner",
    "balance",
    "accrued_balance",
    "deposit_timestamp",
    "active",
    "loans",
];

/// CSV record structure for deserialization
///
/// Matches the script format with columns:
/// type, caller, time, amount, collateral, recipient, loan.
/// Trailing columns an operation doesn't use may be empty or omitted.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub op_type: String,
    pub caller: Identity,
    pub time: Timestamp,
    pub amount: Option<String>,
    pub collateral: Option<String>,
    pub recipient: Option<String>,
    pub loan: Option<String>,
}

fn parse_type(raw: &str) -> Option<OperationType> {
    let op_type = match raw.to_lowercase().as_str() {
        "fund" => OperationType::Fund,
        "create" => OperationType::Create,
        "deposit" => OperationType::Deposit,
        "withdraw" => OperationType::Withdraw,
        "transfer" => OperationType::Transfer,
        "loan" => OperationType::Loan,
        "repay" => OperationType::Repay,
        "pause" => OperationType::Pause,
        "resume" => OperationType::Resume,
        "rate" => OperationType::Rate,
        _ => return None,
    };
    Some(op_type)
}

/// Blank fields count as absent
fn present(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_number(
    field: Option<String>,
    name: &str,
    caller: &Identity,
) -> Result<Option<Amount>, String> {
    match present(field) {
        Some(raw) => raw
            .parse::<Amount>()
            .map(Some)
            .map_err(|_| format!("Invalid {} '{}' for caller {}", name, raw, caller)),
        None => Ok(None),
    }
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation type string (case-insensitive)
/// - Parses amount, collateral and loan id as unsigned integers (if present)
/// - Treats empty or whitespace-only fields as absent
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    let op_type = parse_type(csv_record.op_type.trim()).ok_or_else(|| {
        format!(
            "Invalid operation type: '{}' for caller {}",
            csv_record.op_type, csv_record.caller
        )
    })?;

    let caller = csv_record.caller;
    let amount = parse_number(csv_record.amount, "amount", &caller)?;
    let collateral = parse_number(csv_record.collateral, "collateral", &caller)?;
    let loan = parse_number(csv_record.loan, "loan id", &caller)?;
    let recipient = present(csv_record.recipient).map(Identity::from);

    Ok(OperationRecord {
        op_type,
        caller,
        time: csv_record.time,
        amount,
        collateral,
        recipient,
        loan,
    })
}

/// Write account statements to CSV format
///
/// Writes statements with columns:
/// owner, balance, accrued_balance, deposit_timestamp, active, loans.
/// Rows are sorted by owner for deterministic output.
///
/// # Errors
///
/// Returns `IoError` if writing or flushing fails.
pub fn write_accounts_csv(
    statements: &[AccountStatement],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let io_error = |e: csv::Error| LedgerError::IoError {
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(STATEMENT_HEADER).map_err(io_error)?;

    let mut sorted: Vec<&AccountStatement> = statements.iter().collect();
    sorted.sort_by(|a, b| a.owner.cmp(&b.owner));

    for statement in sorted {
        writer
            .write_record(&[
                statement.owner.to_string(),
                statement.balance.to_string(),
                statement.accrued_balance.to_string(),
                statement.deposit_timestamp.to_string(),
                statement.is_active.to_string(),
                statement.loan_count.to_string(),
            ])
            .map_err(io_error)?;
    }

    writer.flush()?;
    Ok(())
}
