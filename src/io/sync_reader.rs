//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a script file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<OperationRecord, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use ledger_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Replaying: {:?}", record),
//!         Err(e) => eprintln!("Skipped: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Opening the file fails with `IoError`
//! - Individual rows that cannot be parsed are yielded as `ParseError`
//!   carrying the 1-based file line (the header is line 1)

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, OperationRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader {
    /// Open a script file for streaming iteration
    ///
    /// The CSV reader trims whitespace from all fields and accepts rows
    /// with fewer columns than the header, so trailing unused fields may
    /// be omitted.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }

    /// Deserialize the current row, tagging errors with its starting line
    fn decode_current(&self) -> Result<OperationRecord, LedgerError> {
        let line = self.record.position().map(|pos| pos.line());

        let csv_record: CsvRecord = self
            .record
            .deserialize(Some(&self.headers))
            .map_err(|e| LedgerError::ParseError {
                line,
                message: e.to_string(),
            })?;
        convert_csv_record(csv_record).map_err(|message| LedgerError::ParseError { line, message })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(self.decode_current()),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}
