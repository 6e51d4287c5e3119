//! Synchronous processing strategy
//!
//! Single-threaded replay: `SyncReader` streams records one at a time, each
//! is applied to an engine owned by the calling thread, and the final
//! statements go to `csv_format::write_accounts_csv`.
//!
//! Memory use is O(accounts + loans), not O(script length).

use crate::core::LedgerConfig;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{seeded_engine, ProcessingStrategy, ReplayTally};
use crate::types::{Amount, LedgerError};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_engine::core::LedgerConfig;
/// use ledger_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default(), 100_000_000);
/// strategy
///     .process(Path::new("script.csv"), &mut std::io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    ledger: LedgerConfig,
    pool_funds: Amount,
}

impl SyncProcessingStrategy {
    pub fn new(ledger: LedgerConfig, pool_funds: Amount) -> Self {
        Self { ledger, pool_funds }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let mut engine = seeded_engine(&self.ledger, self.pool_funds)?;
        let reader = SyncReader::new(input_path)?;
        let mut tally = ReplayTally::default();

        for result in reader {
            match result {
                Ok(record) => {
                    let outcome = engine.process(&record);
                    tally.record(&record, outcome);
                }
                Err(e) => tally.skip(&e),
            }
        }

        let statements = engine.statements()?;
        tally.finish(&engine.platform_stats());

        write_accounts_csv(&statements, output)
    }
}
