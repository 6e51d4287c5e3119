//! Processing strategy module for operation scripts
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering CSV parsing, ledger processing and statement output. Different
//! implementations (synchronous, actor-backed async) are selected at runtime.

use crate::cli::StrategyType;
use crate::core::{DefaultEngine, InMemoryCustody, LedgerConfig, ManualClock};
use crate::types::{Amount, LedgerError, OperationRecord, Outcome, PlatformStats};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
///
/// Each strategy reads operation records from a script file, applies them
/// to a fresh ledger and writes the final account statements to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the script at `input_path` and write statements to `output`
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal problems: the input cannot be opened,
    /// the runtime cannot start, or output cannot be written. Malformed rows
    /// and rejected operations are logged and skipped.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `ledger` - Parameters of the ledger each replay starts from
/// * `pool_funds` - External funds credited to the custody pool before replay
/// * `config` - Optional batch configuration (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    ledger: LedgerConfig,
    pool_funds: Amount,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger, pool_funds)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            ledger,
            pool_funds,
            config.unwrap_or_default(),
        )),
    }
}

/// Build the engine a replay starts from
///
/// The clock starts at 0 and the custody pool holds `pool_funds`.
pub(crate) fn seeded_engine(
    ledger: &LedgerConfig,
    pool_funds: Amount,
) -> Result<DefaultEngine, LedgerError> {
    let mut custody = InMemoryCustody::new();
    custody.fund(&ledger.pool, pool_funds).map_err(|e| {
        LedgerError::transfer_failed(&ledger.pool, &ledger.pool, pool_funds, e)
    })?;

    Ok(DefaultEngine::new(
        ledger.clone(),
        custody,
        ManualClock::new(0),
    ))
}

/// Running count of what happened to each script row
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReplayTally {
    pub applied: u64,
    pub rejected: u64,
    pub skipped: u64,
}

impl ReplayTally {
    /// Record the result of applying `record`
    pub fn record(&mut self, record: &OperationRecord, result: Result<Outcome, LedgerError>) {
        match result {
            Ok(outcome) => {
                self.applied += 1;
                debug!(
                    op = %record.op_type,
                    caller = %record.caller,
                    time = record.time,
                    ?outcome,
                    "operation applied"
                );
            }
            Err(e) => {
                self.rejected += 1;
                warn!(
                    op = %record.op_type,
                    caller = %record.caller,
                    time = record.time,
                    kind = e.kind(),
                    "operation rejected: {}",
                    e
                );
            }
        }
    }

    /// Record a row that never became an operation
    pub fn skip(&mut self, error: &LedgerError) {
        self.skipped += 1;
        warn!(kind = error.kind(), "skipping record: {}", error);
    }

    pub fn finish(&self, stats: &PlatformStats) {
        info!(
            applied = self.applied,
            rejected = self.rejected,
            skipped = self.skipped,
            total_deposits = stats.total_deposits,
            total_loans = stats.total_loans,
            total_loan_count = stats.total_loan_count,
            "replay finished"
        );
    }
}
