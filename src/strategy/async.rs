//! Asynchronous batch processing strategy
//!
//! Replays a script on a multi-threaded tokio runtime. Records are read in
//! batches with `AsyncReader` and pipelined to a `LedgerActor`, which owns
//! the engine and applies them one at a time in file order.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── AsyncReader (batch CSV reading)
//!     └── LedgerHandle ──▶ LedgerActor (owns DefaultEngine)
//! ```
//!
//! Every record of a batch is submitted before any reply is awaited, so
//! reading the next batch overlaps with nothing but the actor draining its
//! queue. Ordering across batches holds because a batch's replies are all
//! collected before the next batch is submitted.

use crate::core::r#async::{LedgerActor, LedgerHandle};
use crate::core::LedgerConfig;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::{seeded_engine, ProcessingStrategy, ReplayTally};
use crate::types::{Amount, LedgerError, OperationRecord};
use futures::future::join_all;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records read and submitted per batch
    pub batch_size: usize,
    /// Worker threads of the tokio runtime
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker thread count, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    ledger: LedgerConfig,
    pool_funds: Amount,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(ledger: LedgerConfig, pool_funds: Amount, config: BatchConfig) -> Self {
        Self {
            ledger,
            pool_funds,
            config,
        }
    }

    /// Submit one batch and wait for all of its replies
    async fn replay_batch(
        handle: &LedgerHandle,
        batch: Vec<OperationRecord>,
        tally: &mut ReplayTally,
    ) -> Result<(), LedgerError> {
        let mut pending = Vec::with_capacity(batch.len());
        for record in batch {
            let reply = handle
                .submit(move |engine| {
                    let outcome = engine.process(&record);
                    (record, outcome)
                })
                .await?;
            pending.push(reply);
        }

        for reply in join_all(pending).await {
            let (record, outcome) = reply.map_err(|_| LedgerError::LedgerUnavailable)?;
            tally.record(&record, outcome);
        }
        Ok(())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| LedgerError::IoError {
                    message: format!("Failed to open file '{}': {}", input_path.display(), e),
                })?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let engine = seeded_engine(&self.ledger, self.pool_funds)?;
            let (handle, task) = LedgerActor::spawn(engine, self.config.batch_size);
            let mut tally = ReplayTally::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                debug!(records = batch.len(), "replaying batch");
                Self::replay_batch(&handle, batch, &mut tally).await?;
            }
            tally.skipped = reader.skipped();

            let snapshot = handle.snapshot().await?;
            drop(handle);
            task.await.map_err(|_| LedgerError::LedgerUnavailable)?;

            tally.finish(&snapshot.stats);
            write_accounts_csv(&snapshot.statements, output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    const HEADER: &str = "type,caller,time,amount,collateral,recipient,loan\n";

    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(format!("{HEADER}{rows}").as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(config: BatchConfig, rows: &str) -> String {
        let file = create_temp_csv(rows);
        let strategy = AsyncProcessingStrategy::new(LedgerConfig::default(), 10_000_000, config);
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[rstest]
    #[case::zero_batch_size(0, 2, 1000, 2)]
    #[case::zero_worker_threads(10, 0, 10, num_cpus::get())]
    #[case::custom(10, 2, 10, 2)]
    fn test_batch_config_new(
        #[case] batch_size: usize,
        #[case] worker_threads: usize,
        #[case] expected_batch_size: usize,
        #[case] expected_worker_threads: usize,
    ) {
        let config = BatchConfig::new(batch_size, worker_threads);
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.worker_threads, expected_worker_threads);
    }

    #[test]
    fn test_async_strategy_writes_statements() {
        let output = run(
            BatchConfig::default(),
            "fund,alice,0,5000000\n\
             fund,bob,0,1000000\n\
             create,alice,0,2000000\n\
             create,bob,1,1000000\n",
        );

        assert_eq!(
            output,
            "owner,balance,accrued_balance,deposit_timestamp,active,loans\n\
             alice,2000000,2000000,0,true,0\n\
             bob,1000000,1000000,1,true,0\n"
        );
    }

    #[test]
    fn test_async_strategy_keeps_order_across_batches() {
        // Each operation depends on the previous one; a batch size of 2
        // splits the chain across three batches.
        let output = run(
            BatchConfig::new(2, 2),
            "fund,alice,0,5000000\n\
             create,alice,1,1000000\n\
             loan,alice,2,1000000,1500000\n\
             repay,alice,3,,,,1\n\
             deposit,alice,4,1000000\n",
        );

        assert!(output.contains("alice,2000000,2000000,4,true,1"));
    }

    #[test]
    fn test_async_strategy_skips_malformed_rows() {
        let output = run(
            BatchConfig::new(1, 1),
            "fund,alice,0,5000000\n\
             create,alice,zero,1000000\n\
             create,alice,1,1000000\n",
        );

        assert!(output.contains("alice,1000000,1000000,1,true,0"));
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy =
            AsyncProcessingStrategy::new(LedgerConfig::default(), 0, BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        match result.unwrap_err() {
            LedgerError::IoError { message } => assert!(message.contains("Failed to open file")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
