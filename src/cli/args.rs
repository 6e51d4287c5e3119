use crate::core::config::{AdminMode, LedgerConfig};
use crate::strategy::BatchConfig;
use crate::types::Amount;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a ledger operation script and print the final account statements
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(
    about = "Replay deposits, transfers and collateralized loans against an in-memory ledger",
    long_about = None
)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV script")]
    pub input_file: PathBuf,

    /// Processing strategy to use for the replay
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for single-threaded or 'async' for the actor pipeline"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of tokio worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Identity allowed to run administrative operations
    #[arg(long = "admin", value_name = "IDENTITY", default_value = "admin")]
    pub admin: String,

    /// Identity of the custody pool holding deposited funds
    #[arg(long = "pool", value_name = "IDENTITY", default_value = "custody-pool")]
    pub pool: String,

    /// External funds credited to the custody pool before replay
    #[arg(long = "pool-funds", value_name = "AMOUNT", default_value_t = 0)]
    pub pool_funds: Amount,

    /// Make pause/resume and rate updates take effect
    #[arg(long = "enforce-admin")]
    pub enforce_admin: bool,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Build the ledger configuration from the identity and admin flags
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let admin_mode = if self.enforce_admin {
            AdminMode::Enforced
        } else {
            AdminMode::Inert
        };

        LedgerConfig::new(self.admin.as_str(), self.pool.as_str())
            .with_admin_mode(admin_mode)
    }

    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to defaults; zero values are replaced by
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_none() && self.worker_threads.is_none() {
            return BatchConfig::default();
        }

        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.worker_threads.unwrap_or(default.worker_threads),
        )
    }
}
