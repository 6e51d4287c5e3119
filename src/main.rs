//! Ledger Engine CLI
//!
//! Replays an operation script against a fresh ledger and prints the final
//! account statements.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --pool-funds 100000000 script.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --worker-threads 8 script.csv > accounts.csv
//! RUST_LOG=debug cargo run -- --enforce-admin script.csv > accounts.csv
//! ```
//!
//! Statements go to stdout, logs to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Fatal error (input not readable, output not writable, runtime failure)

use ledger_engine::cli;
use ledger_engine::logging;
use ledger_engine::strategy;
use std::process;

fn main() {
    logging::init();

    let args = cli::parse_args();

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(
            args.strategy.clone(),
            args.to_ledger_config(),
            args.pool_funds,
            batch,
        )
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
