//! Benchmark suite for comparing replay strategies
//!
//! Compares the synchronous strategy with the actor-backed async strategy
//! using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Scripts are generated into temp files before timing starts. Each one
//! opens accounts for a fixed set of owners, then cycles through deposits,
//! transfers, withdrawals and loan issue/repay pairs, with the clock moving
//! forward a day per row.

use divan::Bencher;
use ledger_engine::cli::StrategyType;
use ledger_engine::core::LedgerConfig;
use ledger_engine::io::SCRIPT_HEADER;
use ledger_engine::strategy::{create_strategy, BatchConfig};
use tempfile::NamedTempFile;

const OWNERS: usize = 50;
const DAY: u64 = 86_400;

fn main() {
    divan::main();
}

/// Write a script with `operations` rows after the account setup
fn generate_script(operations: usize) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    let mut writer = csv::Writer::from_path(file.path()).expect("Failed to open script");
    writer.write_record(SCRIPT_HEADER).unwrap();

    let owner = |i: usize| format!("owner{:03}", i % OWNERS);
    for i in 0..OWNERS {
        let caller = owner(i);
        writer
            .write_record(["fund", caller.as_str(), "0", "1000000000000", "", "", ""])
            .unwrap();
        writer
            .write_record(["create", caller.as_str(), "0", "10000000", "", "", ""])
            .unwrap();
    }

    let mut loans = 0u64;
    for k in 0..operations {
        let time = ((k as u64 + 1) * DAY).to_string();
        let caller = owner(k);
        let next = owner(k + 1);
        let borrower = owner(k.saturating_sub(1));
        let loan_id;

        let row: [&str; 7] = match k % 5 {
            0 => ["deposit", caller.as_str(), time.as_str(), "1000000", "", "", ""],
            1 => ["transfer", caller.as_str(), time.as_str(), "100000", "", next.as_str(), ""],
            2 => ["withdraw", caller.as_str(), time.as_str(), "500000", "", "", ""],
            3 => {
                loans += 1;
                ["loan", caller.as_str(), time.as_str(), "1000000", "1500000", "", ""]
            }
            _ => {
                loan_id = loans.to_string();
                ["repay", borrower.as_str(), time.as_str(), "", "", "", loan_id.as_str()]
            }
        };
        writer.write_record(row).unwrap();
    }

    writer.flush().unwrap();
    file
}

fn run(bencher: Bencher, strategy_type: StrategyType, operations: usize) {
    let script = generate_script(operations);
    let batch = matches!(strategy_type, StrategyType::Async).then(BatchConfig::default);
    let strategy = create_strategy(strategy_type, LedgerConfig::default(), 0, batch);

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(script.path(), &mut output)
            .expect("Processing failed");
        output
    });
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn sync_strategy(bencher: Bencher, operations: usize) {
    run(bencher, StrategyType::Sync, operations);
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn async_strategy(bencher: Bencher, operations: usize) {
    run(bencher, StrategyType::Async, operations);
}
