//! Single-writer ledger actor
//!
//! This module provides the `LedgerActor`, a tokio task that exclusively owns
//! a `DefaultEngine`, and the cloneable `LedgerHandle` callers use to talk
//! to it.
//!
//! # Design
//!
//! Jobs travel over a bounded `mpsc` channel and are executed one at a time
//! in arrival order. Each job replies over its own `oneshot` channel. Because
//! the engine is only ever touched from the actor task, every operation is
//! applied atomically with respect to every other, and reads observe a
//! consistent state.
//!
//! ```text
//! LedgerHandle ──mpsc──▶ LedgerActor (owns DefaultEngine)
//!      ▲                      │
//!      └──────oneshot─────────┘
//! ```

use crate::core::engine::DefaultEngine;
use crate::core::traits::Clock;
use crate::types::{
    Account, AccountStatement, Amount, Identity, LedgerError, Loan, LoanId, OperationRecord,
    Outcome, PlatformStats, Timestamp,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

type Job = Box<dyn FnOnce(&mut DefaultEngine) + Send>;

/// Consistent copy of the ledger's reporting state
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub statements: Vec<AccountStatement>,
    pub stats: PlatformStats,
    pub now: Timestamp,
}

/// Owner of the engine inside a tokio task
pub struct LedgerActor {
    engine: DefaultEngine,
    receiver: mpsc::Receiver<Job>,
}

impl LedgerActor {
    /// Spawn the actor on the current tokio runtime
    ///
    /// # Arguments
    ///
    /// * `engine` - Engine the actor takes exclusive ownership of
    /// * `capacity` - Number of jobs that may queue before senders wait
    ///
    /// # Returns
    ///
    /// A handle for submitting jobs and the task's join handle. The task ends
    /// once every handle is dropped and yields the engine back.
    pub fn spawn(
        engine: DefaultEngine,
        capacity: usize,
    ) -> (LedgerHandle, JoinHandle<DefaultEngine>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let actor = LedgerActor { engine, receiver };
        let task = tokio::spawn(actor.run());
        (LedgerHandle { sender }, task)
    }

    async fn run(mut self) -> DefaultEngine {
        let mut served: u64 = 0;
        while let Some(job) = self.receiver.recv().await {
            job(&mut self.engine);
            served += 1;
        }
        debug!(served, "ledger actor stopped");
        self.engine
    }
}

/// Cloneable async front-end to a `LedgerActor`
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<Job>,
}

impl LedgerHandle {
    /// Queue `f` to run against the engine and return its reply channel
    ///
    /// Jobs submitted sequentially from one task run in submission order,
    /// so a caller may pipeline several submissions before awaiting replies.
    pub async fn submit<F, T>(&self, f: F) -> Result<oneshot::Receiver<T>, LedgerError>
    where
        F: FnOnce(&mut DefaultEngine) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply, receiver) = oneshot::channel();
        let job: Job = Box::new(move |engine| {
            let _ = reply.send(f(engine));
        });
        self.sender
            .send(job)
            .await
            .map_err(|_| LedgerError::LedgerUnavailable)?;
        Ok(receiver)
    }

    /// Run `f` against the engine and wait for its result
    pub async fn call<F, T>(&self, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut DefaultEngine) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit(f)
            .await?
            .await
            .map_err(|_| LedgerError::LedgerUnavailable)
    }

    /// Apply a script record (see `DefaultEngine::process`)
    pub async fn process(&self, record: OperationRecord) -> Result<Outcome, LedgerError> {
        self.call(move |engine| engine.process(&record)).await?
    }

    pub async fn create_account(
        &self,
        caller: Identity,
        initial_deposit: Amount,
    ) -> Result<(), LedgerError> {
        self.call(move |engine| engine.create_account(&caller, initial_deposit))
            .await?
    }

    pub async fn deposit(&self, caller: Identity, amount: Amount) -> Result<(), LedgerError> {
        self.call(move |engine| engine.deposit(&caller, amount))
            .await?
    }

    pub async fn withdraw(&self, caller: Identity, amount: Amount) -> Result<(), LedgerError> {
        self.call(move |engine| engine.withdraw(&caller, amount))
            .await?
    }

    pub async fn transfer(
        &self,
        caller: Identity,
        recipient: Identity,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.call(move |engine| engine.transfer(&caller, &recipient, amount))
            .await?
    }

    pub async fn request_loan(
        &self,
        caller: Identity,
        loan_amount: Amount,
        collateral_amount: Amount,
    ) -> Result<LoanId, LedgerError> {
        self.call(move |engine| engine.request_loan(&caller, loan_amount, collateral_amount))
            .await?
    }

    pub async fn repay_loan(&self, caller: Identity, loan_id: LoanId) -> Result<Amount, LedgerError> {
        self.call(move |engine| engine.repay_loan(&caller, loan_id))
            .await?
    }

    pub async fn account_balance(&self, owner: Identity) -> Result<Amount, LedgerError> {
        self.call(move |engine| engine.account_balance(&owner))
            .await?
    }

    pub async fn account_details(&self, owner: Identity) -> Result<Account, LedgerError> {
        self.call(move |engine| engine.account_details(&owner).cloned())
            .await?
    }

    pub async fn loan_details(&self, owner: Identity, loan_id: LoanId) -> Result<Loan, LedgerError> {
        self.call(move |engine| engine.loan_details(&owner, loan_id).cloned())
            .await?
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats, LedgerError> {
        self.call(|engine| engine.platform_stats()).await
    }

    pub async fn account_exists(&self, owner: Identity) -> Result<bool, LedgerError> {
        self.call(move |engine| engine.account_exists(&owner)).await
    }

    pub async fn emergency_pause(&self, caller: Identity) -> Result<(), LedgerError> {
        self.call(move |engine| engine.emergency_pause(&caller))
            .await?
    }

    pub async fn resume(&self, caller: Identity) -> Result<(), LedgerError> {
        self.call(move |engine| engine.resume(&caller)).await?
    }

    pub async fn update_interest_rate(
        &self,
        caller: Identity,
        new_rate: u64,
    ) -> Result<u64, LedgerError> {
        self.call(move |engine| engine.update_interest_rate(&caller, new_rate))
            .await?
    }

    /// Move the actor's clock forward
    pub async fn advance_clock(&self, time: Timestamp) -> Result<(), LedgerError> {
        self.call(move |engine| engine.clock_mut().advance_to(time))
            .await?
    }

    /// Credit external funds to `identity` in the actor's custody
    pub async fn fund(&self, identity: Identity, amount: Amount) -> Result<(), LedgerError> {
        self.call(move |engine| {
            let pool = engine.config().pool.clone();
            engine
                .custody_mut()
                .fund(&identity, amount)
                .map_err(|e| LedgerError::transfer_failed(&pool, &identity, amount, e))
        })
        .await?
    }

    /// Statements and stats taken between two jobs
    pub async fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        self.call(|engine| {
            Ok(LedgerSnapshot {
                statements: engine.statements()?,
                stats: engine.platform_stats(),
                now: engine.clock().now(),
            })
        })
        .await?
    }
}
