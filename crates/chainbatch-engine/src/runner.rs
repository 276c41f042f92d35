//! The sequential runner — orchestrates all batches of a plan in order.
//!
//! State machine:
//! `Idle → Planning → Executing(i) → … → Completed | Aborted`
//!
//! Batch `i + 1` is never submitted before batch `i` reaches a terminal
//! outcome: the signer's transactions must stay nonce-ordered and a wallet
//! can only present one signing prompt at a time. A non-fatal batch failure
//! is recorded and the run continues; a fatal one (user rejection, empty
//! wallet) aborts the run with prior on-chain confirmations left final.

use std::fmt;
use std::sync::Arc;

use chainbatch_core::error::PlanError;
use chainbatch_core::planner::plan;
use chainbatch_core::progress::{ProgressReporter, ProgressState};
use chainbatch_core::provider::{ChainReader, WalletSigner};
use chainbatch_core::types::{AggregateResult, BatchOutcome, WorkItem};

use crate::config::RunConfig;
use crate::executor::BatchExecutor;

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Not yet started.
    Idle,
    /// Producing the batch plan.
    Planning,
    /// Executing the batch at this index.
    Executing(usize),
    /// Stopped early on a planning rejection or fatal failure.
    Aborted,
    /// All batches reached a terminal outcome.
    Completed,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Planning => write!(f, "planning"),
            Self::Executing(i) => write!(f, "executing batch {i}"),
            Self::Aborted => write!(f, "aborted"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Drives a full batched run against one signer/reader pair.
///
/// The signer is exclusively held for the duration of [`run`](Self::run);
/// progress flows out through the reporter under single-writer discipline.
pub struct SequentialRunner {
    config: RunConfig,
    signer: Arc<dyn WalletSigner>,
    reader: Arc<dyn ChainReader>,
    progress: Arc<dyn ProgressReporter>,
    state: RunnerState,
}

impl SequentialRunner {
    pub fn new(
        config: RunConfig,
        signer: Arc<dyn WalletSigner>,
        reader: Arc<dyn ChainReader>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            config,
            signer,
            reader,
            progress,
            state: RunnerState::Idle,
        }
    }

    /// The runner's current state.
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Plan `items` and execute every batch in order.
    ///
    /// Planning failures return `Err` before anything is submitted. Once
    /// submission starts the run always yields an [`AggregateResult`]:
    /// completed (with per-batch failures recorded) or aborted on a fatal
    /// failure with `fatal_error` set.
    pub async fn run(&mut self, items: &[WorkItem]) -> Result<AggregateResult, PlanError> {
        self.state = RunnerState::Planning;
        let batches = match plan(items, &self.config.plan_config()) {
            Ok(batches) => batches,
            Err(e) => {
                self.state = RunnerState::Aborted;
                tracing::error!(error = %e, "planning rejected — nothing submitted");
                return Err(e);
            }
        };

        let total = batches.len();
        tracing::info!(
            items = items.len(),
            batches = total,
            "plan ready — starting sequential run"
        );

        let executor = BatchExecutor::new(
            Arc::clone(&self.signer),
            Arc::clone(&self.reader),
            self.config.retry.clone(),
            self.config.confirmation_timeout,
        );

        let mut succeeded = 0usize;
        let mut failed: Vec<BatchOutcome> = Vec::new();

        for batch in &batches {
            let index = batch.index;
            self.state = RunnerState::Executing(index);
            self.progress.on_update(ProgressState::at(index, total));
            tracing::info!(
                batch = index,
                total,
                size = batch.len(),
                gas_limit = batch.gas_limit,
                "executing batch"
            );

            let outcome = executor.execute(batch).await;

            if outcome.succeeded {
                succeeded += 1;
                tracing::info!(batch = index, attempts = outcome.attempt_count(), "batch confirmed");
            } else {
                match outcome.error_kind {
                    Some(kind) if kind.is_fatal() => {
                        self.state = RunnerState::Aborted;
                        tracing::error!(
                            batch = index,
                            kind = %kind,
                            "fatal failure — aborting run; prior confirmations are final"
                        );
                        failed.push(outcome);
                        return Ok(AggregateResult {
                            succeeded_batches: succeeded,
                            total_batches: total,
                            failed_batches: failed,
                            all_items_processed: false,
                            fatal_error: Some(kind),
                        });
                    }
                    _ => {
                        tracing::warn!(
                            batch = index,
                            kind = ?outcome.error_kind,
                            "batch failed — continuing with remaining batches"
                        );
                        failed.push(outcome);
                    }
                }
            }

            // RPC pacing only; distinct from the retry delay.
            if index + 1 < total {
                tokio::time::sleep(self.config.inter_batch_delay).await;
            }
        }

        self.state = RunnerState::Completed;
        let all_items_processed = failed.is_empty();
        tracing::info!(
            succeeded,
            failed = failed.len(),
            total,
            "run completed"
        );

        Ok(AggregateResult {
            succeeded_batches: succeeded,
            total_batches: total,
            failed_batches: failed,
            all_items_processed,
            fatal_error: None,
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
