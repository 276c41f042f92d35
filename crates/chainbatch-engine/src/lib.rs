//! chainbatch-engine — the executing half of ChainBatch.
//!
//! # Overview
//!
//! Builds on `chainbatch-core` to turn a work-item list into a finished run:
//!
//! - [`RunConfig`] — gas model, timeouts, pacing and retry knobs
//! - [`BatchExecutor`] — submit/confirm/classify/retry for one batch
//! - [`SequentialRunner`] — the strictly-ordered run state machine
//! - [`run_batched`] — the single entry point callers use
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainbatch_core::{NullReporter, WorkItem};
//! use chainbatch_engine::{run_batched, RunConfig};
//! # async fn demo(
//! #     signer: Arc<dyn chainbatch_core::WalletSigner>,
//! #     reader: Arc<dyn chainbatch_core::ChainReader>,
//! # ) -> Result<(), chainbatch_core::PlanError> {
//! let items: Vec<WorkItem> = (0..130).map(WorkItem::new).collect();
//! let result = run_batched(
//!     &items,
//!     RunConfig::default(),
//!     signer,
//!     reader,
//!     Arc::new(NullReporter),
//! )
//! .await?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod executor;
pub mod runner;

pub use config::RunConfig;
pub use executor::BatchExecutor;
pub use runner::{RunnerState, SequentialRunner};

use std::sync::Arc;

use chainbatch_core::error::PlanError;
use chainbatch_core::progress::ProgressReporter;
use chainbatch_core::provider::{ChainReader, WalletSigner};
use chainbatch_core::types::{AggregateResult, WorkItem};

/// Plan and execute `items` as a sequence of gas-bounded batch transactions.
///
/// Convenience wrapper that constructs a [`SequentialRunner`] for one run.
pub async fn run_batched(
    items: &[WorkItem],
    config: RunConfig,
    signer: Arc<dyn WalletSigner>,
    reader: Arc<dyn ChainReader>,
    progress: Arc<dyn ProgressReporter>,
) -> Result<AggregateResult, PlanError> {
    SequentialRunner::new(config, signer, reader, progress)
        .run(items)
        .await
}
