//! ChainBatch CLI — inspect batch plans and simulate runs from the terminal.
//!
//! # Commands
//! ```bash
//! # Show how 130 items would be batched under the default gas model
//! chainbatch plan --items 130
//!
//! # Run the engine against scripted collaborators, everything confirming
//! chainbatch simulate --items 130
//!
//! # Inject a revert into batch 1 and watch the run continue
//! chainbatch simulate --items 130 --fail-batch 1 --failure reverted
//!
//! # Inject a wallet rejection and watch the run abort
//! chainbatch simulate --items 130 --fail-batch 1 --failure rejected
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use chainbatch_core::planner::{plan, PlanConfig};
use chainbatch_core::progress::{ProgressReporter, ProgressState};
use chainbatch_core::retry::RetryPolicy;
use chainbatch_core::types::WorkItem;
use chainbatch_engine::{run_batched, RunConfig};
use chainbatch_testkit::{ReceiptResponse, ScriptedReader, ScriptedSigner, SubmitResponse};

#[derive(Parser)]
#[command(
    name = "chainbatch",
    about = "Gas-bounded batch transaction planning and simulation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the batch plan for a number of work items
    Plan {
        /// Number of work items to plan
        #[arg(long)]
        items: u64,
        /// Upper bound on items per transaction
        #[arg(long, default_value_t = 60)]
        batch_size: usize,
        /// Fixed per-call gas overhead
        #[arg(long, default_value_t = 300_000)]
        base_gas: u64,
        /// Marginal gas cost per item
        #[arg(long, default_value_t = 400_000)]
        per_item_gas: u64,
        /// Maximum gas a single transaction may carry
        #[arg(long, default_value_t = 25_000_000)]
        gas_ceiling: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Execute the engine against scripted collaborators
    Simulate {
        /// Number of work items to run
        #[arg(long)]
        items: u64,
        /// Upper bound on items per transaction
        #[arg(long, default_value_t = 60)]
        batch_size: usize,
        /// Fixed per-call gas overhead
        #[arg(long, default_value_t = 300_000)]
        base_gas: u64,
        /// Marginal gas cost per item
        #[arg(long, default_value_t = 400_000)]
        per_item_gas: u64,
        /// Maximum gas a single transaction may carry
        #[arg(long, default_value_t = 25_000_000)]
        gas_ceiling: u64,
        /// Batch index to inject a failure into
        #[arg(long)]
        fail_batch: Option<usize>,
        /// Kind of failure to inject (requires --fail-batch)
        #[arg(long, value_enum, default_value = "reverted")]
        failure: InjectedFailure,
        /// Pause between batches, in milliseconds
        #[arg(long, default_value_t = 0)]
        pace_ms: u64,
        /// Pause before a retry attempt, in milliseconds
        #[arg(long, default_value_t = 0)]
        retry_delay_ms: u64,
        /// Output the aggregate result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Failure scenarios the simulator can inject.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InjectedFailure {
    /// Transaction mined but reverted (batch fails, run continues)
    Reverted,
    /// Submission fails once with a network error (retry succeeds)
    Transient,
    /// Confirmation times out once (retry succeeds)
    Timeout,
    /// User declines the signing prompt (run aborts)
    Rejected,
    /// Wallet cannot cover gas (run aborts)
    Funds,
    /// Execution runs out of gas (batch fails, run continues)
    OutOfGas,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Plan {
            items,
            batch_size,
            base_gas,
            per_item_gas,
            gas_ceiling,
            json,
        } => cmd_plan(
            items,
            PlanConfig {
                max_batch_size: batch_size,
                max_gas_ceiling: gas_ceiling,
                base_gas,
                per_item_gas,
            },
            json,
        ),
        Commands::Simulate {
            items,
            batch_size,
            base_gas,
            per_item_gas,
            gas_ceiling,
            fail_batch,
            failure,
            pace_ms,
            retry_delay_ms,
            json,
        } => {
            let config = RunConfig {
                max_batch_size: batch_size,
                base_gas,
                per_item_gas,
                max_gas_ceiling: gas_ceiling,
                inter_batch_delay: Duration::from_millis(pace_ms),
                retry: RetryPolicy {
                    max_attempts: 2,
                    retry_delay: Duration::from_millis(retry_delay_ms),
                },
                ..RunConfig::default()
            };
            cmd_simulate(items, config, fail_batch, failure, json).await
        }
    }
}

fn work_items(n: u64) -> Vec<WorkItem> {
    (0..n).map(WorkItem::new).collect()
}

fn cmd_plan(items: u64, config: PlanConfig, json: bool) -> Result<()> {
    let batches = plan(&work_items(items), &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batches)?);
        return Ok(());
    }

    println!("Plan for {items} items (max {} per batch):", config.max_batch_size);
    for batch in &batches {
        println!(
            "  batch {:>3}/{}  items {:>3}  gas limit {:>10}",
            batch.index + 1,
            batch.total,
            batch.len(),
            batch.gas_limit
        );
    }
    let total_gas: u64 = batches.iter().map(|b| b.gas_limit).sum();
    println!("  total gas budget: {total_gas} (ceiling {} per batch)", config.max_gas_ceiling);
    Ok(())
}

async fn cmd_simulate(
    items: u64,
    config: RunConfig,
    fail_batch: Option<usize>,
    failure: InjectedFailure,
    json: bool,
) -> Result<()> {
    // Plan up front to size the scripts and surface planning errors early.
    let batches = plan(&work_items(items), &config.plan_config())?;
    let total = batches.len();

    if let Some(index) = fail_batch {
        if index >= total {
            bail!("--fail-batch {index} is out of range (plan has {total} batches)");
        }
    }

    let (submits, receipts) = build_scripts(total, fail_batch, failure);
    let signer = Arc::new(ScriptedSigner::new(submits));
    let reader = Arc::new(ScriptedReader::new(receipts));

    println!("Simulating {items} items in {total} batches...");
    let result = run_batched(
        &work_items(items),
        config,
        signer.clone(),
        reader,
        Arc::new(PrintlnReporter),
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!("  Outcome:     {}", result.summary());
    println!("  Succeeded:   {}/{} batches", result.succeeded_batches, result.total_batches);
    println!("  Submissions: {}", signer.submission_count());
    for failed in &result.failed_batches {
        println!(
            "  batch {} failed after {} attempt(s): {} ({})",
            failed.batch_index,
            failed.attempt_count(),
            failed.error_message.as_deref().unwrap_or("-"),
            failed
                .error_kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unclassified".into()),
        );
    }
    Ok(())
}

/// Queue up one scripted response per expected call, accounting for the
/// extra submission a retried failure produces.
fn build_scripts(
    total: usize,
    fail_batch: Option<usize>,
    failure: InjectedFailure,
) -> (Vec<SubmitResponse>, Vec<ReceiptResponse>) {
    let mut submits = Vec::new();
    let mut receipts = Vec::new();

    for index in 0..total {
        if fail_batch != Some(index) {
            submits.push(SubmitResponse::Accept);
            receipts.push(ReceiptResponse::Success);
            continue;
        }
        match failure {
            InjectedFailure::Reverted => {
                submits.push(SubmitResponse::Accept);
                receipts.push(ReceiptResponse::Reverted);
            }
            InjectedFailure::Transient => {
                submits.push(SubmitResponse::Fail("connection reset by peer".into()));
                submits.push(SubmitResponse::Accept);
                receipts.push(ReceiptResponse::Success);
            }
            InjectedFailure::Timeout => {
                submits.push(SubmitResponse::Accept);
                receipts.push(ReceiptResponse::Timeout);
                submits.push(SubmitResponse::Accept);
                receipts.push(ReceiptResponse::Success);
            }
            InjectedFailure::Rejected => {
                submits.push(SubmitResponse::Fail(
                    "MetaMask Tx Signature: User denied transaction signature.".into(),
                ));
            }
            InjectedFailure::Funds => {
                submits.push(SubmitResponse::Fail(
                    "insufficient funds for gas * price + value".into(),
                ));
            }
            InjectedFailure::OutOfGas => {
                submits.push(SubmitResponse::Fail("out of gas".into()));
            }
        }
    }

    (submits, receipts)
}

/// Prints each progress update on its own line.
struct PrintlnReporter;

impl ProgressReporter for PrintlnReporter {
    fn on_update(&self, state: ProgressState) {
        println!(
            "  [{:>3}%] batch {}/{}",
            state.percent,
            state.current_batch_index + 1,
            state.total_batches
        );
    }
}
