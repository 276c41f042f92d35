//! Shared value types for the batch execution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FailureKind;

// ─── WorkItem ─────────────────────────────────────────────────────────────────

/// One logical unit of a batched operation (e.g. one machine to claim).
///
/// Items are opaque to the engine: only the id is handed to the signer.
/// Immutable once a plan has been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Caller-assigned identifier (token id, machine id, …).
    pub id: u64,
    /// Optional per-item marginal gas override. Items without an override
    /// are costed at the plan's `per_item_gas`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_weight: Option<u64>,
}

impl WorkItem {
    pub fn new(id: u64) -> Self {
        Self { id, gas_weight: None }
    }

    /// An item with a custom marginal gas cost (e.g. a machine whose claim
    /// also triggers destruction).
    pub fn with_gas_weight(id: u64, gas_weight: u64) -> Self {
        Self { id, gas_weight: Some(gas_weight) }
    }
}

// ─── Batch ────────────────────────────────────────────────────────────────────

/// A bounded group of work items submitted as one on-chain transaction.
///
/// Invariants (enforced by the planner): `1 ≤ items.len() ≤ max_batch_size`
/// and `gas_limit ≤ max_gas_ceiling`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// 0-based position of this batch in the overall plan.
    pub index: usize,
    /// Total number of batches in the plan.
    pub total: usize,
    /// The items carried by this batch, in original caller order.
    pub items: Vec<WorkItem>,
    /// Gas limit to submit this batch's transaction with.
    pub gas_limit: u64,
}

impl Batch {
    /// Number of items in the batch (always ≥ 1 for a planned batch).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item ids, in submission order.
    pub fn item_ids(&self) -> Vec<u64> {
        self.items.iter().map(|i| i.id).collect()
    }
}

// ─── Transaction wire types ───────────────────────────────────────────────────

/// Opaque handle to a submitted transaction, as returned by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    /// Transaction hash (`0x…`).
    pub hash: String,
}

impl TransactionHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Execution status carried by a confirmation receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    /// The transaction executed successfully.
    Success,
    /// The transaction was mined but execution reverted.
    Reverted,
}

/// The chain's confirmation record for a submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub status: ReceiptStatus,
    /// Hash of the confirmed transaction.
    pub tx_hash: String,
    /// Block the transaction was included in, if the reader reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Gas actually consumed, if the reader reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

// ─── ExecutionAttempt ─────────────────────────────────────────────────────────

/// Lifecycle status of a single submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    /// Created, not yet handed to the signer.
    Pending,
    /// Accepted by the signer, awaiting confirmation.
    Submitted,
    /// Confirmed on-chain with a success receipt.
    Confirmed,
    /// Terminated with a classified failure.
    Failed,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Submitted => write!(f, "submitted"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One submission try for a batch, recorded for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionAttempt {
    /// 1-based attempt counter within the batch.
    pub attempt_number: u32,
    /// Unix timestamp (seconds) of when the attempt started.
    pub started_at: i64,
    pub status: AttemptStatus,
    /// Transaction hash, once the signer accepted the submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Classified failure, if the attempt failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
}

impl ExecutionAttempt {
    /// Start a new attempt, stamped with the current time.
    pub fn begin(attempt_number: u32) -> Self {
        Self {
            attempt_number,
            started_at: chrono::Utc::now().timestamp(),
            status: AttemptStatus::Pending,
            tx_hash: None,
            error_kind: None,
        }
    }
}

// ─── BatchOutcome ─────────────────────────────────────────────────────────────

/// Terminal result for one batch, including every attempt made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Index of the batch this outcome belongs to.
    pub batch_index: usize,
    pub succeeded: bool,
    /// All attempts, oldest first. Never empty.
    pub attempts: Vec<ExecutionAttempt>,
    /// Classified failure of the final attempt, if the batch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    /// Raw message of the final failure, for display and debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(batch_index: usize, attempts: Vec<ExecutionAttempt>) -> Self {
        Self {
            batch_index,
            succeeded: true,
            attempts,
            error_kind: None,
            error_message: None,
        }
    }

    pub fn failed(
        batch_index: usize,
        attempts: Vec<ExecutionAttempt>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            batch_index,
            succeeded: false,
            attempts,
            error_kind: Some(kind),
            error_message: Some(message.into()),
        }
    }

    /// Number of attempts made for this batch.
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}

// ─── AggregateResult ──────────────────────────────────────────────────────────

/// Final result of a batched run, returned to the caller and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Number of batches confirmed on-chain.
    pub succeeded_batches: usize,
    /// Number of batches the plan contained.
    pub total_batches: usize,
    /// Outcomes of every batch that reached a failed terminal state.
    pub failed_batches: Vec<BatchOutcome>,
    /// `true` iff the run completed and every batch succeeded.
    pub all_items_processed: bool,
    /// Set only when the run was aborted rather than completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<FailureKind>,
}

impl AggregateResult {
    /// Collapse the result into the three mutually-exclusive user-visible
    /// outcomes. Every caller renders the same classification.
    pub fn summary(&self) -> RunSummary {
        if let Some(kind) = self.fatal_error {
            RunSummary::Aborted(kind)
        } else if self.failed_batches.is_empty() {
            RunSummary::FullySucceeded
        } else {
            RunSummary::PartiallySucceeded {
                succeeded: self.succeeded_batches,
                total: self.total_batches,
            }
        }
    }
}

/// User-visible classification of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunSummary {
    /// Every batch confirmed.
    FullySucceeded,
    /// The run completed, but some batches failed.
    PartiallySucceeded { succeeded: usize, total: usize },
    /// The run stopped early on a fatal failure.
    Aborted(FailureKind),
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullySucceeded => write!(f, "fully succeeded"),
            Self::PartiallySucceeded { succeeded, total } => {
                write!(f, "partially succeeded ({succeeded}/{total} batches)")
            }
            Self::Aborted(kind) => write!(f, "aborted: {kind}"),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
