//! Failure taxonomy and error types for the batch engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ─── FailureKind ──────────────────────────────────────────────────────────────

/// Closed taxonomy of batch execution failures.
///
/// The retry/abort contract hangs off this enum: [`is_retryable`] and
/// [`is_fatal`] are consumed by the executor and runner respectively, so
/// every call site shares one propagation policy instead of re-matching
/// error strings locally.
///
/// [`is_retryable`]: FailureKind::is_retryable
/// [`is_fatal`]: FailureKind::is_fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The user declined or dismissed the wallet's signing prompt.
    UserRejected,
    /// The wallet lacks native currency to cover gas.
    InsufficientFunds,
    /// RPC/node unreachable, timeout, or malformed response. Safe to retry.
    NetworkTransient,
    /// The chain executed the call and it reverted (business-rule failure).
    ContractRejected,
    /// Execution exhausted the supplied gas limit. The caller must re-plan
    /// with a higher ceiling or smaller batch; retrying as-is cannot help.
    OutOfGas,
    /// No known pattern matched. Treated conservatively as non-retryable.
    Unknown,
}

impl FailureKind {
    /// Returns `true` if the same submission may be retried unchanged.
    /// Only transient infrastructure failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkTransient)
    }

    /// Returns `true` if this failure invalidates the whole run: the user
    /// cannot continue, so no further batches may be submitted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UserRejected | Self::InsufficientFunds)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserRejected => write!(f, "user rejected"),
            Self::InsufficientFunds => write!(f, "insufficient funds"),
            Self::NetworkTransient => write!(f, "network transient"),
            Self::ContractRejected => write!(f, "contract rejected"),
            Self::OutOfGas => write!(f, "out of gas"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ─── ProviderError ────────────────────────────────────────────────────────────

/// Raw failure surfaced by a signer or chain reader, before classification.
///
/// Wallet connectors and RPC nodes report failures as loosely-structured
/// messages; [`classify_provider_error`](crate::classify::classify_provider_error)
/// maps these into [`FailureKind`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The signer failed to produce a transaction (rejection, funds, …).
    #[error("signer error: {0}")]
    Signer(String),

    /// The read layer failed (node unreachable, malformed response, …).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Confirmation did not arrive within the configured ceiling. The
    /// transaction may still land, so this is treated as transient.
    #[error("confirmation timed out after {ms}ms")]
    Timeout { ms: u64 },
}

// ─── PlanError ────────────────────────────────────────────────────────────────

/// Errors produced while turning a work-item list into a batch plan.
///
/// Planning is pure and runs before any transaction is submitted, so these
/// never describe on-chain state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The caller passed no items. Callers should short-circuit before
    /// invoking the engine.
    #[error("no work items to plan")]
    EmptyInput,

    /// `max_batch_size` (or an estimate's batch size) was zero.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    /// A chunk's gas requirement exceeds the ceiling. The plan is rejected
    /// outright rather than silently shrunk; reduce `max_batch_size`.
    #[error("batch {batch_index} requires {required} gas, exceeding the {ceiling} ceiling")]
    GasCeilingExceeded {
        batch_index: usize,
        required: u64,
        ceiling: u64,
    },

    /// The linear gas model overflowed u64 for the given inputs.
    #[error("gas computation overflowed for batch size {batch_size}")]
    GasOverflow { batch_size: usize },
}

// ─── Tests ────────────────────────────────────────────────────────────────────
