//! Run progress — the single value the engine shares with a UI.
//!
//! The runner is the only writer; consumers only read. Reporters must never
//! block the runner, so every shipped implementation is fire-and-forget.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

// ─── ProgressState ────────────────────────────────────────────────────────────

/// Snapshot of how far a run has advanced.
///
/// Across one run the sequence of published states is monotonically
/// non-decreasing in both `current_batch_index` and `percent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// 0-based index of the batch about to execute.
    pub current_batch_index: usize,
    /// Number of batches in the plan.
    pub total_batches: usize,
    /// Rounded completion percentage in 0..=100.
    pub percent: u8,
}

impl ProgressState {
    /// State published just before batch `index` of `total` executes.
    ///
    /// `percent = round(100 * (index + 1) / total)`. `total` must be
    /// non-zero; the planner guarantees a non-empty plan.
    pub fn at(index: usize, total: usize) -> Self {
        let percent = ((100 * (index + 1) + total / 2) / total).min(100) as u8;
        Self {
            current_batch_index: index,
            total_batches: total,
            percent,
        }
    }
}

// ─── ProgressReporter ─────────────────────────────────────────────────────────

/// Passive sink for progress updates, pushed by the runner before each batch.
///
/// `on_update` is called from the runner's task and must return immediately.
pub trait ProgressReporter: Send + Sync {
    fn on_update(&self, state: ProgressState);
}

/// Discards every update. For callers that don't render progress.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn on_update(&self, _state: ProgressState) {}
}

/// Publishes updates over a `tokio::sync::watch` channel.
///
/// `watch` keeps only the latest value, which is exactly the progress-bar
/// contract: a slow consumer observes the newest state, never a backlog.
pub struct WatchReporter {
    tx: watch::Sender<ProgressState>,
}

impl WatchReporter {
    /// Create the reporter and the receiving half for the UI.
    pub fn new() -> (Self, watch::Receiver<ProgressState>) {
        let (tx, rx) = watch::channel(ProgressState::default());
        (Self { tx }, rx)
    }
}

impl ProgressReporter for WatchReporter {
    fn on_update(&self, state: ProgressState) {
        // send_replace never blocks and ignores a dropped receiver.
        self.tx.send_replace(state);
    }
}

/// Logs each update through `tracing`. Useful for headless runs.
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_update(&self, state: ProgressState) {
        tracing::info!(
            batch = state.current_batch_index + 1,
            total = state.total_batches,
            percent = state.percent,
            "run progress"
        );
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
