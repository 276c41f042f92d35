//! chainbatch-testkit — scripted collaborators for exercising the engine
//! without a wallet or a chain.
//!
//! The scripted signer and reader consume a queue of canned responses, one
//! per call, and fall back to accepting once the queue runs dry. Because the
//! runner is strictly sequential, queue order lines up with submission order,
//! which makes ordering and retry assertions straightforward.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use chainbatch_core::error::ProviderError;
use chainbatch_core::progress::{ProgressReporter, ProgressState};
use chainbatch_core::provider::{ChainReader, WalletSigner};
use chainbatch_core::types::{Receipt, ReceiptStatus, TransactionHandle, WorkItem};

// ─── ScriptedSigner ───────────────────────────────────────────────────────────

/// Canned response for one `submit` call.
#[derive(Debug, Clone)]
pub enum SubmitResponse {
    /// Accept the submission and hand back a generated transaction hash.
    Accept,
    /// Fail the submission with the given raw message.
    Fail(String),
}

/// What the signer saw on one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    /// Id of the first item in the submitted batch.
    pub first_item: u64,
    pub item_count: usize,
    pub gas_limit: u64,
}

/// A `WalletSigner` that answers from a scripted response queue.
pub struct ScriptedSigner {
    script: Mutex<Vec<SubmitResponse>>,
    submissions: Mutex<Vec<SubmissionRecord>>,
    next_hash: AtomicU64,
}

impl ScriptedSigner {
    /// Responses are consumed front-to-back, one per `submit` call;
    /// once exhausted, every further call is accepted.
    pub fn new(script: Vec<SubmitResponse>) -> Self {
        Self {
            script: Mutex::new(script),
            submissions: Mutex::new(Vec::new()),
            next_hash: AtomicU64::new(1),
        }
    }

    /// A signer that accepts everything.
    pub fn accepting() -> Self {
        Self::new(Vec::new())
    }

    /// Every submission observed so far, in order.
    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submissions.lock().unwrap().clone()
    }

    /// Number of `submit` calls observed.
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    fn next_response(&self) -> SubmitResponse {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            SubmitResponse::Accept
        } else {
            script.remove(0)
        }
    }
}

#[async_trait]
impl WalletSigner for ScriptedSigner {
    async fn submit(
        &self,
        items: &[WorkItem],
        gas_limit: u64,
    ) -> Result<TransactionHandle, ProviderError> {
        self.submissions.lock().unwrap().push(SubmissionRecord {
            first_item: items.first().map(|i| i.id).unwrap_or(0),
            item_count: items.len(),
            gas_limit,
        });
        match self.next_response() {
            SubmitResponse::Accept => {
                let n = self.next_hash.fetch_add(1, Ordering::Relaxed);
                Ok(TransactionHandle::new(format!("0xtx{n:04x}")))
            }
            SubmitResponse::Fail(message) => Err(ProviderError::Signer(message)),
        }
    }
}

// ─── ScriptedReader ───────────────────────────────────────────────────────────

/// Canned response for one `wait_for_receipt` call.
#[derive(Debug, Clone)]
pub enum ReceiptResponse {
    /// Confirm with a success receipt.
    Success,
    /// Confirm with a reverted receipt.
    Reverted,
    /// Report a confirmation timeout at the caller's ceiling.
    Timeout,
    /// Fail with the given raw RPC message.
    Fail(String),
}

/// A `ChainReader` that answers from a scripted response queue.
///
/// Once the queue is exhausted, every further wait confirms successfully.
pub struct ScriptedReader {
    script: Mutex<Vec<ReceiptResponse>>,
    waits: Mutex<Vec<String>>,
}

impl ScriptedReader {
    pub fn new(script: Vec<ReceiptResponse>) -> Self {
        Self {
            script: Mutex::new(script),
            waits: Mutex::new(Vec::new()),
        }
    }

    /// A reader that confirms everything.
    pub fn confirming() -> Self {
        Self::new(Vec::new())
    }

    /// Transaction hashes waited on so far, in order.
    pub fn waited_hashes(&self) -> Vec<String> {
        self.waits.lock().unwrap().clone()
    }

    fn next_response(&self) -> ReceiptResponse {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            ReceiptResponse::Success
        } else {
            script.remove(0)
        }
    }
}

#[async_trait]
impl ChainReader for ScriptedReader {
    async fn wait_for_receipt(
        &self,
        handle: &TransactionHandle,
        timeout: Duration,
    ) -> Result<Receipt, ProviderError> {
        self.waits.lock().unwrap().push(handle.hash.clone());
        match self.next_response() {
            ReceiptResponse::Success => Ok(Receipt {
                status: ReceiptStatus::Success,
                tx_hash: handle.hash.clone(),
                block_number: Some(1),
                gas_used: None,
            }),
            ReceiptResponse::Reverted => Ok(Receipt {
                status: ReceiptStatus::Reverted,
                tx_hash: handle.hash.clone(),
                block_number: Some(1),
                gas_used: None,
            }),
            ReceiptResponse::Timeout => Err(ProviderError::Timeout {
                ms: timeout.as_millis() as u64,
            }),
            ReceiptResponse::Fail(message) => Err(ProviderError::Rpc(message)),
        }
    }
}

// ─── CollectingReporter ───────────────────────────────────────────────────────

/// Records every progress update for later assertions.
#[derive(Default)]
pub struct CollectingReporter {
    states: Mutex<Vec<ProgressState>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<ProgressState> {
        self.states.lock().unwrap().clone()
    }
}

impl ProgressReporter for CollectingReporter {
    fn on_update(&self, state: ProgressState) {
        self.states.lock().unwrap().push(state);
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signer_consumes_script_then_accepts() {
        let signer = ScriptedSigner::new(vec![SubmitResponse::Fail("boom".into())]);
        let items = [WorkItem::new(1)];

        let err = signer.submit(&items, 700_000).await.unwrap_err();
        assert!(matches!(err, ProviderError::Signer(_)));

        let handle = signer.submit(&items, 700_000).await.unwrap();
        assert!(handle.hash.starts_with("0xtx"));
        assert_eq!(signer.submission_count(), 2);
    }

    #[tokio::test]
    async fn reader_timeout_reports_callers_ceiling() {
        let reader = ScriptedReader::new(vec![ReceiptResponse::Timeout]);
        let handle = TransactionHandle::new("0xabc");
        let err = reader
            .wait_for_receipt(&handle, Duration::from_secs(60))
            .await
            .unwrap_err();
        match err {
            ProviderError::Timeout { ms } => assert_eq!(ms, 60_000),
            other => panic!("expected Timeout, got {other:?}"),
        }
        assert_eq!(reader.waited_hashes(), vec!["0xabc".to_string()]);
    }
}
