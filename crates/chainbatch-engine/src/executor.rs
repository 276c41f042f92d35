//! Batch execution — drives one batch to a terminal outcome.
//!
//! Per attempt: submit through the signer, await the receipt, classify any
//! failure. Transient failures are retried in place under the run's
//! [`RetryPolicy`]; everything else terminates the batch. Every attempt is
//! recorded on the outcome for observability.

use std::sync::Arc;
use std::time::Duration;

use chainbatch_core::classify::classify_provider_error;
use chainbatch_core::error::FailureKind;
use chainbatch_core::provider::{ChainReader, WalletSigner};
use chainbatch_core::retry::RetryPolicy;
use chainbatch_core::types::{AttemptStatus, Batch, BatchOutcome, ExecutionAttempt};

/// Executes single batches against a signer/reader pair.
pub struct BatchExecutor {
    signer: Arc<dyn WalletSigner>,
    reader: Arc<dyn ChainReader>,
    retry: RetryPolicy,
    confirmation_timeout: Duration,
}

/// Classified failure of one attempt, kept alongside the raw message.
struct AttemptFailure {
    kind: FailureKind,
    message: String,
}

impl AttemptFailure {
    fn from_provider(error: chainbatch_core::error::ProviderError) -> Self {
        Self {
            kind: classify_provider_error(&error),
            message: error.to_string(),
        }
    }
}

impl BatchExecutor {
    pub fn new(
        signer: Arc<dyn WalletSigner>,
        reader: Arc<dyn ChainReader>,
        retry: RetryPolicy,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            signer,
            reader,
            retry,
            confirmation_timeout,
        }
    }

    /// Drive `batch` to a terminal outcome.
    ///
    /// The attempt loop only continues for retryable failures with attempts
    /// remaining; fatal kinds surface on the outcome unchanged so the runner
    /// can abort the whole run.
    pub async fn execute(&self, batch: &Batch) -> BatchOutcome {
        let mut attempts = Vec::new();
        let mut attempt_number = 0u32;

        loop {
            attempt_number += 1;
            let mut attempt = ExecutionAttempt::begin(attempt_number);

            match self.try_once(batch, &mut attempt).await {
                Ok(()) => {
                    attempts.push(attempt);
                    return BatchOutcome::succeeded(batch.index, attempts);
                }
                Err(failure) => {
                    attempt.status = AttemptStatus::Failed;
                    attempt.error_kind = Some(failure.kind);
                    attempts.push(attempt);

                    if failure.kind.is_retryable() {
                        if let Some(delay) = self.retry.next_delay(attempt_number) {
                            tracing::warn!(
                                batch = batch.index,
                                attempt = attempt_number,
                                delay_ms = delay.as_millis() as u64,
                                error = %failure.message,
                                "transient failure — retrying batch"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        tracing::error!(
                            batch = batch.index,
                            attempt = attempt_number,
                            error = %failure.message,
                            "retries exhausted"
                        );
                    }

                    return BatchOutcome::failed(
                        batch.index,
                        attempts,
                        failure.kind,
                        failure.message,
                    );
                }
            }
        }
    }

    async fn try_once(
        &self,
        batch: &Batch,
        attempt: &mut ExecutionAttempt,
    ) -> Result<(), AttemptFailure> {
        // May suspend indefinitely: the wallet UI owns this wait.
        let handle = self
            .signer
            .submit(&batch.items, batch.gas_limit)
            .await
            .map_err(AttemptFailure::from_provider)?;

        attempt.status = AttemptStatus::Submitted;
        attempt.tx_hash = Some(handle.hash.clone());
        tracing::debug!(
            batch = batch.index,
            tx = %handle,
            gas_limit = batch.gas_limit,
            "batch submitted — awaiting confirmation"
        );

        let receipt = self
            .reader
            .wait_for_receipt(&handle, self.confirmation_timeout)
            .await
            .map_err(AttemptFailure::from_provider)?;

        if receipt.is_success() {
            attempt.status = AttemptStatus::Confirmed;
            Ok(())
        } else {
            Err(AttemptFailure {
                kind: FailureKind::ContractRejected,
                message: format!("transaction {} reverted on-chain", handle.hash),
            })
        }
    }
}
