//! Collaborator traits — the wallet and read-layer boundaries of the engine.
//!
//! Both sides are implemented elsewhere (a wallet-connector bridge, a
//! JSON-RPC client); the engine only consumes these contracts.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ProviderError;
use crate::types::{Receipt, TransactionHandle, WorkItem};

/// The signing side of a run: turns a batch into one submitted transaction.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and is held as `Arc<dyn WalletSigner>`. The
/// signer is an exclusively-held resource for the duration of a run:
/// nothing else may submit through it while the runner is active, because
/// transactions must stay nonce-ordered.
#[async_trait]
pub trait WalletSigner: Send + Sync + 'static {
    /// Submit one aggregated transaction covering `items`, with the given
    /// gas limit.
    ///
    /// May suspend indefinitely while the wallet UI awaits user interaction;
    /// the engine applies no timeout here — the wallet is the authority.
    async fn submit(
        &self,
        items: &[WorkItem],
        gas_limit: u64,
    ) -> Result<TransactionHandle, ProviderError>;
}

/// The read side of a run: confirmation tracking for submitted transactions.
#[async_trait]
pub trait ChainReader: Send + Sync + 'static {
    /// Wait for the transaction's receipt, up to `timeout`.
    ///
    /// Implementations fail with [`ProviderError::Timeout`] when the ceiling
    /// elapses; the engine treats that as transient since the transaction
    /// may still land.
    async fn wait_for_receipt(
        &self,
        handle: &TransactionHandle,
        timeout: Duration,
    ) -> Result<Receipt, ProviderError>;
}
