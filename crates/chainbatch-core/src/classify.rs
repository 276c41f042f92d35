//! Failure classification — maps raw signer/node messages into [`FailureKind`].
//!
//! Match priority:
//! 1. User rejection patterns      → `FailureKind::UserRejected`
//! 2. Funds patterns               → `FailureKind::InsufficientFunds`
//! 3. Gas-exhaustion patterns      → `FailureKind::OutOfGas`
//! 4. Revert patterns              → `FailureKind::ContractRejected`
//! 5. Network/transport patterns   → `FailureKind::NetworkTransient`
//! 6. Fallback                     → `FailureKind::Unknown`
//!
//! Matching is case-insensitive substring search. The pattern set is an
//! implementation detail; the kind → retry/abort mapping is the contract.

use crate::error::{FailureKind, ProviderError};

/// Signing prompt declined or dismissed. Includes the EIP-1193 code 4001
/// string emitted by browser wallets.
const USER_REJECTED_PATTERNS: &[&str] = &[
    "user rejected",
    "user denied",
    "rejected by user",
    "user cancelled",
    "user canceled",
    "action_rejected",
    "request rejected",
];

const INSUFFICIENT_FUNDS_PATTERNS: &[&str] = &[
    "insufficient funds",
    "insufficient balance",
    "gas required exceeds allowance",
    "not enough funds",
];

const OUT_OF_GAS_PATTERNS: &[&str] = &[
    "out of gas",
    "intrinsic gas too low",
    "exceeds block gas limit",
    "gas limit reached",
];

const CONTRACT_REJECTED_PATTERNS: &[&str] = &[
    "execution reverted",
    "transaction reverted",
    "revert",
    "transaction failed",
];

const NETWORK_PATTERNS: &[&str] = &[
    "timeout",
    "timed out",
    "connection",
    "network",
    "econnrefused",
    "econnreset",
    "rate limit",
    "too many requests",
    "429",
    "502",
    "503",
    "bad gateway",
    "service unavailable",
    "failed to fetch",
    "socket hang up",
    "disconnected",
];

/// Classify a raw failure message into the closed taxonomy.
pub fn classify(message: &str) -> FailureKind {
    let msg = message.to_lowercase();
    let matches_any = |patterns: &[&str]| patterns.iter().any(|p| msg.contains(p));

    if matches_any(USER_REJECTED_PATTERNS) {
        FailureKind::UserRejected
    } else if matches_any(INSUFFICIENT_FUNDS_PATTERNS) {
        FailureKind::InsufficientFunds
    } else if matches_any(OUT_OF_GAS_PATTERNS) {
        FailureKind::OutOfGas
    } else if matches_any(CONTRACT_REJECTED_PATTERNS) {
        FailureKind::ContractRejected
    } else if matches_any(NETWORK_PATTERNS) {
        FailureKind::NetworkTransient
    } else {
        FailureKind::Unknown
    }
}

/// Classify a structured provider error.
///
/// Confirmation timeouts carry their own variant and map straight to
/// `NetworkTransient` — the transaction may still land, so the caller's
/// retry path applies. Everything else is classified by message.
pub fn classify_provider_error(error: &ProviderError) -> FailureKind {
    match error {
        ProviderError::Timeout { .. } => FailureKind::NetworkTransient,
        ProviderError::Signer(msg) | ProviderError::Rpc(msg) => classify(msg),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_user_rejection() {
        // MetaMask (EIP-1193 code 4001)
        assert_eq!(
            classify("MetaMask Tx Signature: User denied transaction signature."),
            FailureKind::UserRejected
        );
        assert_eq!(
            classify("ACTION_REJECTED: user rejected transaction"),
            FailureKind::UserRejected
        );
        assert_eq!(classify("Request rejected"), FailureKind::UserRejected);
    }

    #[test]
    fn classifies_insufficient_funds() {
        // geth
        assert_eq!(
            classify("insufficient funds for gas * price + value"),
            FailureKind::InsufficientFunds
        );
        assert_eq!(
            classify("err: insufficient balance for transfer"),
            FailureKind::InsufficientFunds
        );
    }

    #[test]
    fn classifies_out_of_gas() {
        assert_eq!(classify("out of gas"), FailureKind::OutOfGas);
        assert_eq!(classify("intrinsic gas too low"), FailureKind::OutOfGas);
        assert_eq!(
            classify("tx fee exceeds block gas limit"),
            FailureKind::OutOfGas
        );
    }

    #[test]
    fn classifies_contract_rejection() {
        assert_eq!(
            classify("execution reverted: machine not active"),
            FailureKind::ContractRejected
        );
        assert_eq!(
            classify("Transaction reverted without a reason string"),
            FailureKind::ContractRejected
        );
    }

    #[test]
    fn classifies_network_transient() {
        assert_eq!(
            classify("connection refused (ECONNREFUSED)"),
            FailureKind::NetworkTransient
        );
        assert_eq!(classify("Request timed out"), FailureKind::NetworkTransient);
        assert_eq!(
            classify("HTTP 429: too many requests"),
            FailureKind::NetworkTransient
        );
        assert_eq!(
            classify("503 Service Unavailable"),
            FailureKind::NetworkTransient
        );
    }

    #[test]
    fn unmatched_is_unknown() {
        assert_eq!(classify("something inexplicable"), FailureKind::Unknown);
        assert_eq!(classify(""), FailureKind::Unknown);
    }

    #[test]
    fn rejection_wins_over_network_noise() {
        // A wallet rejection relayed through an RPC wrapper must not be
        // mistaken for a transient failure just because "network" appears.
        assert_eq!(
            classify("network provider: user rejected the request"),
            FailureKind::UserRejected
        );
    }

    #[test]
    fn gas_wins_over_revert() {
        // Nodes often phrase gas exhaustion as a revert; the gas patterns
        // take precedence so the caller knows to re-plan.
        assert_eq!(
            classify("execution reverted: out of gas"),
            FailureKind::OutOfGas
        );
    }

    #[test]
    fn timeout_variant_maps_to_transient() {
        let e = ProviderError::Timeout { ms: 60_000 };
        assert_eq!(classify_provider_error(&e), FailureKind::NetworkTransient);
    }

    #[test]
    fn signer_variant_classified_by_message() {
        let e = ProviderError::Signer("user rejected the request".into());
        assert_eq!(classify_provider_error(&e), FailureKind::UserRejected);
        let e = ProviderError::Rpc("execution reverted".into());
        assert_eq!(classify_provider_error(&e), FailureKind::ContractRejected);
    }
}
