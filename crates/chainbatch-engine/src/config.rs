//! Run configuration.

use std::time::Duration;

use chainbatch_core::planner::PlanConfig;
use chainbatch_core::retry::RetryPolicy;

/// Configuration for one batched run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Upper bound on items per transaction.
    pub max_batch_size: usize,
    /// Fixed per-call overhead of the batched contract function.
    pub base_gas: u64,
    /// Conservative marginal gas cost per item.
    pub per_item_gas: u64,
    /// Maximum gas a single transaction may be submitted with.
    pub max_gas_ceiling: u64,
    /// Per-batch ceiling on waiting for a confirmation receipt.
    pub confirmation_timeout: Duration,
    /// Pause between batches (not after the last) to avoid bursting the
    /// RPC endpoint. Not part of the retry policy.
    pub inter_batch_delay: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 60,
            base_gas: 300_000,
            per_item_gas: 400_000,
            max_gas_ceiling: 25_000_000,
            confirmation_timeout: Duration::from_secs(60),
            inter_batch_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
        }
    }
}

impl RunConfig {
    /// The planner's slice of this configuration.
    pub fn plan_config(&self) -> PlanConfig {
        PlanConfig {
            max_batch_size: self.max_batch_size,
            max_gas_ceiling: self.max_gas_ceiling,
            base_gas: self.base_gas,
            per_item_gas: self.per_item_gas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_observed_dapp_constants() {
        let config = RunConfig::default();
        assert_eq!(config.max_batch_size, 60);
        assert_eq!(config.base_gas, 300_000);
        assert_eq!(config.per_item_gas, 400_000);
        assert_eq!(config.max_gas_ceiling, 25_000_000);
        assert_eq!(config.confirmation_timeout, Duration::from_secs(60));
        assert_eq!(config.inter_batch_delay, Duration::from_millis(500));
        assert_eq!(config.retry.max_attempts, 2);
    }
}
