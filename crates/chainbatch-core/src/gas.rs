//! Linear gas estimation for batched calls.
//!
//! The model is deliberately static: `base_gas + per_item_gas * batch_size`,
//! with the safety margin baked into `per_item_gas`. On-chain simulation of
//! a not-yet-submitted multi-item call is unreliable when the loop has
//! conditional side effects (an item destroyed mid-loop changes the cost),
//! so the estimate over-provisions instead of simulating.

use crate::error::PlanError;
use crate::types::WorkItem;

/// Conservative gas budget for a uniform batch of `batch_size` items.
///
/// Strictly increasing in `batch_size` for any positive `per_item_gas`.
/// Fails with [`PlanError::InvalidBatchSize`] for an empty batch and
/// [`PlanError::GasOverflow`] if the model overflows u64.
pub fn estimate(batch_size: usize, base_gas: u64, per_item_gas: u64) -> Result<u64, PlanError> {
    if batch_size == 0 {
        return Err(PlanError::InvalidBatchSize);
    }
    per_item_gas
        .checked_mul(batch_size as u64)
        .and_then(|marginal| base_gas.checked_add(marginal))
        .ok_or(PlanError::GasOverflow { batch_size })
}

/// Gas budget for a concrete item list, honoring per-item weight overrides.
///
/// Degenerates to [`estimate`] when no item carries an override. This is the
/// variant the planner prices chunks with.
pub fn estimate_items(
    items: &[WorkItem],
    base_gas: u64,
    per_item_gas: u64,
) -> Result<u64, PlanError> {
    if items.is_empty() {
        return Err(PlanError::InvalidBatchSize);
    }
    let mut gas = base_gas;
    for item in items {
        let marginal = item.gas_weight.unwrap_or(per_item_gas);
        gas = gas.checked_add(marginal).ok_or(PlanError::GasOverflow {
            batch_size: items.len(),
        })?;
    }
    Ok(gas)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_linear_model() {
        assert_eq!(estimate(60, 300_000, 400_000).unwrap(), 24_300_000);
        assert_eq!(estimate(1, 300_000, 400_000).unwrap(), 700_000);
    }

    #[test]
    fn strictly_increasing_in_batch_size() {
        let mut previous = 0;
        for n in 1..=100 {
            let gas = estimate(n, 300_000, 400_000).unwrap();
            assert!(gas > previous, "estimate({n}) = {gas} not > {previous}");
            previous = gas;
        }
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        assert_eq!(
            estimate(0, 300_000, 400_000).unwrap_err(),
            PlanError::InvalidBatchSize
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(
            estimate(2, 1, u64::MAX).unwrap_err(),
            PlanError::GasOverflow { batch_size: 2 }
        );
        assert_eq!(
            estimate(1, u64::MAX, 1).unwrap_err(),
            PlanError::GasOverflow { batch_size: 1 }
        );
    }

    #[test]
    fn weighted_estimate_degenerates_to_uniform() {
        let plain: Vec<WorkItem> = (0..10).map(WorkItem::new).collect();
        assert_eq!(
            estimate_items(&plain, 300_000, 400_000).unwrap(),
            estimate(10, 300_000, 400_000).unwrap()
        );
    }

    #[test]
    fn weighted_estimate_honors_overrides() {
        let items = vec![WorkItem::new(1), WorkItem::with_gas_weight(2, 1_000_000)];
        assert_eq!(
            estimate_items(&items, 300_000, 400_000).unwrap(),
            300_000 + 400_000 + 1_000_000
        );
    }
}
