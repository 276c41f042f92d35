//! Batch planning — splits a work-item list into gas-bounded batches.
//!
//! Planning is a pure function: no I/O, deterministic for identical inputs.
//! Items are chunked contiguously in caller order; concatenating the planned
//! batches reproduces the input exactly. A chunk whose gas requirement
//! exceeds the ceiling rejects the whole plan — the caller must reduce
//! `max_batch_size` rather than have the planner silently shrink batches.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::gas::estimate_items;
use crate::types::{Batch, WorkItem};

/// Inputs to the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Upper bound on items per transaction.
    pub max_batch_size: usize,
    /// Maximum gas a single transaction may be submitted with.
    pub max_gas_ceiling: u64,
    /// Fixed per-call overhead of the batched contract function.
    pub base_gas: u64,
    /// Conservative marginal cost per item (safety margin baked in).
    pub per_item_gas: u64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 60,
            max_gas_ceiling: 25_000_000,
            base_gas: 300_000,
            per_item_gas: 400_000,
        }
    }
}

/// Split `items` into ordered batches respecting the size and gas ceilings.
///
/// Per-chunk gas is `base_gas` plus each item's marginal cost — the item's
/// `gas_weight` override where present, `per_item_gas` otherwise.
pub fn plan(items: &[WorkItem], config: &PlanConfig) -> Result<Vec<Batch>, PlanError> {
    if items.is_empty() {
        return Err(PlanError::EmptyInput);
    }
    if config.max_batch_size == 0 {
        return Err(PlanError::InvalidBatchSize);
    }

    let total = items.len().div_ceil(config.max_batch_size);
    let mut batches = Vec::with_capacity(total);

    for (index, chunk) in items.chunks(config.max_batch_size).enumerate() {
        let gas_limit = estimate_items(chunk, config.base_gas, config.per_item_gas)?;
        if gas_limit > config.max_gas_ceiling {
            return Err(PlanError::GasCeilingExceeded {
                batch_index: index,
                required: gas_limit,
                ceiling: config.max_gas_ceiling,
            });
        }
        batches.push(Batch {
            index,
            total,
            items: chunk.to_vec(),
            gas_limit,
        });
    }

    Ok(batches)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u64) -> Vec<WorkItem> {
        (0..n).map(WorkItem::new).collect()
    }

    #[test]
    fn splits_130_items_into_60_60_10() {
        let plan = plan(&items(130), &PlanConfig::default()).unwrap();
        let sizes: Vec<usize> = plan.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![60, 60, 10]);
        assert!(plan.iter().all(|b| b.total == 3));
        assert_eq!(
            plan.iter().map(|b| b.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn concatenation_reproduces_input_exactly() {
        let input = items(137);
        let plan = plan(&input, &PlanConfig::default()).unwrap();
        let rebuilt: Vec<WorkItem> = plan.into_iter().flat_map(|b| b.items).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn planning_is_deterministic() {
        let input = items(95);
        let config = PlanConfig::default();
        let a = plan(&input, &config).unwrap();
        let b = plan(&input, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn full_batch_gas_is_within_default_ceiling() {
        // base 300k + 60 * 400k = 24.3M, under the 25M ceiling.
        let plan = plan(&items(60), &PlanConfig::default()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].gas_limit, 24_300_000);
    }

    #[test]
    fn oversized_batch_is_rejected_not_shrunk() {
        let config = PlanConfig {
            max_batch_size: 62,
            ..PlanConfig::default()
        };
        // base 300k + 62 * 400k = 25.1M > 25M ceiling.
        let err = plan(&items(62), &config).unwrap_err();
        assert_eq!(
            err,
            PlanError::GasCeilingExceeded {
                batch_index: 0,
                required: 25_100_000,
                ceiling: 25_000_000,
            }
        );
    }

    #[test]
    fn reports_the_offending_batch_index() {
        // Batch 1 carries the heavy items and blows the ceiling.
        let mut input = items(60);
        input.extend((60..70).map(|id| WorkItem::with_gas_weight(id, 3_000_000)));
        let err = plan(&input, &PlanConfig::default()).unwrap_err();
        match err {
            PlanError::GasCeilingExceeded { batch_index, .. } => assert_eq!(batch_index, 1),
            other => panic!("expected GasCeilingExceeded, got {other:?}"),
        }
    }

    #[test]
    fn gas_weight_override_is_respected() {
        let input = vec![WorkItem::new(1), WorkItem::with_gas_weight(2, 1_000_000)];
        let plan = plan(&input, &PlanConfig::default()).unwrap();
        assert_eq!(plan[0].gas_limit, 300_000 + 400_000 + 1_000_000);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(
            plan(&[], &PlanConfig::default()).unwrap_err(),
            PlanError::EmptyInput
        );
    }

    #[test]
    fn zero_batch_size_is_an_error() {
        let config = PlanConfig {
            max_batch_size: 0,
            ..PlanConfig::default()
        };
        assert_eq!(
            plan(&items(5), &config).unwrap_err(),
            PlanError::InvalidBatchSize
        );
    }

    #[test]
    fn gas_overflow_is_caught() {
        let config = PlanConfig {
            max_batch_size: 3,
            max_gas_ceiling: u64::MAX,
            base_gas: u64::MAX - 1,
            per_item_gas: 1,
        };
        let err = plan(&items(3), &config).unwrap_err();
        assert_eq!(err, PlanError::GasOverflow { batch_size: 3 });
    }
}
