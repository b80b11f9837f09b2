use chrono::Utc;
use std::collections::BTreeMap;

use crate::{
    bucket_map::BucketMap,
    error::{OracleError, Result},
    fee_estimate::FeeEstimate,
};

/// Derives confirmation-target fee rates from aggregated bucket weights.
///
/// The estimator simulates miners draining the mempool highest-fee-first:
/// fee-rate buckets are visited in descending order while a running total
/// of weight tracks how many blocks would be filled before each bucket is
/// reached. The cheapest fee rate seen for each block count becomes the
/// estimate for that confirmation target.
///
/// # Example
/// ```
/// use fee_oracle::{BucketMap, FeeEstimator, MempoolTransaction};
///
/// let mut buckets = BucketMap::new();
/// buckets.ingest_transaction(MempoolTransaction::new(400, 4000)); // 10 sat/vB
///
/// let estimator = FeeEstimator::new();
/// let estimate = estimator.estimate(&buckets);
/// assert_eq!(estimate.get_fee_rate(1), Some(10));
/// ```
pub struct FeeEstimator {
    max_blocks: u32,
    block_vsize_capacity: u64,
}

impl FeeEstimator {
    /// Default maximum confirmation target in blocks.
    pub const DEFAULT_MAX_BLOCKS: u32 = 6;

    /// Default simulated block capacity in vbytes, slightly under the
    /// consensus ceiling to account for coinbase and propagation overhead.
    pub const DEFAULT_BLOCK_VSIZE_CAPACITY: u64 = 990_000;

    /// Creates a new FeeEstimator with default settings.
    ///
    /// Default settings:
    /// - Maximum target: 6 blocks
    /// - Block capacity: 990,000 vB
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new FeeEstimator with custom settings.
    ///
    /// # Arguments
    /// * `max_blocks` - Largest confirmation target to report (must be at least 1)
    /// * `block_vsize_capacity` - Simulated block capacity in vbytes (must be positive)
    pub fn with_config(max_blocks: u32, block_vsize_capacity: u64) -> Result<Self> {
        if max_blocks == 0 {
            return Err(OracleError::invalid_config(
                "max_blocks must be at least 1",
            ));
        }
        if block_vsize_capacity == 0 {
            return Err(OracleError::invalid_config(
                "block_vsize_capacity must be positive",
            ));
        }

        Ok(Self {
            max_blocks,
            block_vsize_capacity,
        })
    }

    /// Returns the largest confirmation target this estimator reports.
    pub fn max_blocks(&self) -> u32 {
        self.max_blocks
    }

    /// Calculates fee estimates from the current bucket state.
    ///
    /// Walks the fee-rate buckets in descending order, accumulating weight.
    /// After adding a bucket, the block count needed to clear the
    /// accumulated weight determines the confirmation target that bucket's
    /// fee rate applies to; the first (highest) fee rate mapped to each
    /// target wins. Targets beyond `max_blocks` are dropped, so a thin
    /// mempool yields a sparse table and an empty one yields no estimates.
    ///
    /// The result is timestamped with the current time.
    pub fn estimate(&self, buckets: &BucketMap) -> FeeEstimate {
        let totals = buckets.fee_rate_totals();
        let mut estimates: BTreeMap<u32, u64> = BTreeMap::new();
        let mut cumulative: u64 = 0;

        for (&fee_bucket, &weight) in totals.iter().rev() {
            cumulative = cumulative.saturating_add(weight);
            let target = cumulative / self.block_vsize_capacity + 1;
            if target > u64::from(self.max_blocks) {
                continue;
            }
            estimates
                .entry(target as u32)
                .or_insert_with(|| fee_bucket as u64 * buckets.feerate_step());
        }

        FeeEstimate::new(estimates, Utc::now())
    }
}

impl Default for FeeEstimator {
    fn default() -> Self {
        Self {
            max_blocks: Self::DEFAULT_MAX_BLOCKS,
            block_vsize_capacity: Self::DEFAULT_BLOCK_VSIZE_CAPACITY,
        }
    }
}
