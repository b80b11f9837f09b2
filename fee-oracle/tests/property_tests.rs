//! Property-based tests for the fee oracle
//!
//! These tests verify core invariants that must always hold true
//! regardless of the input data, ensuring the aggregation, estimation,
//! and encoding stages behave correctly across all edge cases.

use fee_oracle::{BucketMap, FeeEstimator, HeatmapPayload, MempoolTransaction};
use proptest::prelude::*;

// Constants for property testing
const MAX_FEE: u64 = 10_000_000; // 0.1 BTC, far beyond sane fees
const MAX_VSIZE: u64 = 100_000; // Standard-size transactions
const MAX_BLOCKS: u32 = 6;

/// Generate a random list of transactions
fn transaction_strategy() -> impl Strategy<Value = Vec<MempoolTransaction>> {
    prop::collection::vec(
        (1u64..MAX_VSIZE, 0u64..MAX_FEE)
            .prop_map(|(vsize, fee)| MempoolTransaction::new(vsize, fee)),
        0..200,
    )
}

/// Generate a random projected-block histogram
fn histogram_strategy() -> impl Strategy<Value = (Vec<f64>, u64, u64)> {
    (
        prop::collection::vec(0.0f64..5_000.0, 0..30),
        0u64..2_000_000,
        0u64..8_000_000,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Ingested transaction weight is conserved exactly
    #[test]
    fn test_weight_conservation(transactions in transaction_strategy()) {
        let mut buckets = BucketMap::new();
        let expected: u64 = transactions.iter().map(|tx| tx.vsize).sum();

        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }

        prop_assert_eq!(buckets.total_weight(), expected);
    }

    /// Histogram ingestion never records more weight than the block declares
    #[test]
    fn test_histogram_weight_bounded(
        (fee_range, block_vsize, block_size) in histogram_strategy()
    ) {
        let mut buckets = BucketMap::new();
        buckets.ingest_block_histogram(&fee_range, block_vsize, block_size);

        let declared = if block_vsize > 0 {
            block_vsize
        } else {
            block_size * 250
        };

        prop_assert!(buckets.total_weight() <= declared);

        // The shortfall is only ever the integer-division remainder.
        if !fee_range.is_empty() {
            let chunk = declared / fee_range.len() as u64;
            prop_assert_eq!(buckets.total_weight(), chunk * fee_range.len() as u64);
        }
    }

    /// All reported targets stay within the configured maximum
    #[test]
    fn test_targets_within_bounds(transactions in transaction_strategy()) {
        let estimator = FeeEstimator::with_config(MAX_BLOCKS, 990_000).unwrap();
        let mut buckets = BucketMap::new();
        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }

        let estimate = estimator.estimate(&buckets);
        for target in estimate.targets() {
            prop_assert!(target >= 1);
            prop_assert!(target <= MAX_BLOCKS);
        }
    }

    /// Fee rates never increase as the confirmation target grows
    #[test]
    fn test_monotonicity_invariant(transactions in transaction_strategy()) {
        let estimator = FeeEstimator::with_config(MAX_BLOCKS, 100_000).unwrap();
        let mut buckets = BucketMap::new();
        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }

        let estimate = estimator.estimate(&buckets);
        let mut prev_fee_rate = u64::MAX;
        for target in estimate.targets() {
            if let Some(fee_rate) = estimate.get_fee_rate(target) {
                prop_assert!(
                    fee_rate <= prev_fee_rate,
                    "Fee rate increased from {} to {} at target {}",
                    prev_fee_rate, fee_rate, target
                );
                prev_fee_rate = fee_rate;
            }
        }
    }

    /// Test determinism: same input produces same output
    #[test]
    fn test_determinism(transactions in transaction_strategy()) {
        let estimator = FeeEstimator::new();
        let mut buckets = BucketMap::new();
        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }

        let first = estimator.estimate(&buckets);
        let second = estimator.estimate(&buckets);
        prop_assert_eq!(first.estimates, second.estimates);
    }

    /// Decay never increases weight and never increases bucket count
    #[test]
    fn test_decay_shrinks_monotonically(
        transactions in transaction_strategy(),
        factor in 0.0f64..1.5,
    ) {
        let mut buckets = BucketMap::new();
        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }

        let weight_before = buckets.total_weight();
        let count_before = buckets.bucket_count();

        buckets.decay(factor);

        prop_assert!(buckets.total_weight() <= weight_before);
        prop_assert!(buckets.bucket_count() <= count_before);
    }

    /// The snapshot grid is dense and consistent with the recorded weight
    #[test]
    fn test_snapshot_grid_shape(
        transactions in transaction_strategy(),
        (fee_range, block_vsize, block_size) in histogram_strategy(),
    ) {
        let mut buckets = BucketMap::new();
        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }
        buckets.ingest_block_histogram(&fee_range, block_vsize, block_size);

        let grid = buckets.snapshot();

        // Every row matches the x axis, and the cells sum back to the
        // total recorded weight.
        prop_assert_eq!(grid.z.len(), grid.y.len());
        let mut cell_sum: u64 = 0;
        for row in &grid.z {
            prop_assert_eq!(row.len(), grid.x.len());
            cell_sum += row.iter().sum::<u64>();
        }
        prop_assert_eq!(cell_sum, buckets.total_weight());

        // Axes are strictly ascending.
        for pair in grid.x.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for pair in grid.y.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    /// Encoding a payload and decoding it back is lossless
    #[test]
    fn test_encode_decode_round_trip(transactions in transaction_strategy()) {
        let mut buckets = BucketMap::new();
        for tx in &transactions {
            buckets.ingest_transaction(*tx);
        }

        let payload = buckets.snapshot().to_payload();
        let blob = payload.encode().unwrap();
        let decoded = HeatmapPayload::decode(&blob).unwrap();

        prop_assert_eq!(decoded, payload);
    }
}
