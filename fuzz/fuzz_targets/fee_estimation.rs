#![no_main]

use fee_oracle::{BucketMap, FeeEstimator, MempoolTransaction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }

    // Parse fuzzer input to create transactions
    let mut buckets = BucketMap::new();
    let mut i = 0;

    while i + 16 <= data.len() {
        let vsize = u64::from_le_bytes([
            data[i], data[i+1], data[i+2], data[i+3],
            data[i+4], data[i+5], data[i+6], data[i+7],
        ]);
        let fee = u64::from_le_bytes([
            data[i+8], data[i+9], data[i+10], data[i+11],
            data[i+12], data[i+13], data[i+14], data[i+15],
        ]);

        // Constrain values to reasonable ranges to avoid OOM on the grid
        let vsize = (vsize % 1_000_000).max(1);
        let fee = fee % 100_000_000; // Max 1 BTC in fees

        buckets.ingest_transaction(MempoolTransaction::new(vsize, fee));
        i += 16;
    }

    // This should not panic regardless of input
    let estimator = FeeEstimator::new();
    let estimate = estimator.estimate(&buckets);

    // Targets stay within range and fee rates never increase with the
    // confirmation target
    let mut previous: Option<u64> = None;
    for (&target, &fee_rate) in &estimate.estimates {
        assert!(target >= 1 && target <= 6);
        if let Some(previous) = previous {
            assert!(fee_rate <= previous);
        }
        previous = Some(fee_rate);
    }

    // The snapshot pipeline should handle any grid the ingest produced
    let _ = buckets.snapshot().encode();
});
