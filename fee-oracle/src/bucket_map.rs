use std::collections::{BTreeMap, BTreeSet};

use crate::error::{OracleError, Result};
use crate::heatmap::HeatmapGrid;
use crate::mempool_transaction::MempoolTransaction;

/// Default width of a size bucket in vbytes.
pub const DEFAULT_VSIZE_STEP: u64 = 1000;

/// Default width of a fee-rate bucket in sat/vB.
pub const DEFAULT_FEERATE_STEP: u64 = 1;

/// Two-dimensional histogram of observed mempool weight.
///
/// Weight (in vbytes) is accumulated into buckets keyed by
/// `(fee-rate bucket, size bucket)`. Individual transactions land in the
/// size bucket matching their own virtual size, while projected-block
/// histograms use the histogram row index as the size coordinate, so the
/// two sources occupy overlapping but differently-scaled regions of the
/// same grid.
///
/// The map is meant to be owned by a single ingestion task; see
/// [`BucketMap::decay`] for the aging policy applied between publishes.
///
/// # Example
/// ```
/// use fee_oracle::{BucketMap, MempoolTransaction};
///
/// let mut buckets = BucketMap::new();
/// buckets.ingest_transaction(MempoolTransaction::new(500, 2500)); // 5 sat/vB
/// assert_eq!(buckets.total_weight(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct BucketMap {
    /// Width of a size bucket in vbytes
    vsize_step: u64,
    /// Width of a fee-rate bucket in sat/vB
    feerate_step: u64,
    /// Accumulated weight keyed by (fee-rate bucket, size bucket)
    buckets: BTreeMap<(u32, u32), u64>,
}

impl BucketMap {
    /// Creates a bucket map with the default step widths.
    pub fn new() -> Self {
        Self {
            vsize_step: DEFAULT_VSIZE_STEP,
            feerate_step: DEFAULT_FEERATE_STEP,
            buckets: BTreeMap::new(),
        }
    }

    /// Creates a bucket map with custom step widths.
    ///
    /// # Arguments
    /// * `vsize_step` - Width of a size bucket in vbytes
    /// * `feerate_step` - Width of a fee-rate bucket in sat/vB
    ///
    /// # Errors
    /// Returns an error if either step is zero.
    pub fn with_steps(vsize_step: u64, feerate_step: u64) -> Result<Self> {
        if vsize_step == 0 {
            return Err(OracleError::invalid_config("vsize_step must be positive"));
        }
        if feerate_step == 0 {
            return Err(OracleError::invalid_config("feerate_step must be positive"));
        }
        Ok(Self {
            vsize_step,
            feerate_step,
            buckets: BTreeMap::new(),
        })
    }

    /// Returns the width of a size bucket in vbytes.
    pub fn vsize_step(&self) -> u64 {
        self.vsize_step
    }

    /// Returns the width of a fee-rate bucket in sat/vB.
    pub fn feerate_step(&self) -> u64 {
        self.feerate_step
    }

    /// Adds a single transaction's weight to the grid.
    ///
    /// The transaction contributes its full virtual size to the bucket at
    /// `(floor(fee_rate / feerate_step), floor(vsize / vsize_step))`.
    /// Transactions with a zero virtual size carry no usable signal and are
    /// skipped.
    pub fn ingest_transaction(&mut self, tx: MempoolTransaction) {
        if tx.vsize == 0 {
            return;
        }
        let fee_bucket = self.fee_rate_bucket(tx.fee_rate());
        let size_bucket = (tx.vsize / self.vsize_step) as u32;
        self.add_weight(fee_bucket, size_bucket, tx.vsize);
    }

    /// Spreads a projected block's weight across its fee-rate histogram.
    ///
    /// The block's virtual size is split evenly over the histogram entries
    /// (integer division, remainder dropped). Each entry adds one chunk to
    /// the bucket at `(floor(fee_rate / feerate_step), row index)`; the row
    /// index doubles as the size coordinate so the heat-map keeps the
    /// block's internal fee ordering.
    ///
    /// When `block_vsize` is zero the virtual size is derived from the
    /// declared byte size under the 4x witness discount. An empty histogram
    /// is a no-op.
    pub fn ingest_block_histogram(&mut self, fee_range: &[f64], block_vsize: u64, block_size: u64) {
        if fee_range.is_empty() {
            return;
        }

        let mut virtual_size = block_vsize;
        if virtual_size == 0 {
            virtual_size = block_size.saturating_mul(250);
        }
        let chunk = virtual_size / fee_range.len() as u64;

        for (row, &fee_rate) in fee_range.iter().enumerate() {
            let fee_bucket = self.fee_rate_bucket(fee_rate);
            self.add_weight(fee_bucket, row as u32, chunk);
        }
    }

    /// Applies one round of multiplicative decay to every bucket.
    ///
    /// `factor` is clamped to `[0.0, 1.0]`. Weights are scaled and floored;
    /// buckets that decay to zero are removed so the grid does not
    /// accumulate dead cells. A factor of 1.0 leaves the map untouched,
    /// which restores a purely cumulative aggregation.
    pub fn decay(&mut self, factor: f64) {
        let factor = factor.clamp(0.0, 1.0);
        if factor >= 1.0 {
            return;
        }
        self.buckets.retain(|_, weight| {
            *weight = (*weight as f64 * factor) as u64;
            *weight > 0
        });
    }

    /// Collapses the grid to per-fee-rate totals, summing across all size
    /// buckets. Keys are fee-rate bucket indices in ascending order.
    pub fn fee_rate_totals(&self) -> BTreeMap<u32, u64> {
        let mut totals = BTreeMap::new();
        for (&(fee_bucket, _), &weight) in &self.buckets {
            let total: &mut u64 = totals.entry(fee_bucket).or_insert(0);
            *total = total.saturating_add(weight);
        }
        totals
    }

    /// Projects the sparse bucket map onto a dense grid for the heat-map.
    ///
    /// Axes contain only the bucket indices that actually occur, in
    /// ascending order. Cells with no recorded weight are zero-filled.
    pub fn snapshot(&self) -> HeatmapGrid {
        let fee_buckets: BTreeSet<u32> = self.buckets.keys().map(|&(fee, _)| fee).collect();
        let size_buckets: BTreeSet<u32> = self.buckets.keys().map(|&(_, size)| size).collect();

        let x: Vec<u32> = fee_buckets.into_iter().collect();
        let y: Vec<u32> = size_buckets.into_iter().collect();
        let z: Vec<Vec<u64>> = y
            .iter()
            .map(|&size| {
                x.iter()
                    .map(|&fee| self.buckets.get(&(fee, size)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        HeatmapGrid { x, y, z }
    }

    /// Returns the total weight across all buckets.
    pub fn total_weight(&self) -> u64 {
        self.buckets
            .values()
            .fold(0u64, |acc, &weight| acc.saturating_add(weight))
    }

    /// Returns the number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if no weight has been recorded.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Maps a fee rate in sat/vB to its bucket index.
    ///
    /// Truncation floors non-negative rates; out-of-range rates saturate at
    /// the maximum index instead of wrapping.
    fn fee_rate_bucket(&self, fee_rate: f64) -> u32 {
        (fee_rate / self.feerate_step as f64) as u32
    }

    fn add_weight(&mut self, fee_bucket: u32, size_bucket: u32, weight: u64) {
        let cell = self.buckets.entry((fee_bucket, size_bucket)).or_insert(0);
        *cell = cell.saturating_add(weight);
    }
}

impl Default for BucketMap {
    fn default() -> Self {
        Self::new()
    }
}
