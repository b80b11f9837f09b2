//! Fee Oracle - live mempool fee estimation
//!
//! This library aggregates a live stream of mempool activity into a
//! two-dimensional weight histogram and derives fee estimates from it.
//! It answers two questions: what fee rate confirms a transaction within
//! N blocks, and what does the fee/size landscape of the mempool look
//! like right now.
//!
//! # Features
//! - Bucketed aggregation of individual transactions and projected-block
//!   fee histograms
//! - Miner-simulation fee estimates for confirmation targets of 1 to N blocks
//! - A compact heat-map encoding for caching and visualization
//!
//! # Example
//! ```
//! use fee_oracle::{BucketMap, FeeEstimator, MempoolTransaction};
//!
//! // Aggregate observed transactions into the bucket grid
//! let mut buckets = BucketMap::new();
//! buckets.ingest_transaction(MempoolTransaction::new(565, 1130)); // 2 sat/vB
//! buckets.ingest_transaction(MempoolTransaction::new(400, 4000)); // 10 sat/vB
//!
//! // Derive confirmation-target fee rates
//! let estimator = FeeEstimator::new();
//! let estimate = estimator.estimate(&buckets);
//! if let Some(fee_rate) = estimate.get_fee_rate(1) {
//!     println!("Confirm in the next block: {} sat/vB", fee_rate);
//! }
//!
//! // Encode the current landscape for a cache or frontend
//! let encoded = buckets.snapshot().encode().expect("Failed to encode heat-map");
//! assert!(!encoded.is_empty());
//! ```

// Public modules
pub mod error;

// Data structures
mod bucket_map;
mod fee_estimate;
mod fee_estimator;
mod heatmap;
mod mempool_transaction;

// Public exports
pub use bucket_map::{BucketMap, DEFAULT_FEERATE_STEP, DEFAULT_VSIZE_STEP};
pub use error::{OracleError, Result};
pub use fee_estimate::FeeEstimate;
pub use fee_estimator::FeeEstimator;
pub use heatmap::{HeatmapGrid, HeatmapPayload};
pub use mempool_transaction::MempoolTransaction;
