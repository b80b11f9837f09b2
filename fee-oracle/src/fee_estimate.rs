use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fee rates required to confirm within each block target.
///
/// Keys are confirmation targets in blocks (1 means the next block) and
/// values are fee rates in sat/vB. Targets the current mempool shape says
/// nothing about are simply absent, so callers must treat lookups as
/// optional.
///
/// # Example
/// ```
/// use fee_oracle::FeeEstimate;
/// # use chrono::Utc;
/// # let fee_estimate = FeeEstimate::empty(Utc::now());
///
/// // Fee rate needed to confirm within 3 blocks, if known
/// let fee_rate = fee_estimate.get_fee_rate(3);
///
/// // Print a formatted table of all estimates
/// println!("{}", fee_estimate);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeEstimate {
    /// Map of confirmation targets to fee rates in sat/vB
    pub estimates: BTreeMap<u32, u64>,

    /// When this estimate was calculated
    pub timestamp: DateTime<Utc>,
}

impl FeeEstimate {
    /// Creates a new fee estimate.
    pub fn new(estimates: BTreeMap<u32, u64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            estimates,
            timestamp,
        }
    }

    /// Creates an empty fee estimate with no estimates available.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            estimates: BTreeMap::new(),
            timestamp,
        }
    }

    /// Gets the fee rate for a specific confirmation target.
    ///
    /// # Arguments
    /// * `target_blocks` - The desired confirmation target in blocks
    ///
    /// # Returns
    /// The fee rate in sat/vB, or None if the estimate is not available
    pub fn get_fee_rate(&self, target_blocks: u32) -> Option<u64> {
        self.estimates.get(&target_blocks).copied()
    }

    /// Returns all available confirmation targets in ascending order.
    pub fn targets(&self) -> Vec<u32> {
        self.estimates.keys().copied().collect()
    }

    /// Returns true if no targets could be estimated.
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

impl fmt::Display for FeeEstimate {
    /// Formats the estimates as a two-column table of target and fee rate.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.estimates.is_empty() {
            return Ok(());
        }

        writeln!(f, "{:10}\t{:10}", "Blocks", "sat/vB")?;
        for (blocks, fee_rate) in &self.estimates {
            writeln!(f, "{:10}\t{:10}", blocks, fee_rate)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fee_estimate() {
        let estimate = FeeEstimate::empty(Utc::now());
        assert!(estimate.is_empty());
        assert_eq!(estimate.get_fee_rate(1), None);
        assert!(estimate.targets().is_empty());
    }

    #[test]
    fn test_get_fee_rate() {
        let mut estimates = BTreeMap::new();
        estimates.insert(1, 12);
        estimates.insert(3, 5);

        let fee_estimate = FeeEstimate::new(estimates, Utc::now());

        assert_eq!(fee_estimate.get_fee_rate(1), Some(12));
        assert_eq!(fee_estimate.get_fee_rate(3), Some(5));
        assert_eq!(fee_estimate.get_fee_rate(2), None);
    }

    #[test]
    fn test_targets_are_ascending() {
        let mut estimates = BTreeMap::new();
        estimates.insert(4, 2);
        estimates.insert(1, 15);
        estimates.insert(2, 8);

        let fee_estimate = FeeEstimate::new(estimates, Utc::now());
        assert_eq!(fee_estimate.targets(), vec![1, 2, 4]);
    }

    #[test]
    fn test_display_lists_all_targets() {
        let mut estimates = BTreeMap::new();
        estimates.insert(1, 12);
        estimates.insert(2, 7);

        let rendered = FeeEstimate::new(estimates, Utc::now()).to_string();
        assert!(rendered.contains("Blocks"));
        assert!(rendered.contains("12"));
        assert!(rendered.contains('7'));
    }

    #[test]
    fn test_display_of_empty_estimate_is_blank() {
        let rendered = FeeEstimate::empty(Utc::now()).to_string();
        assert!(rendered.is_empty());
    }
}
