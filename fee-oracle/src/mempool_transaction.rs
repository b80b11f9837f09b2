use serde::{Deserialize, Serialize};

/// Represents a transaction observed in the live mempool feed.
///
/// This struct contains the minimal information needed for fee estimation:
/// the transaction's virtual size and the fee amount.
///
/// # Example
/// ```
/// use fee_oracle::MempoolTransaction;
///
/// let transaction = MempoolTransaction {
///     vsize: 250, // Virtual size in vbytes
///     fee: 1000,  // Fee amount in satoshis
/// };
///
/// // Get fee rate in sat/vB
/// let fee_rate = transaction.fee_rate();
/// assert_eq!(fee_rate, 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolTransaction {
    /// The transaction's virtual size in vbytes
    pub vsize: u64,

    /// The transaction fee in satoshis
    pub fee: u64,
}

impl MempoolTransaction {
    /// Creates a new mempool transaction.
    pub fn new(vsize: u64, fee: u64) -> Self {
        Self { vsize, fee }
    }

    /// Calculates the transaction's fee rate in sat/vB.
    ///
    /// # Returns
    /// The fee rate in sat/vB, or 0.0 if vsize is 0
    pub fn fee_rate(&self) -> f64 {
        if self.vsize == 0 {
            return 0.0;
        }
        (self.fee as f64) / (self.vsize as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rate_calculation() {
        let tx = MempoolTransaction::new(400, 1000);
        assert_eq!(tx.fee_rate(), 2.5);
    }

    #[test]
    fn test_fee_rate_with_zero_vsize() {
        let tx = MempoolTransaction::new(0, 1000);
        assert_eq!(tx.fee_rate(), 0.0);
    }

    #[test]
    fn test_fee_rate_precision() {
        let tx = MempoolTransaction::new(565, 1000);
        let fee_rate = tx.fee_rate();
        assert!((fee_rate - 1.769911).abs() < 0.000001);
    }
}
