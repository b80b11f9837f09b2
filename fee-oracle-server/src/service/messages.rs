use serde::{Deserialize, Serialize};

/// Subscription request sent right after the WebSocket connects.
///
/// Serializes to `{"action": "want", "data": [...]}`, the handshake the
/// upstream feed expects before it starts streaming.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    pub action: &'a str,
    pub data: &'a [String],
}

impl<'a> SubscribeRequest<'a> {
    /// Builds a `want` request for the given channels.
    pub fn want(channels: &'a [String]) -> Self {
        Self {
            action: "want",
            data: channels,
        }
    }
}

/// One projected block from a `mempool-blocks` frame.
///
/// Serde field names follow the upstream camelCase wire format. Missing
/// numeric fields default to zero so a sparse projection still classifies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedBlock {
    /// Fee-rate levels spanning the block, cheapest first
    #[serde(default)]
    pub fee_range: Vec<f64>,
    /// Virtual size of the projected block in vbytes
    #[serde(default)]
    pub block_v_size: f64,
    /// Declared size in bytes, used when the virtual size is absent
    #[serde(default)]
    pub block_size: u64,
}

/// A single transaction event from the `transactions` channel.
///
/// Only the fields estimation needs are kept; everything else in the frame
/// is ignored. `fee` and `vsize` arrive as JSON numbers that may carry a
/// fractional part, so they are parsed as floats and floored on ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEvent {
    pub txid: String,
    pub fee: f64,
    pub vsize: f64,
}

/// Everything a single inbound text frame can resolve to.
#[derive(Debug)]
pub enum InboundFrame {
    /// Batch of projected blocks from the `mempool-blocks` channel
    MempoolBlocks(Vec<ProjectedBlock>),
    /// A transaction broadcast on the `transactions` channel
    Transaction(TransactionEvent),
    /// Valid JSON of a shape the oracle does not consume
    Ignored,
}

impl InboundFrame {
    /// Classifies one text frame.
    ///
    /// Returns None only for text that is not valid JSON. Valid JSON that
    /// matches neither channel shape (status messages, block notifications,
    /// future upstream additions) classifies as `Ignored` so the stream
    /// never errors on content.
    pub fn parse(text: &str) -> Option<InboundFrame> {
        let value: serde_json::Value = serde_json::from_str(text).ok()?;

        let Some(object) = value.as_object() else {
            return Some(InboundFrame::Ignored);
        };

        if let Some(blocks) = object.get("mempool-blocks") {
            if let Ok(blocks) = serde_json::from_value::<Vec<ProjectedBlock>>(blocks.clone()) {
                return Some(InboundFrame::MempoolBlocks(blocks));
            }
            return Some(InboundFrame::Ignored);
        }

        if let Ok(tx) = serde_json::from_value::<TransactionEvent>(value) {
            return Some(InboundFrame::Transaction(tx));
        }

        Some(InboundFrame::Ignored)
    }
}
