use fee_oracle::{BucketMap, FeeEstimator, MempoolTransaction};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::cache::{fee_key, CacheClient, FeeCache, HEATMAP_KEY};
use crate::service::backoff::Backoff;
use crate::service::messages::{InboundFrame, SubscribeRequest};

/// Listener errors. All of these are transport-level and recoverable by
/// reconnecting; none of them should take the process down.
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("WebSocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Subscription serialization error: {0}")]
    Subscribe(#[from] serde_json::Error),

    #[error("Upstream closed the stream")]
    StreamEnded,
}

/// Runtime settings for the ingestion loop.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// WebSocket endpoint of the upstream mempool feed
    pub url: String,
    /// Channels to subscribe to after connecting
    pub channels: Vec<String>,
    /// How often estimates and the heat-map are published to the cache
    pub publish_interval: Duration,
    /// How often a liveness line is logged
    pub heartbeat_interval: Duration,
    /// Expiry applied to every published cache key
    pub cache_ttl: Duration,
    /// How often bucket decay is applied
    pub decay_interval: Duration,
    /// Multiplicative decay factor per decay tick (1.0 disables decay)
    pub decay_factor: f64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            url: "wss://mempool.space/api/v1/ws".to_string(),
            channels: vec!["mempool-blocks".to_string(), "transactions".to_string()],
            publish_interval: Duration::from_millis(1500),
            heartbeat_interval: Duration::from_millis(5000),
            cache_ttl: Duration::from_secs(90),
            decay_interval: Duration::from_secs(60),
            decay_factor: 0.995,
        }
    }
}

/// Service that ingests the live mempool feed and publishes fee estimates.
///
/// The listener owns the WebSocket connection lifecycle and the bucket
/// grid. Inbound frames are classified and folded into the grid; on a
/// fixed cadence the grid is turned into a heat-map blob and a set of
/// per-target fee keys, all written to the cache with a TTL. The grid is
/// only ever touched from this task, so a dropped connection costs no
/// accumulated state: reconnection picks up aggregation where it left off.
pub struct MempoolListener {
    config: ListenerConfig,
    cache: Arc<CacheClient>,
    estimator: FeeEstimator,
    buckets: BucketMap,
    frames_since_heartbeat: u64,
}

impl MempoolListener {
    /// Creates a new listener publishing into the given cache.
    pub fn new(config: ListenerConfig, cache: Arc<CacheClient>, estimator: FeeEstimator) -> Self {
        Self {
            config,
            cache,
            estimator,
            buckets: BucketMap::new(),
            frames_since_heartbeat: 0,
        }
    }

    /// Runs the ingestion loop until the process shuts down.
    ///
    /// Any transport failure tears the connection down and reconnects with
    /// exponential backoff. Bucket weights survive reconnects.
    pub async fn run(mut self) {
        let mut backoff = Backoff::default();

        loop {
            info!("Connecting to upstream feed at {}", self.config.url);

            if let Err(err) = self.connect_and_stream(&mut backoff).await {
                let delay = backoff.next_delay();
                warn!("Upstream connection lost: {err}; reconnecting in {delay:?}");
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Drives one connection: subscribe, then stream frames while the
    /// publish, heartbeat, and decay timers fire in between.
    async fn connect_and_stream(&mut self, backoff: &mut Backoff) -> Result<(), ListenerError> {
        let (mut ws_stream, _) = connect_async(self.config.url.as_str()).await?;

        let subscribe = serde_json::to_string(&SubscribeRequest::want(&self.config.channels))?;
        ws_stream.send(Message::text(subscribe)).await?;
        backoff.reset();
        info!("Subscribed to channels {:?}", self.config.channels);

        // Timers start one period out so a flapping connection does not
        // publish or decay more often than configured.
        let mut publish = self.timer(self.config.publish_interval);
        let mut heartbeat = self.timer(self.config.heartbeat_interval);
        let mut decay = self.timer(self.config.decay_interval);

        loop {
            tokio::select! {
                frame = ws_stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.apply_frame(&text),
                    Some(Ok(Message::Close(_))) | None => return Err(ListenerError::StreamEnded),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                },
                _ = publish.tick() => self.publish().await,
                _ = heartbeat.tick() => self.heartbeat(),
                _ = decay.tick() => self.buckets.decay(self.config.decay_factor),
            }
        }
    }

    fn timer(&self, period: Duration) -> tokio::time::Interval {
        interval_at(Instant::now() + period, period)
    }

    /// Classifies one text frame and folds it into the bucket grid.
    fn apply_frame(&mut self, text: &str) {
        match InboundFrame::parse(text) {
            Some(InboundFrame::MempoolBlocks(blocks)) => {
                for block in &blocks {
                    self.buckets.ingest_block_histogram(
                        &block.fee_range,
                        block.block_v_size as u64,
                        block.block_size,
                    );
                }
                self.frames_since_heartbeat += 1;
            }
            Some(InboundFrame::Transaction(tx)) => {
                self.buckets
                    .ingest_transaction(MempoolTransaction::new(tx.vsize as u64, tx.fee as u64));
                self.frames_since_heartbeat += 1;
            }
            Some(InboundFrame::Ignored) => {}
            None => debug!("Dropping unparseable frame"),
        }
    }

    /// Publishes the heat-map and per-target fee keys with the configured
    /// TTL.
    ///
    /// Every write is a single attempt; failures are logged and dropped.
    /// The next publish tick rewrites all keys and the TTL bounds how stale
    /// a reader can observe them in the meantime.
    async fn publish(&self) {
        let ttl = self.config.cache_ttl;

        match self.buckets.snapshot().encode() {
            Ok(encoded) => {
                if let Err(err) = self.cache.set_with_ttl(HEATMAP_KEY, &encoded, ttl).await {
                    warn!("Failed to publish heat-map: {err}");
                }
            }
            Err(err) => warn!("Failed to encode heat-map: {err}"),
        }

        let estimate = self.estimator.estimate(&self.buckets);
        for (&target, &fee_rate) in &estimate.estimates {
            if let Err(err) = self
                .cache
                .set_with_ttl(&fee_key(target), &fee_rate.to_string(), ttl)
                .await
            {
                warn!("Failed to publish fee estimate for target {target}: {err}");
            }
        }

        debug!(
            "Published heat-map and {} fee targets",
            estimate.estimates.len()
        );
    }

    fn heartbeat(&mut self) {
        info!(
            "Processed {} frames since last heartbeat ({} buckets, {} vB aggregated)",
            self.frames_since_heartbeat,
            self.buckets.bucket_count(),
            self.buckets.total_weight(),
        );
        self.frames_since_heartbeat = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use fee_oracle::HeatmapPayload;

    fn test_listener() -> (MempoolListener, Arc<CacheClient>) {
        let cache = Arc::new(CacheClient::Memory(MemoryCache::new()));
        let listener = MempoolListener::new(
            ListenerConfig::default(),
            cache.clone(),
            FeeEstimator::new(),
        );
        (listener, cache)
    }

    #[tokio::test]
    async fn test_transaction_frame_feeds_buckets() {
        let (mut listener, _cache) = test_listener();

        listener.apply_frame(r#"{"txid": "ab", "fee": 4000, "vsize": 400}"#);

        assert_eq!(listener.buckets.total_weight(), 400);
        assert_eq!(listener.frames_since_heartbeat, 1);
    }

    #[tokio::test]
    async fn test_blocks_frame_feeds_buckets() {
        let (mut listener, _cache) = test_listener();

        listener.apply_frame(
            r#"{"mempool-blocks": [{"blockVSize": 600000, "feeRange": [1.0, 2.0, 3.0]}]}"#,
        );

        assert_eq!(listener.buckets.total_weight(), 600_000);
        assert_eq!(listener.buckets.bucket_count(), 3);
    }

    #[tokio::test]
    async fn test_fractional_tx_fields_floor() {
        let (mut listener, _cache) = test_listener();

        listener.apply_frame(r#"{"txid": "ab", "fee": 1413.9, "vsize": 141.25}"#);

        assert_eq!(listener.buckets.total_weight(), 141);
    }

    #[tokio::test]
    async fn test_noise_frames_change_nothing() {
        let (mut listener, _cache) = test_listener();

        listener.apply_frame(r#"{"blocks": [{"height": 900000}]}"#);
        listener.apply_frame("garbage");

        assert!(listener.buckets.is_empty());
        assert_eq!(listener.frames_since_heartbeat, 0);
    }

    #[tokio::test]
    async fn test_publish_writes_fee_and_heatmap_keys() {
        let (mut listener, cache) = test_listener();

        // 10 sat/vB transaction, well under one block of weight.
        listener.apply_frame(r#"{"txid": "ab", "fee": 4000, "vsize": 400}"#);
        listener.publish().await;

        assert_eq!(cache.get("fee-1").await.unwrap(), Some("10".to_string()));

        let blob = cache.get(HEATMAP_KEY).await.unwrap().expect("heat-map key");
        let payload = HeatmapPayload::decode(&blob).unwrap();
        assert_eq!(payload.x, vec![10]);
        assert_eq!(payload.y, vec![0]);
    }

    #[tokio::test]
    async fn test_publish_with_no_data_writes_only_heatmap() {
        let (listener, cache) = test_listener();

        listener.publish().await;

        assert!(cache.get(HEATMAP_KEY).await.unwrap().is_some());
        assert_eq!(cache.get("fee-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_heartbeat_resets_frame_counter() {
        let (mut listener, _cache) = test_listener();

        listener.apply_frame(r#"{"txid": "ab", "fee": 4000, "vsize": 400}"#);
        assert_eq!(listener.frames_since_heartbeat, 1);

        listener.heartbeat();
        assert_eq!(listener.frames_since_heartbeat, 0);
    }
}
