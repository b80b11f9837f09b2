use axum::extract::State;
use axum::Json;
use fee_oracle::HeatmapPayload;
use std::sync::Arc;
use tracing::warn;

use crate::api::error::ApiError;
use crate::cache::{CacheClient, FeeCache, HEATMAP_KEY};

/// Handler for GET /api/heatmap.
///
/// Fetches the packed heat-map blob from the cache and unpacks it so
/// clients receive plain JSON axes and log-scaled weights.
pub async fn get_heatmap(
    State(cache): State<Arc<CacheClient>>,
) -> Result<Json<HeatmapPayload>, ApiError> {
    let blob = cache.get(HEATMAP_KEY).await.map_err(|err| {
        warn!("Cache read failed: {err}");
        ApiError::ServiceUnavailable("cache unreachable".to_string())
    })?;

    match blob {
        Some(blob) => {
            let payload = HeatmapPayload::decode(&blob).map_err(|err| {
                warn!("Stored heat-map failed to decode: {err}");
                ApiError::Internal("Stored heat-map is corrupt".to_string())
            })?;
            Ok(Json(payload))
        }
        None => Err(ApiError::NotFound("Heat-map not ready".to_string())),
    }
}
