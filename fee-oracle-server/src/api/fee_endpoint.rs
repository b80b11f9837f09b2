use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::api::error::ApiError;
use crate::cache::{fee_key, CacheClient, FeeCache};

fn default_target() -> u32 {
    1
}

/// Query parameters for the fee endpoint.
#[derive(Debug, Deserialize)]
pub struct FeeQuery {
    /// Desired confirmation target in blocks (defaults to the next block)
    #[serde(default = "default_target")]
    pub target_blocks: u32,
}

/// Response body for the fee endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeeResponse {
    /// Estimated fee rate in sat/vB
    pub feerate: f64,
}

/// Handler for GET /api/fee.
///
/// Reads the published estimate for the requested confirmation target
/// straight from the cache. A missing key means the publisher has not
/// produced an estimate for that target (yet, or at all for targets the
/// current mempool says nothing about) and maps to 404.
pub async fn get_fee(
    State(cache): State<Arc<CacheClient>>,
    Query(query): Query<FeeQuery>,
) -> Result<Json<FeeResponse>, ApiError> {
    if query.target_blocks == 0 {
        return Err(ApiError::BadRequest(
            "target_blocks must be at least 1".to_string(),
        ));
    }

    let raw = cache
        .get(&fee_key(query.target_blocks))
        .await
        .map_err(|err| {
            warn!("Cache read failed: {err}");
            ApiError::ServiceUnavailable("cache unreachable".to_string())
        })?;

    match raw {
        Some(value) => {
            let feerate = value.parse::<f64>().map_err(|_| {
                warn!(
                    "Malformed fee entry {value:?} for target {}",
                    query.target_blocks
                );
                ApiError::Internal(format!(
                    "Malformed fee entry for target {}",
                    query.target_blocks
                ))
            })?;
            Ok(Json(FeeResponse { feerate }))
        }
        None => Err(ApiError::NotFound(format!(
            "No estimate yet for {} blocks",
            query.target_blocks
        ))),
    }
}
