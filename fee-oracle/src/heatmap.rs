use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::Result;

/// Dense projection of the bucket grid, ready for visualization.
///
/// `x` holds the fee-rate bucket indices, `y` the size bucket indices,
/// both ascending and containing only indices that actually occur. `z` is
/// row-major: `z[i][j]` is the weight at size bucket `y[i]` and fee-rate
/// bucket `x[j]`, so every row has `x.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    /// Fee-rate bucket indices (ascending)
    pub x: Vec<u32>,
    /// Size bucket indices (ascending)
    pub y: Vec<u32>,
    /// Weight in vbytes per (size, fee-rate) cell
    pub z: Vec<Vec<u64>>,
}

impl HeatmapGrid {
    /// Applies `log1p` dynamic-range compression to the weights.
    ///
    /// Raw weights span several orders of magnitude, which would wash out
    /// everything but the densest cells when rendered. `ln(1 + w)` keeps
    /// zero cells at exactly zero while flattening the range.
    pub fn to_payload(&self) -> HeatmapPayload {
        HeatmapPayload {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self
                .z
                .iter()
                .map(|row| row.iter().map(|&weight| (weight as f64).ln_1p()).collect())
                .collect(),
        }
    }

    /// Log-scales the grid and packs it for cache storage.
    ///
    /// Shorthand for `to_payload().encode()`.
    pub fn encode(&self) -> Result<String> {
        self.to_payload().encode()
    }
}

/// Wire form of the heat-map: the same axes with log-scaled weights.
///
/// This is what gets stored in the cache and returned by the API, so the
/// field names are part of the external contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPayload {
    /// Fee-rate bucket indices (ascending)
    pub x: Vec<u32>,
    /// Size bucket indices (ascending)
    pub y: Vec<u32>,
    /// Log-scaled weight per (size, fee-rate) cell
    pub z: Vec<Vec<f64>>,
}

impl HeatmapPayload {
    /// Serializes the payload to a compact text blob.
    ///
    /// The payload is JSON-serialized, zlib-compressed, and base64-encoded
    /// so it can live in a string-valued cache key.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;
        Ok(STANDARD.encode(compressed))
    }

    /// Reverses [`HeatmapPayload::encode`].
    ///
    /// # Errors
    /// Returns an error if the blob is not valid base64, does not inflate,
    /// or does not deserialize to a payload.
    pub fn decode(blob: &str) -> Result<Self> {
        let compressed = STANDARD.decode(blob.trim())?;
        let mut decoder = ZlibDecoder::new(compressed.as_slice());
        let mut json = Vec::new();
        decoder.read_to_end(&mut json)?;
        Ok(serde_json::from_slice(&json)?)
    }
}
