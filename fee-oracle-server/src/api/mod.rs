//! HTTP surface serving cached estimates and the heat-map

mod error;
mod fee_endpoint;
mod heatmap_endpoint;

pub use error::ApiError;
pub use fee_endpoint::{get_fee, FeeQuery, FeeResponse};
pub use heatmap_endpoint::get_heatmap;
