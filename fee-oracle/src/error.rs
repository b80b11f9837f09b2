use thiserror::Error;

/// Main error type for the fee-oracle library.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression or decompression failure.
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// Base64 payload could not be decoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),
}

/// Type alias for Results in this library.
pub type Result<T> = std::result::Result<T, OracleError>;

impl OracleError {
    /// Creates an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
