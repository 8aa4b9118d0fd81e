//! Error types for deeproute

use thiserror::Error;

/// Main error type for deeproute
#[derive(Error, Debug)]
pub enum DeeprouteError {
    /// Malformed input detected before the loop starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or non-numeric reward cell hit during a lookup
    #[error("Data error: missing or non-numeric reward at round {round}, arm {arm}")]
    Data { round: usize, arm: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeeprouteError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }
}

/// Result type alias for deeproute operations
pub type Result<T> = std::result::Result<T, DeeprouteError>;
