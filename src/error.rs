//! Error types

use thiserror::Error;

/// Main error type for the predictor
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote service answered with something we could not use
    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid week: {0}. Must be between 1-22")]
    InvalidWeek(u32),

    #[error("LLM not configured")]
    LlmNotConfigured,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PredictorError
pub type Result<T> = std::result::Result<T, PredictorError>;
