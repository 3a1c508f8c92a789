use thiserror::Error;

/// Main error type for the trading environment
#[derive(Error, Debug)]
pub enum GymError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Market data errors
    #[error("CSV error at line {line}: {reason}")]
    Csv { line: usize, reason: String },

    #[error("Insufficient market data: need at least {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid market data: {0}")]
    InvalidMarketData(String),

    // State machine errors
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GymError
pub type Result<T> = std::result::Result<T, GymError>;
