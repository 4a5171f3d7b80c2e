//! Error types for the demand_forecast crate

use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Empty or malformed input series, or out-of-range algorithm parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown outlier detection method
    #[error("Unsupported detection method: {0}")]
    UnsupportedMethod(String),

    /// Unknown interpolation strategy
    #[error("Unsupported interpolation strategy: {0}")]
    UnsupportedStrategy(String),

    /// Out-of-range demand-adjustment configuration
    #[error("Invalid demand configuration: {0}")]
    InvalidConfig(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
