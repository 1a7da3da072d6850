//! Error types for geotrust

use thiserror::Error;

/// Main error type for geotrust operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Region not found: {0}")]
    RegionNotFound(String),
}

/// Result type alias for geotrust operations
pub type Result<T> = std::result::Result<T, Error>;
