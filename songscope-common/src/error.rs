//! Common error types for SongScope

use thiserror::Error;

/// Common result type for SongScope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the core pipeline and the dashboard service
#[derive(Error, Debug)]
pub enum Error {
    /// Structural defect in the correlation table (row/column mismatch,
    /// too few rows, unparsable cell, label collision)
    #[error("Malformed correlation matrix: {0}")]
    MalformedMatrix(String),

    /// A selection event referenced a display label the label index does not know
    #[error("Unresolvable label: {0}")]
    UnresolvableLabel(String),

    /// CSV decoding error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
