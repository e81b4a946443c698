//! Error types for the grid state model

use thiserror::Error;

/// Errors raised while building or decoding grid state.
///
/// State transitions themselves never fail; these only surface when a
/// state is constructed from caller input.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid page size: {0} (must be greater than zero)")]
    InvalidPageSize(usize),

    #[error("Invalid page number count: {0} (must be greater than zero)")]
    InvalidPageNumberCount(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for grid state operations
pub type Result<T> = std::result::Result<T, GridError>;
