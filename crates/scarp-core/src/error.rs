//! Error types for scarp

use thiserror::Error;

/// The main error type for scarp operations
#[derive(Debug, Error)]
pub enum ScarpError {
    #[error("Map has no rows or no columns")]
    EmptyMap,

    #[error("Ragged map row {row}: expected {expected} columns, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Map parse error: {0}")]
    MapParse(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scarp operations
pub type Result<T> = std::result::Result<T, ScarpError>;

impl From<toml::de::Error> for ScarpError {
    fn from(err: toml::de::Error) -> Self {
        ScarpError::MapParse(err.to_string())
    }
}
