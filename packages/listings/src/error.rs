//! Typed errors for the listings library.

use thiserror::Error;

/// Errors that can occur while loading or querying providers.
#[derive(Debug, Error)]
pub enum ListingsError {
    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Dataset file could not be read
    #[error("failed to read dataset {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Connection string names a backend this build does not support
    #[error("unsupported database url: {url}")]
    UnsupportedDatabaseUrl { url: String },

    /// Unknown load mode name
    #[error("invalid load mode: {0}")]
    InvalidLoadMode(String),

    /// A load run failed part way; earlier batches stay committed
    #[error("load aborted after {committed} committed rows: {source}")]
    LoadAborted {
        committed: usize,
        #[source]
        source: Box<ListingsError>,
    },
}

#[cfg(any(feature = "sqlite", feature = "postgres"))]
impl From<sqlx::Error> for ListingsError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

/// Result type alias for listings operations.
pub type Result<T> = std::result::Result<T, ListingsError>;
