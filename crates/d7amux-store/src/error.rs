use std::path::PathBuf;

/// Errors that can occur while accessing device configuration.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was read or written before `init`.
    #[error("device store not initialized")]
    NotInitialized,

    /// The backing file could not be read or written.
    #[error("device store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file does not hold a valid device record.
    #[error("invalid device record: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
