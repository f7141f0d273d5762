//! Error types for the file store.
//!
//! All errors are propagated via [`StoreError`], which records the path
//! involved alongside the underlying I/O or JSON error.

use std::path::PathBuf;

/// Errors that can occur reading or writing the save file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the save file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing or renaming the save file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The save file is not a valid snapshot.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// File being decoded.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
