//! Error types for the guide crate.
//!
//! Persistence is the only fallible boundary here, and even those failures
//! are absorbed by the tour (best-effort save, degrade to "not completed").
//! Nothing in this crate raises an error across the public tour surface.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted onboarding state.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error during storage operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The storage medium rejected the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
