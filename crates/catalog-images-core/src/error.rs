use thiserror::Error;

use crate::persistence::PersistenceError;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the catalog-images library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed or written
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// `add_files` was called while another call was still in flight
    #[error("Another file submission is already in progress")]
    ConcurrentSubmission,

    /// The collection has no free slots left
    #[error("Image collection is full ({capacity} images)")]
    CapacityExhausted { capacity: usize },

    /// Backing store failure
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Object storage upload failure for a pending entry
    #[error("Upload failed for '{entry_id}': {reason}")]
    Upload { entry_id: String, reason: String },
}
