use thiserror::Error;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors reported by the image store and the object uploader
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// No record for this id
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Content could not be read for upload
    #[error("Could not read upload content: {0}")]
    Content(#[from] std::io::Error),

    /// Backend refused or failed the request
    #[error("Backend error: {0}")]
    Backend(String),
}
