/// Core error types for the Airwaves catalog
use crate::types::{CollectionId, TrackId, Username};
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Catalog error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Collection not found
    #[error("Collection not found: {0}")]
    CollectionNotFound(CollectionId),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(Username),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a duplicate entry error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }
}
