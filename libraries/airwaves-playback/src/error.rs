//! Error types for the playback engine

use thiserror::Error;

/// Playback errors.
///
/// Every variant is recovered locally by the command layer; none is fatal.
/// Dangling catalog references are not an error at all: the engine
/// transitions the affected session to stopped and reports that through
/// its normal status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// The user has no active source
    #[error("no active source for this user")]
    NoSource,

    /// The operation needs a playing or paused session, but it is stopped
    #[error("session is stopped")]
    InvalidState,

    /// Load attempted on a collection with no tracks
    #[error("cannot load an empty collection")]
    EmptySource,

    /// The referenced track or collection is not in the catalog
    #[error("source reference not found in catalog")]
    SourceNotFound,

    /// Shuffle requested on a source kind that always plays in order
    #[error("the loaded source cannot be shuffled")]
    ShuffleUnsupported,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
