//! Playback events
//!
//! The engine records events as sessions change and hands them to the
//! reporting collaborator in batches via [`PlaybackEngine::drain_events`].
//!
//! [`PlaybackEngine::drain_events`]: crate::PlaybackEngine::drain_events

use airwaves_core::{TrackId, Username};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A session moved to a different track
    TrackChanged {
        /// Session owner
        username: Username,
        /// The new current track
        track_id: TrackId,
    },

    /// A session reached its terminal stopped state
    SessionStopped {
        /// Session owner
        username: Username,
    },

    /// A session's source was deleted or emptied out from under it
    SourceInvalidated {
        /// Session owner
        username: Username,
    },
}
