//! Core types for the playback engine

use airwaves_core::CollectionKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// What kind of source a session is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// A single track straight from the library
    LibraryTrack,

    /// An album
    Album,

    /// A playlist
    Playlist,

    /// A podcast episode list
    Podcast,
}

impl SourceKind {
    /// Whether this source is a single track rather than a collection
    pub fn is_single_track(self) -> bool {
        matches!(self, SourceKind::LibraryTrack)
    }

    /// Whether the engine may shuffle this source
    pub fn shuffle_eligible(self) -> bool {
        matches!(self, SourceKind::Album | SourceKind::Playlist)
    }
}

impl From<CollectionKind> for SourceKind {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Album => SourceKind::Album,
            CollectionKind::Playlist => SourceKind::Playlist,
            CollectionKind::Podcast => SourceKind::Podcast,
        }
    }
}

/// Repeat mode; exactly one is active per source.
///
/// The first three form the collection family, the last two the
/// single-track family. The engine cycles within the family matching the
/// source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the source ends
    NoRepeat,

    /// Loop the whole collection
    RepeatAll,

    /// One extra full pass over the collection, then stop
    RepeatOnce,

    /// Loop the current track of a single-track session
    RepeatCurrentSong,

    /// Loop a single track indefinitely
    RepeatInfinite,
}

impl RepeatMode {
    /// Next mode in the collection cycle
    pub(crate) fn next_for_collection(self) -> Self {
        match self {
            RepeatMode::NoRepeat => RepeatMode::RepeatAll,
            RepeatMode::RepeatAll => RepeatMode::RepeatOnce,
            _ => RepeatMode::NoRepeat,
        }
    }

    /// Next mode in the single-track cycle
    pub(crate) fn next_for_track(self) -> Self {
        match self {
            RepeatMode::NoRepeat => RepeatMode::RepeatCurrentSong,
            RepeatMode::RepeatCurrentSong => RepeatMode::RepeatInfinite,
            _ => RepeatMode::NoRepeat,
        }
    }

    /// Whether track completion restarts the same track
    pub(crate) fn restarts_current(self) -> bool {
        matches!(self, RepeatMode::RepeatCurrentSong | RepeatMode::RepeatInfinite)
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepeatMode::NoRepeat => "No Repeat",
            RepeatMode::RepeatAll => "Repeat All",
            RepeatMode::RepeatOnce => "Repeat Once",
            RepeatMode::RepeatCurrentSong => "Repeat Current Song",
            RepeatMode::RepeatInfinite => "Repeat Infinite",
        };
        write!(f, "{name}")
    }
}

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No source, or source exhausted
    Stopped,

    /// Advancing with simulated time
    Playing,

    /// Frozen mid-track
    Paused,
}

/// Snapshot of one session, for the reporting collaborator.
///
/// Pure data; textual formatting is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Current state
    pub state: PlaybackState,

    /// Name of the current track, if any
    pub track_name: Option<String>,

    /// Time left in the current track (zero when stopped)
    pub remaining: Duration,

    /// Active repeat mode
    pub repeat: RepeatMode,

    /// Whether a shuffle permutation is active
    pub shuffle: bool,
}

impl PlaybackStatus {
    /// Snapshot for a user with no usable source
    pub fn stopped() -> Self {
        Self {
            state: PlaybackState::Stopped,
            track_name: None,
            remaining: Duration::ZERO,
            repeat: RepeatMode::NoRepeat,
            shuffle: false,
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Elapsed time past which "previous" restarts the current track
    /// instead of moving back. A policy constant, not a law of the engine.
    #[serde(default = "default_prev_restart_threshold")]
    pub prev_restart_threshold: Duration,
}

fn default_prev_restart_threshold() -> Duration {
    Duration::from_secs(3)
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            prev_restart_threshold: default_prev_restart_threshold(),
        }
    }
}
