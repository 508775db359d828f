//! Playback source: the per-session binding to a track or collection
//!
//! A `PlaybackSource` holds only ids into the catalog plus cursor state, so
//! external catalog mutation is observed the next time the engine resolves
//! it. The cursor indexes the *effective* order: the shuffle permutation
//! when one is active, natural collection order otherwise.

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffled_order;
use crate::types::{PlaybackState, RepeatMode, SourceKind};
use airwaves_core::{Collection, CollectionId, Track, TrackId};
use std::time::Duration;

/// What a session is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum SourceTarget {
    /// A single library track
    Track(TrackId),

    /// An album, playlist or podcast
    Collection(CollectionId),
}

/// One user's playback session state
#[derive(Debug, Clone)]
pub struct PlaybackSource {
    /// Source kind, fixed at load
    pub(crate) kind: SourceKind,

    /// Catalog reference
    pub(crate) target: SourceTarget,

    /// Position in the effective order (always 0 for a single track)
    pub(crate) cursor: usize,

    /// Identity of the track under the cursor, for detecting external
    /// playlist edits
    pub(crate) current_track: TrackId,

    /// Time left in the current track; in `(0, duration]` while not stopped
    pub(crate) remaining: Duration,

    /// Active repeat mode
    pub(crate) repeat: RepeatMode,

    /// Shuffle permutation over natural indices, `None` when inactive
    pub(crate) shuffle: Option<Vec<usize>>,

    /// Session state
    pub(crate) state: PlaybackState,
}

/// Outcome of one track-end evaluation of the completion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Keep playing at the (possibly moved) cursor
    Continue,

    /// The source is exhausted
    Exhausted,
}

impl PlaybackSource {
    /// Bind a session to a single library track
    pub(crate) fn for_track(track: &Track) -> Self {
        Self {
            kind: SourceKind::LibraryTrack,
            target: SourceTarget::Track(track.id.clone()),
            cursor: 0,
            current_track: track.id.clone(),
            remaining: track.duration,
            repeat: RepeatMode::NoRepeat,
            shuffle: None,
            state: PlaybackState::Playing,
        }
    }

    /// Bind a session to a collection, starting at its first track
    pub(crate) fn for_collection(collection: &Collection) -> Result<Self> {
        let first = collection.track_at(0).ok_or(PlaybackError::EmptySource)?;
        Ok(Self {
            kind: SourceKind::from(collection.kind),
            target: SourceTarget::Collection(collection.id.clone()),
            cursor: 0,
            current_track: first.id.clone(),
            remaining: first.duration,
            repeat: RepeatMode::NoRepeat,
            shuffle: None,
            state: PlaybackState::Playing,
        })
    }

    /// Natural collection index behind an effective-order position
    pub(crate) fn natural_index(&self, position: usize) -> usize {
        match &self.shuffle {
            Some(order) => order[position],
            None => position,
        }
    }

    /// Natural index of the cursor
    pub(crate) fn current_natural_index(&self) -> usize {
        self.natural_index(self.cursor)
    }

    /// Time already played of the current track
    pub(crate) fn elapsed_of(&self, duration: Duration) -> Duration {
        duration.saturating_sub(self.remaining)
    }

    /// Flip paused/playing
    pub(crate) fn toggle_pause(&mut self) -> Result<PlaybackState> {
        self.state = match self.state {
            PlaybackState::Stopped => return Err(PlaybackError::InvalidState),
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
        };
        Ok(self.state)
    }

    /// Cycle the repeat mode within the family matching the source kind
    pub(crate) fn cycle_repeat(&mut self) -> Result<RepeatMode> {
        if self.state == PlaybackState::Stopped {
            return Err(PlaybackError::InvalidState);
        }
        self.repeat = if self.kind.is_single_track() {
            self.repeat.next_for_track()
        } else {
            self.repeat.next_for_collection()
        };
        Ok(self.repeat)
    }

    /// Toggle the shuffle permutation.
    ///
    /// Enabling pins the playing track first and shuffles the rest by seed.
    /// Disabling returns to natural order at the playing track's natural
    /// position, whatever its old index was.
    pub(crate) fn toggle_shuffle(&mut self, collection: &Collection, seed: u64) -> Result<bool> {
        if !self.kind.shuffle_eligible() {
            return Err(PlaybackError::ShuffleUnsupported);
        }
        if self.state == PlaybackState::Stopped {
            return Err(PlaybackError::InvalidState);
        }
        match self.shuffle.take() {
            Some(order) => {
                let fallback = order.get(self.cursor).copied().unwrap_or(0);
                let natural = collection
                    .position_of(&self.current_track)
                    .unwrap_or(fallback);
                self.cursor = natural.min(collection.len().saturating_sub(1));
                Ok(false)
            }
            None => {
                // Unshuffled, so the cursor is already a natural index
                self.shuffle = Some(shuffled_order(collection.len(), self.cursor, seed));
                self.cursor = 0;
                Ok(true)
            }
        }
    }

    /// Apply the completion policy once, at a track-end boundary.
    ///
    /// | repeat | behavior |
    /// |---|---|
    /// | `NoRepeat` | next index; past the last, exhausted |
    /// | `RepeatAll` | next index, wrapping |
    /// | `RepeatOnce` | next index; wrap once, then downgrade to `NoRepeat` |
    /// | `RepeatCurrentSong` / `RepeatInfinite` | cursor unchanged |
    pub(crate) fn complete_track(&mut self, len: usize) -> Completion {
        if self.repeat.restarts_current() {
            return Completion::Continue;
        }
        if self.cursor + 1 < len {
            self.cursor += 1;
            return Completion::Continue;
        }
        match self.repeat {
            RepeatMode::NoRepeat => Completion::Exhausted,
            RepeatMode::RepeatAll => {
                self.cursor = 0;
                Completion::Continue
            }
            RepeatMode::RepeatOnce => {
                // The single permitted wrap; the bonus pass runs as NoRepeat
                self.cursor = 0;
                self.repeat = RepeatMode::NoRepeat;
                Completion::Continue
            }
            _ => Completion::Exhausted,
        }
    }

    /// Terminal stop: position semantics cleared
    pub(crate) fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.remaining = Duration::ZERO;
        self.shuffle = None;
    }
}
