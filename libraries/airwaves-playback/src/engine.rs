//! Playback engine - the core state machine
//!
//! Owns one [`PlaybackSource`] per active user and advances every playing
//! session by elapsed simulated time. All catalog access goes through a
//! `&Catalog` parameter; the engine stores nothing but ids, so deletions
//! and playlist edits made by the catalog collaborator are observed on the
//! next call and recovered by stopping the affected session.
//!
//! Single-threaded by construction: callers drive it from a
//! timestamp-ordered command stream and must broadcast the elapsed delta
//! (via [`PlaybackEngine::advance_all`]) before each command's own effect.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::source::{Completion, PlaybackSource, SourceTarget};
use crate::types::{PlaybackConfig, PlaybackState, PlaybackStatus, RepeatMode, SourceKind};
use airwaves_core::{Catalog, Collection, CollectionId, Track, TrackId, Username};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// A source target resolved against the catalog
enum Resolved<'a> {
    Track(&'a Track),
    Collection(&'a Collection),
}

fn resolve<'a>(catalog: &'a Catalog, target: &SourceTarget) -> Option<Resolved<'a>> {
    match target {
        SourceTarget::Track(id) => catalog.track(id).map(Resolved::Track),
        SourceTarget::Collection(id) => catalog.collection(id).map(Resolved::Collection),
    }
}

/// Force a session into its terminal state after its source went away
fn invalidate(source: &mut PlaybackSource, username: &Username, events: &mut Vec<PlaybackEvent>) {
    warn!(user = %username, "source vanished from catalog, stopping session");
    source.stop();
    events.push(PlaybackEvent::SourceInvalidated {
        username: username.clone(),
    });
    events.push(PlaybackEvent::SessionStopped {
        username: username.clone(),
    });
}

/// Re-resolve a session's source and repair cursor state against whatever
/// the catalog holds now.
///
/// Returns `None` after transitioning the session to stopped when the
/// source is deleted, emptied, or the cursor no longer fits. A playlist
/// edit that swapped the track under the cursor restarts the session at
/// that position with the new track.
fn revalidate<'a>(
    source: &mut PlaybackSource,
    catalog: &'a Catalog,
    username: &Username,
    events: &mut Vec<PlaybackEvent>,
) -> Option<Resolved<'a>> {
    match resolve(catalog, &source.target) {
        None => {
            invalidate(source, username, events);
            None
        }
        Some(Resolved::Track(track)) => Some(Resolved::Track(track)),
        Some(Resolved::Collection(collection)) => {
            if collection.is_empty() {
                invalidate(source, username, events);
                return None;
            }
            if let Some(order) = &source.shuffle {
                if order.len() != collection.len() {
                    // The permutation predates a playlist edit; fall back
                    // to natural order without losing the playing track.
                    warn!(user = %username, "collection resized under shuffle, reverting to natural order");
                    source.shuffle = None;
                    source.cursor = collection
                        .position_of(&source.current_track)
                        .unwrap_or_else(|| source.cursor.min(collection.len() - 1));
                }
            }
            if source.cursor >= collection.len() {
                invalidate(source, username, events);
                return None;
            }
            let natural = source.current_natural_index();
            let Some(track) = collection.track_at(natural) else {
                invalidate(source, username, events);
                return None;
            };
            if track.id != source.current_track {
                debug!(user = %username, track = %track.name, "track under cursor changed, restarting it");
                source.current_track = track.id.clone();
                source.remaining = track.duration;
                events.push(PlaybackEvent::TrackChanged {
                    username: username.clone(),
                    track_id: track.id.clone(),
                });
            } else if source.remaining > track.duration {
                source.remaining = track.duration;
            }
            Some(Resolved::Collection(collection))
        }
    }
}

/// Consume an elapsed-time budget for one playing session.
///
/// The budget can span several track completions, so consumption is a
/// loop: whenever the budget covers the remaining time of the current
/// track, the completion policy runs and the loop continues against the
/// next track's duration. Consumption stops at the transition to stopped.
fn advance_session(
    source: &mut PlaybackSource,
    catalog: &Catalog,
    username: &Username,
    elapsed: Duration,
    events: &mut Vec<PlaybackEvent>,
) {
    if source.state != PlaybackState::Playing || elapsed.is_zero() {
        return;
    }
    let Some(resolved) = revalidate(source, catalog, username, events) else {
        return;
    };

    let mut budget = elapsed;
    loop {
        if budget < source.remaining {
            source.remaining -= budget;
            return;
        }
        budget -= source.remaining;

        let len = match &resolved {
            Resolved::Track(_) => 1,
            Resolved::Collection(c) => c.len(),
        };
        match source.complete_track(len) {
            Completion::Exhausted => {
                debug!(user = %username, "source exhausted, stopping");
                source.stop();
                events.push(PlaybackEvent::SessionStopped {
                    username: username.clone(),
                });
                return;
            }
            Completion::Continue => {
                let next = match &resolved {
                    Resolved::Track(track) => track,
                    Resolved::Collection(collection) => {
                        let Some(track) = collection.track_at(source.current_natural_index())
                        else {
                            invalidate(source, username, events);
                            return;
                        };
                        track
                    }
                };
                if next.id != source.current_track {
                    source.current_track = next.id.clone();
                    events.push(PlaybackEvent::TrackChanged {
                        username: username.clone(),
                        track_id: next.id.clone(),
                    });
                }
                if next.duration.is_zero() {
                    // A zero-length track would never drain the budget
                    invalidate(source, username, events);
                    return;
                }
                source.remaining = next.duration;
                if source.repeat.restarts_current() {
                    // The same track repeats until the budget runs out, so
                    // whole extra laps can be consumed in one step.
                    let lap = next.duration.as_secs();
                    budget = Duration::from_secs(budget.as_secs() % lap);
                }
            }
        }
    }
}

/// The per-user playback simulation engine.
///
/// Exclusively owns the username-to-source map. Sessions are keyed in a
/// `BTreeMap` so broadcasts and their events come out in a stable order.
#[derive(Debug, Default)]
pub struct PlaybackEngine {
    sessions: BTreeMap<Username, PlaybackSource>,
    last_timestamp: u64,
    config: PlaybackConfig,
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create an engine with the given tunables
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            sessions: BTreeMap::new(),
            last_timestamp: 0,
            config,
            pending_events: Vec::new(),
        }
    }

    /// The last timestamp observed by [`advance_all`](Self::advance_all)
    pub fn last_timestamp(&self) -> u64 {
        self.last_timestamp
    }

    /// Whether a user currently has any session, stopped or not
    pub fn has_session(&self, username: &Username) -> bool {
        self.sessions.contains_key(username)
    }

    /// Advance every playing session to `new_timestamp`.
    ///
    /// The delta is the saturating difference against the last observed
    /// timestamp; time never moves backward, so an out-of-order timestamp
    /// degrades to a zero delta and a zero delta changes nothing.
    pub fn advance_all(&mut self, catalog: &Catalog, new_timestamp: u64) {
        let elapsed = Duration::from_secs(new_timestamp.saturating_sub(self.last_timestamp));
        self.last_timestamp = self.last_timestamp.max(new_timestamp);
        if elapsed.is_zero() {
            return;
        }
        for (username, source) in &mut self.sessions {
            advance_session(source, catalog, username, elapsed, &mut self.pending_events);
        }
    }

    /// Bind a user's session to a library track.
    ///
    /// Replaces any prior session for that user; on error the prior
    /// session is untouched.
    pub fn load_track(
        &mut self,
        catalog: &Catalog,
        username: &Username,
        track_id: &TrackId,
    ) -> Result<SourceKind> {
        let track = catalog.track(track_id).ok_or(PlaybackError::SourceNotFound)?;
        debug!(user = %username, track = %track.name, "loading library track");
        self.sessions
            .insert(username.clone(), PlaybackSource::for_track(track));
        Ok(SourceKind::LibraryTrack)
    }

    /// Bind a user's session to a collection.
    ///
    /// Empty collections are rejected with [`PlaybackError::EmptySource`]
    /// and the prior session survives.
    pub fn load_collection(
        &mut self,
        catalog: &Catalog,
        username: &Username,
        collection_id: &CollectionId,
    ) -> Result<SourceKind> {
        let collection = catalog
            .collection(collection_id)
            .ok_or(PlaybackError::SourceNotFound)?;
        let source = PlaybackSource::for_collection(collection)?;
        let kind = source.kind;
        debug!(user = %username, kind = ?kind, name = %collection.name, "loading collection");
        self.sessions.insert(username.clone(), source);
        Ok(kind)
    }

    /// Toggle pause for a user's session, returning the new state
    pub fn play_pause(&mut self, username: &Username) -> Result<PlaybackState> {
        self.session_mut(username)?.toggle_pause()
    }

    /// Cycle the repeat mode, returning the new mode
    pub fn repeat(&mut self, username: &Username) -> Result<RepeatMode> {
        self.session_mut(username)?.cycle_repeat()
    }

    /// Toggle shuffle with an explicit seed, returning whether shuffle is
    /// now active
    pub fn shuffle(&mut self, catalog: &Catalog, username: &Username, seed: u64) -> Result<bool> {
        let (source, events) = self.session_parts(username)?;
        match revalidate(source, catalog, username, events) {
            Some(Resolved::Collection(collection)) => source.toggle_shuffle(collection, seed),
            Some(Resolved::Track(_)) => Err(PlaybackError::ShuffleUnsupported),
            None => Err(PlaybackError::InvalidState),
        }
    }

    /// Skip to the adjacent track in the effective order.
    ///
    /// End-of-collection follows the completion policy, so skipping past
    /// the last track under `NoRepeat` stops the session.
    pub fn skip_next(&mut self, catalog: &Catalog, username: &Username) -> Result<()> {
        let (source, events) = self.session_parts(username)?;
        if source.state == PlaybackState::Stopped {
            return Err(PlaybackError::InvalidState);
        }
        let Some(resolved) = revalidate(source, catalog, username, events) else {
            return Err(PlaybackError::InvalidState);
        };
        let len = match &resolved {
            Resolved::Track(_) => 1,
            Resolved::Collection(c) => c.len(),
        };
        match source.complete_track(len) {
            Completion::Exhausted => {
                source.stop();
                events.push(PlaybackEvent::SessionStopped {
                    username: username.clone(),
                });
            }
            Completion::Continue => {
                let next = match &resolved {
                    Resolved::Track(track) => *track,
                    Resolved::Collection(collection) => collection
                        .track_at(source.current_natural_index())
                        .ok_or(PlaybackError::InvalidState)?,
                };
                if next.id != source.current_track {
                    source.current_track = next.id.clone();
                    events.push(PlaybackEvent::TrackChanged {
                        username: username.clone(),
                        track_id: next.id.clone(),
                    });
                }
                source.remaining = next.duration;
            }
        }
        Ok(())
    }

    /// Skip back: restart the current track once enough of it has played
    /// (the configured threshold), otherwise move to the previous track in
    /// the effective order. The first track restarts either way.
    pub fn skip_prev(&mut self, catalog: &Catalog, username: &Username) -> Result<()> {
        let threshold = self.config.prev_restart_threshold;
        let (source, events) = self.session_parts(username)?;
        if source.state == PlaybackState::Stopped {
            return Err(PlaybackError::InvalidState);
        }
        let Some(resolved) = revalidate(source, catalog, username, events) else {
            return Err(PlaybackError::InvalidState);
        };
        let current = match &resolved {
            Resolved::Track(track) => *track,
            Resolved::Collection(collection) => collection
                .track_at(source.current_natural_index())
                .ok_or(PlaybackError::InvalidState)?,
        };
        if source.elapsed_of(current.duration) > threshold || source.cursor == 0 {
            source.remaining = current.duration;
            return Ok(());
        }
        source.cursor -= 1;
        if let Resolved::Collection(collection) = &resolved {
            let prev = collection
                .track_at(source.current_natural_index())
                .ok_or(PlaybackError::InvalidState)?;
            if prev.id != source.current_track {
                source.current_track = prev.id.clone();
                events.push(PlaybackEvent::TrackChanged {
                    username: username.clone(),
                    track_id: prev.id.clone(),
                });
            }
            source.remaining = prev.duration;
        }
        Ok(())
    }

    /// Pure status snapshot for a user.
    ///
    /// A dangling or exhausted source reports a stopped snapshot without
    /// mutating anything; the actual transition happens on the next
    /// `advance_all`.
    pub fn status(&self, catalog: &Catalog, username: &Username) -> PlaybackStatus {
        let Some(source) = self.sessions.get(username) else {
            return PlaybackStatus::stopped();
        };
        if source.state == PlaybackState::Stopped {
            return PlaybackStatus::stopped();
        }
        let track = match resolve(catalog, &source.target) {
            Some(Resolved::Track(track)) => track,
            Some(Resolved::Collection(collection)) => {
                if source.cursor >= collection.len() {
                    return PlaybackStatus::stopped();
                }
                match collection.track_at(source.current_natural_index()) {
                    Some(track) => track,
                    None => return PlaybackStatus::stopped(),
                }
            }
            None => return PlaybackStatus::stopped(),
        };
        PlaybackStatus {
            state: source.state,
            track_name: Some(track.name.clone()),
            remaining: source.remaining.min(track.duration),
            repeat: source.repeat,
            shuffle: source.shuffle.is_some(),
        }
    }

    /// Kind of the user's loaded source, if any
    pub fn source_kind(&self, username: &Username) -> Option<SourceKind> {
        self.sessions.get(username).map(|s| s.kind)
    }

    /// Identity of the track currently under a user's cursor.
    ///
    /// `None` for stopped or dangling sessions; read-only like
    /// [`status`](Self::status).
    pub fn current_track_id(&self, catalog: &Catalog, username: &Username) -> Option<TrackId> {
        let source = self.sessions.get(username)?;
        if source.state == PlaybackState::Stopped {
            return None;
        }
        match resolve(catalog, &source.target)? {
            Resolved::Track(track) => Some(track.id.clone()),
            Resolved::Collection(collection) => {
                if source.cursor >= collection.len() {
                    return None;
                }
                collection
                    .track_at(source.current_natural_index())
                    .map(|t| t.id.clone())
            }
        }
    }

    /// Drop a user's session entirely (user deleted, or logout)
    pub fn remove_session(&mut self, username: &Username) {
        self.sessions.remove(username);
    }

    /// Deletion notification: stop every session bound to this collection
    pub fn collection_removed(&mut self, id: &CollectionId) {
        for (username, source) in &mut self.sessions {
            let bound = matches!(&source.target, SourceTarget::Collection(c) if c == id);
            if bound && source.state != PlaybackState::Stopped {
                invalidate(source, username, &mut self.pending_events);
            }
        }
    }

    /// Deletion notification: stop every session bound to this track
    pub fn track_removed(&mut self, id: &TrackId) {
        for (username, source) in &mut self.sessions {
            let bound = matches!(&source.target, SourceTarget::Track(t) if t == id);
            if bound && source.state != PlaybackState::Stopped {
                invalidate(source, username, &mut self.pending_events);
            }
        }
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn session_mut(&mut self, username: &Username) -> Result<&mut PlaybackSource> {
        self.sessions
            .get_mut(username)
            .ok_or(PlaybackError::NoSource)
    }

    fn session_parts(
        &mut self,
        username: &Username,
    ) -> Result<(&mut PlaybackSource, &mut Vec<PlaybackEvent>)> {
        let source = self
            .sessions
            .get_mut(username)
            .ok_or(PlaybackError::NoSource)?;
        Ok((source, &mut self.pending_events))
    }
}
