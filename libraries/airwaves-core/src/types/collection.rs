/// Collection domain types: albums, playlists and podcasts
use crate::types::{CollectionId, Track, TrackId, Username};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The kind tag of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Artist album, append-only in practice
    Album,

    /// User playlist, mutable at any time
    Playlist,

    /// Podcast episode list, sequential
    Podcast,
}

impl CollectionKind {
    /// Whether the playback engine may shuffle this kind.
    ///
    /// Podcasts are episode sequences and always play in order.
    pub fn shuffle_eligible(self) -> bool {
        !matches!(self, CollectionKind::Podcast)
    }

    /// Lowercase display name, matches the catalog input's `type` field
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Album => "album",
            CollectionKind::Playlist => "playlist",
            CollectionKind::Podcast => "podcast",
        }
    }
}

/// An ordered sequence of tracks with a kind tag.
///
/// Order is significant and the track list may be empty. Playlists are
/// mutated externally at any time; consumers must re-resolve tracks rather
/// than hold on to positions across mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique collection identifier
    pub id: CollectionId,

    /// Collection name
    pub name: String,

    /// Owning user (artist for albums, creator for playlists, host for podcasts)
    pub owner: Username,

    /// Kind tag
    pub kind: CollectionKind,

    /// Ordered tracks
    pub tracks: Vec<Track>,
}

impl Collection {
    /// Create a new empty collection
    pub fn new(name: impl Into<String>, owner: Username, kind: CollectionKind) -> Self {
        Self {
            id: CollectionId::generate(),
            name: name.into(),
            owner,
            kind,
            tracks: Vec::new(),
        }
    }

    /// Create a collection with an initial track list
    pub fn with_tracks(
        name: impl Into<String>,
        owner: Username,
        kind: CollectionKind,
        tracks: Vec<Track>,
    ) -> Self {
        let mut collection = Self::new(name, owner, kind);
        collection.tracks = tracks;
        collection
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the collection has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at a natural-order position
    pub fn track_at(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Natural-order position of a track by identity
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Append a track
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove a track by identity, returning it if present
    pub fn remove_track(&mut self, id: &TrackId) -> Option<Track> {
        let index = self.position_of(id)?;
        Some(self.tracks.remove(index))
    }

    /// Total duration of all tracks
    pub fn total_duration(&self) -> Duration {
        self.tracks.iter().map(|t| t.duration).sum()
    }
}
