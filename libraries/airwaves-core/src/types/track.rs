/// Track domain type
use crate::error::{CoreError, Result};
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable unit: a song or a podcast episode.
///
/// Immutable once created. Durations are whole simulated seconds and must
/// be strictly positive; a zero-length track would stall the playback
/// engine's completion loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track name
    pub name: String,

    /// Track duration (whole seconds)
    pub duration: Duration,

    /// Optional descriptive metadata, used by search filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TrackMeta>,
}

impl Track {
    /// Create a new track, rejecting non-positive durations
    pub fn new(name: impl Into<String>, duration: Duration) -> Result<Self> {
        let name = name.into();
        if duration.is_zero() {
            return Err(CoreError::invalid_input(format!(
                "track {name:?} must have a positive duration"
            )));
        }
        Ok(Self {
            id: TrackId::generate(),
            name,
            duration,
            meta: None,
        })
    }

    /// Create a new track with descriptive metadata attached
    pub fn with_meta(name: impl Into<String>, duration: Duration, meta: TrackMeta) -> Result<Self> {
        let mut track = Self::new(name, duration)?;
        track.meta = Some(meta);
        Ok(track)
    }

    /// Duration in whole seconds
    pub fn duration_secs(&self) -> u64 {
        self.duration.as_secs()
    }
}

/// Descriptive track metadata
///
/// Songs carry artist/album/genre/tags; podcast episodes carry a
/// description. All fields are optional, mirroring what the catalog input
/// can omit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMeta {
    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Genre
    pub genre: Option<String>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Release year
    pub release_year: Option<u32>,

    /// Episode description
    pub description: Option<String>,
}

impl TrackMeta {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_creation() {
        let track = Track::new("Stereo Love", Duration::from_secs(213)).unwrap();
        assert_eq!(track.name, "Stereo Love");
        assert_eq!(track.duration_secs(), 213);
        assert!(track.meta.is_none());
    }

    #[test]
    fn zero_duration_rejected() {
        let result = Track::new("Silence", Duration::ZERO);
        assert!(result.is_err());
    }

    #[test]
    fn track_with_meta() {
        let meta = TrackMeta {
            artist: Some("Edward Maya".to_string()),
            genre: Some("Pop".to_string()),
            tags: vec!["#dance".to_string()],
            ..TrackMeta::default()
        };
        let track = Track::with_meta("Stereo Love", Duration::from_secs(213), meta).unwrap();
        assert_eq!(track.meta.unwrap().artist.as_deref(), Some("Edward Maya"));
    }
}
