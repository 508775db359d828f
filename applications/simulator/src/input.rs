//! JSON input formats
//!
//! Serde mirrors of the library file and the timestamped command stream.
//! Every field the stream can omit carries a default, so one struct covers
//! the whole command alphabet.

use airwaves_core::search::Filters;
use serde::Deserialize;

/// The catalog seed file
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryInput {
    #[serde(default)]
    pub users: Vec<UserInput>,

    #[serde(default)]
    pub songs: Vec<SongInput>,

    #[serde(default)]
    pub podcasts: Vec<PodcastInput>,

    #[serde(default)]
    pub albums: Vec<AlbumInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub age: u32,
    pub city: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    pub name: String,

    /// Whole seconds, must be positive
    pub duration: u64,

    #[serde(default)]
    pub album: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub genre: Option<String>,

    #[serde(default)]
    pub release_year: Option<u32>,

    #[serde(default)]
    pub artist: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInput {
    pub name: String,

    /// Whole seconds, must be positive
    pub duration: u64,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodcastInput {
    pub name: String,
    pub owner: String,
    pub episodes: Vec<EpisodeInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInput {
    pub name: String,
    pub owner: String,
    pub songs: Vec<SongInput>,
}

/// One command from the timestamped stream
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInput {
    pub command: String,

    #[serde(default)]
    pub username: Option<String>,

    pub timestamp: u64,

    /// Search / load / delete target kind: song, album, playlist, podcast
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Search filters
    #[serde(default)]
    pub filters: Option<Filters>,

    /// 1-based selection into the last search results
    #[serde(default)]
    pub item_number: Option<usize>,

    /// Shuffle seed
    #[serde(default)]
    pub seed: Option<u64>,

    /// 1-based index into the user's playlists, in creation order
    #[serde(default)]
    pub playlist_id: Option<usize>,

    #[serde(default)]
    pub playlist_name: Option<String>,

    /// Entity name for admin commands such as deleteCollection
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_with_minimal_fields() {
        let cmd: CommandInput = serde_json::from_str(
            r#"{"command": "status", "username": "alice", "timestamp": 30}"#,
        )
        .unwrap();
        assert_eq!(cmd.command, "status");
        assert_eq!(cmd.timestamp, 30);
        assert!(cmd.filters.is_none());
    }

    #[test]
    fn search_command_with_filters() {
        let cmd: CommandInput = serde_json::from_str(
            r##"{
                "command": "search",
                "username": "alice",
                "timestamp": 10,
                "type": "song",
                "filters": {"name": "Stereo", "tags": ["#pop"]}
            }"##,
        )
        .unwrap();
        let filters = cmd.filters.unwrap();
        assert_eq!(filters.name.as_deref(), Some("Stereo"));
        assert_eq!(filters.tags, vec!["#pop".to_string()]);
    }

    #[test]
    fn library_file_with_missing_sections() {
        let lib: LibraryInput = serde_json::from_str(
            r#"{"songs": [{"name": "A", "duration": 100, "artist": "X"}]}"#,
        )
        .unwrap();
        assert!(lib.users.is_empty());
        assert_eq!(lib.songs.len(), 1);
        assert_eq!(lib.songs[0].duration, 100);
    }
}
