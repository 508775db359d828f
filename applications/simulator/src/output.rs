//! Response shaping
//!
//! Every command answers with a JSON object echoing the command, user and
//! timestamp. Human-readable message strings live here and nowhere else;
//! the engine and catalog speak typed values only.

use airwaves_playback::{PlaybackState, PlaybackStatus, RepeatMode};
use serde_json::{json, Value};

use crate::input::CommandInput;

/// Envelope with a `message` field
pub fn message(cmd: &CommandInput, text: impl Into<String>) -> Value {
    json!({
        "command": cmd.command,
        "user": cmd.username,
        "timestamp": cmd.timestamp,
        "message": text.into(),
    })
}

/// Envelope with a `results` name list (search)
pub fn results(cmd: &CommandInput, text: impl Into<String>, names: Vec<String>) -> Value {
    json!({
        "command": cmd.command,
        "user": cmd.username,
        "timestamp": cmd.timestamp,
        "message": text.into(),
        "results": names,
    })
}

/// Envelope with a `stats` playback snapshot (status)
pub fn stats(cmd: &CommandInput, status: &PlaybackStatus) -> Value {
    json!({
        "command": cmd.command,
        "user": cmd.username,
        "timestamp": cmd.timestamp,
        "stats": {
            "name": status.track_name.clone().unwrap_or_default(),
            "remainedTime": status.remaining.as_secs(),
            "repeat": status.repeat.to_string(),
            "shuffle": status.shuffle,
            "paused": status.state != PlaybackState::Playing,
        },
    })
}

pub fn loaded() -> String {
    "Playback loaded successfully.".into()
}

pub fn load_needs_selection() -> String {
    "Please select a source before attempting to load.".into()
}

pub fn load_empty_collection() -> String {
    "You can't load an empty audio collection!".into()
}

pub fn play_pause(state: PlaybackState) -> String {
    match state {
        PlaybackState::Paused => "Playback paused successfully.".into(),
        _ => "Playback resumed successfully.".into(),
    }
}

pub fn need_load(action: &str) -> String {
    format!("Please load a source before {action}.")
}

pub fn repeat_changed(mode: RepeatMode) -> String {
    format!("Repeat mode changed to {}.", mode.to_string().to_lowercase())
}

pub fn shuffle_toggled(enabled: bool) -> String {
    if enabled {
        "Shuffle function activated successfully.".into()
    } else {
        "Shuffle function deactivated successfully.".into()
    }
}

pub fn shuffle_unsupported() -> String {
    "The loaded source is not a playlist or an album.".into()
}

pub fn skipped_next(track: &str) -> String {
    format!("Skipped to next track successfully. The current track is {track}.")
}

pub fn returned_prev(track: &str) -> String {
    format!("Returned to previous track successfully. The current track is {track}.")
}

pub fn need_search() -> String {
    "Please conduct a search before making a selection.".into()
}

pub fn selection_too_high() -> String {
    "The selected ID is too high.".into()
}

pub fn selected(name: &str) -> String {
    format!("Successfully selected {name}.")
}

pub fn playlist_created() -> String {
    "Playlist created successfully.".into()
}

pub fn playlist_name_taken() -> String {
    "A playlist with the same name already exists.".into()
}

pub fn playlist_missing() -> String {
    "The specified playlist does not exist.".into()
}

pub fn playlist_added() -> String {
    "Successfully added to playlist.".into()
}

pub fn playlist_removed() -> String {
    "Successfully removed from playlist.".into()
}

pub fn source_not_a_song() -> String {
    "The loaded source is not a song.".into()
}

pub fn collection_deleted(name: &str) -> String {
    format!("{name} was successfully deleted.")
}

pub fn collection_missing(name: &str) -> String {
    format!("{name} does not exist.")
}

pub fn unknown_command(command: &str) -> String {
    format!("Unknown command {command}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cmd() -> CommandInput {
        serde_json::from_str(r#"{"command": "status", "username": "alice", "timestamp": 5}"#)
            .unwrap()
    }

    #[test]
    fn stats_for_stopped_session_uses_empty_name() {
        let out = stats(&cmd(), &PlaybackStatus::stopped());
        assert_eq!(out["stats"]["name"], "");
        assert_eq!(out["stats"]["remainedTime"], 0);
        assert_eq!(out["stats"]["paused"], true);
    }

    #[test]
    fn stats_reports_remaining_seconds() {
        let status = PlaybackStatus {
            state: PlaybackState::Playing,
            track_name: Some("Stereo Hearts".into()),
            remaining: Duration::from_secs(42),
            repeat: RepeatMode::NoRepeat,
            shuffle: false,
        };
        let out = stats(&cmd(), &status);
        assert_eq!(out["stats"]["name"], "Stereo Hearts");
        assert_eq!(out["stats"]["remainedTime"], 42);
        assert_eq!(out["stats"]["repeat"], "No Repeat");
        assert_eq!(out["stats"]["paused"], false);
    }
}
