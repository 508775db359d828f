//! Command dispatch
//!
//! The `Simulator` owns one catalog, one playback engine and one search bar
//! per user. Each command carries a timestamp; the engine is advanced to
//! that timestamp before the command itself runs, so playback progresses
//! purely as a function of the command stream.

use std::collections::HashMap;
use std::time::Duration;

use airwaves_core::{
    Catalog, Collection, CollectionId, CollectionKind, SearchBar, SearchKind, SearchTarget, Track,
    TrackId, TrackMeta, User, Username,
};
use airwaves_playback::{PlaybackEngine, PlaybackError, SourceKind};
use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info};

use crate::input::{CommandInput, LibraryInput, SongInput};
use crate::output;

/// The whole simulated service
#[derive(Debug, Default)]
pub struct Simulator {
    catalog: Catalog,
    engine: PlaybackEngine,
    search_bars: HashMap<Username, SearchBar>,
}

impl Simulator {
    /// Build a simulator from a parsed library file
    pub fn from_library(library: LibraryInput) -> anyhow::Result<Self> {
        let mut catalog = Catalog::new();

        for user in library.users {
            catalog
                .add_user(User::new(user.username.as_str(), user.age, user.city))
                .context("registering user")?;
        }
        for song in library.songs {
            catalog.add_track(song_to_track(song)?);
        }
        for podcast in library.podcasts {
            let mut episodes = Vec::with_capacity(podcast.episodes.len());
            for episode in podcast.episodes {
                let meta = TrackMeta {
                    description: episode.description,
                    ..TrackMeta::new()
                };
                episodes.push(
                    Track::with_meta(episode.name, Duration::from_secs(episode.duration), meta)
                        .context("building podcast episode")?,
                );
            }
            catalog
                .add_collection(Collection::with_tracks(
                    podcast.name,
                    Username::from(podcast.owner),
                    CollectionKind::Podcast,
                    episodes,
                ))
                .context("registering podcast")?;
        }
        for album in library.albums {
            let mut songs = Vec::with_capacity(album.songs.len());
            for song in album.songs {
                songs.push(song_to_track(song)?);
            }
            catalog
                .add_collection(Collection::with_tracks(
                    album.name,
                    Username::from(album.owner),
                    CollectionKind::Album,
                    songs,
                ))
                .context("registering album")?;
        }

        info!(
            users = catalog.users().count(),
            songs = catalog.tracks().count(),
            collections = catalog.collections().count(),
            "catalog loaded"
        );
        Ok(Self {
            catalog,
            engine: PlaybackEngine::default(),
            search_bars: HashMap::new(),
        })
    }

    /// Run a full command stream, collecting one output object per command
    pub fn run(&mut self, commands: Vec<CommandInput>) -> Vec<Value> {
        commands.iter().map(|cmd| self.process(cmd)).collect()
    }

    /// Advance playback to the command's timestamp, then execute it
    pub fn process(&mut self, cmd: &CommandInput) -> Value {
        self.engine.advance_all(&self.catalog, cmd.timestamp);
        debug!(command = %cmd.command, timestamp = cmd.timestamp, "dispatching");

        let out = match cmd.command.as_str() {
            "search" => self.search(cmd),
            "select" => self.select(cmd),
            "load" => self.load(cmd),
            "playPause" => self.play_pause(cmd),
            "status" => output::stats(cmd, &self.engine.status(&self.catalog, &username(cmd))),
            "repeat" => self.repeat(cmd),
            "shuffle" => self.shuffle(cmd),
            "next" => self.next(cmd),
            "prev" => self.prev(cmd),
            "createPlaylist" => self.create_playlist(cmd),
            "addRemoveInPlaylist" => self.add_remove_in_playlist(cmd),
            "deleteCollection" => self.delete_collection(cmd),
            other => output::message(cmd, output::unknown_command(other)),
        };

        for event in self.engine.drain_events() {
            info!(?event, "playback event");
        }
        out
    }

    fn search(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        let Some(kind) = cmd.kind.as_deref().and_then(search_kind) else {
            return output::results(cmd, "Search returned 0 results", Vec::new());
        };
        let filters = cmd.filters.clone().unwrap_or_default();

        // A new search discards whatever was loaded for this user
        self.engine.remove_session(&user);
        let bar = self.search_bars.entry(user).or_default();
        let hits = bar.search(&self.catalog, kind, &filters);
        let names: Vec<String> = hits.iter().map(|h| h.name.clone()).collect();
        output::results(
            cmd,
            format!("Search returned {} results", names.len()),
            names,
        )
    }

    fn select(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        let Some(bar) = self.search_bars.get_mut(&user) else {
            return output::message(cmd, output::need_search());
        };
        if !bar.has_searched() {
            return output::message(cmd, output::need_search());
        }
        match bar.select(cmd.item_number.unwrap_or(0)) {
            Some(hit) => {
                let name = hit.name.clone();
                output::message(cmd, output::selected(&name))
            }
            None => output::message(cmd, output::selection_too_high()),
        }
    }

    fn load(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        let Some(target) = self
            .search_bars
            .get(&user)
            .and_then(SearchBar::selected)
            .map(|hit| hit.target.clone())
        else {
            return output::message(cmd, output::load_needs_selection());
        };

        let loaded = match &target {
            SearchTarget::Song(id) => self.engine.load_track(&self.catalog, &user, id),
            SearchTarget::Collection(_, id) => {
                self.engine.load_collection(&self.catalog, &user, id)
            }
        };
        match loaded {
            Ok(_) => {
                if let Some(bar) = self.search_bars.get_mut(&user) {
                    bar.clear_selection();
                }
                output::message(cmd, output::loaded())
            }
            Err(PlaybackError::EmptySource) => {
                output::message(cmd, output::load_empty_collection())
            }
            Err(_) => output::message(cmd, output::load_needs_selection()),
        }
    }

    fn play_pause(&mut self, cmd: &CommandInput) -> Value {
        match self.engine.play_pause(&username(cmd)) {
            Ok(state) => output::message(cmd, output::play_pause(state)),
            Err(_) => output::message(
                cmd,
                output::need_load("attempting to pause or resume playback"),
            ),
        }
    }

    fn repeat(&mut self, cmd: &CommandInput) -> Value {
        match self.engine.repeat(&username(cmd)) {
            Ok(mode) => output::message(cmd, output::repeat_changed(mode)),
            Err(_) => output::message(cmd, output::need_load("setting the repeat status")),
        }
    }

    fn shuffle(&mut self, cmd: &CommandInput) -> Value {
        let seed = cmd.seed.unwrap_or(0);
        match self.engine.shuffle(&self.catalog, &username(cmd), seed) {
            Ok(enabled) => output::message(cmd, output::shuffle_toggled(enabled)),
            Err(PlaybackError::ShuffleUnsupported) => {
                output::message(cmd, output::shuffle_unsupported())
            }
            Err(_) => output::message(cmd, output::need_load("using the shuffle function")),
        }
    }

    fn next(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        if self.engine.skip_next(&self.catalog, &user).is_err() {
            return output::message(cmd, output::need_load("skipping to the next track"));
        }
        // NoRepeat at the last track stops the session; the skip then has
        // nothing to land on.
        match self.engine.status(&self.catalog, &user).track_name {
            Some(name) => output::message(cmd, output::skipped_next(&name)),
            None => output::message(cmd, output::need_load("skipping to the next track")),
        }
    }

    fn prev(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        if self.engine.skip_prev(&self.catalog, &user).is_err() {
            return output::message(cmd, output::need_load("returning to the previous track"));
        }
        match self.engine.status(&self.catalog, &user).track_name {
            Some(name) => output::message(cmd, output::returned_prev(&name)),
            None => output::message(cmd, output::need_load("returning to the previous track")),
        }
    }

    fn create_playlist(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        let Some(name) = cmd.playlist_name.as_deref() else {
            return output::message(cmd, output::playlist_missing());
        };
        if self
            .catalog
            .collection_by_name(CollectionKind::Playlist, name)
            .is_some()
        {
            return output::message(cmd, output::playlist_name_taken());
        }
        let playlist = Collection::new(name, user, CollectionKind::Playlist);
        match self.catalog.add_collection(playlist) {
            Ok(()) => output::message(cmd, output::playlist_created()),
            Err(_) => output::message(cmd, output::playlist_name_taken()),
        }
    }

    fn add_remove_in_playlist(&mut self, cmd: &CommandInput) -> Value {
        let user = username(cmd);
        let Some(track_id) = self.engine.current_track_id(&self.catalog, &user) else {
            return output::message(
                cmd,
                output::need_load("adding to or removing from the playlist"),
            );
        };
        if self.engine.source_kind(&user) == Some(SourceKind::Podcast) {
            return output::message(cmd, output::source_not_a_song());
        }

        let playlist_id = self
            .user_playlist_id(&user, cmd.playlist_id.unwrap_or(0))
            .cloned();
        let Some(playlist_id) = playlist_id else {
            return output::message(cmd, output::playlist_missing());
        };

        // Clone the track out of the catalog before the mutable borrow of
        // the target playlist.
        let Some(track) = self.find_track(&track_id) else {
            return output::message(
                cmd,
                output::need_load("adding to or removing from the playlist"),
            );
        };
        let Some(playlist) = self.catalog.collection_mut(&playlist_id) else {
            return output::message(cmd, output::playlist_missing());
        };
        if playlist.remove_track(&track_id).is_some() {
            output::message(cmd, output::playlist_removed())
        } else {
            playlist.add_track(track);
            output::message(cmd, output::playlist_added())
        }
    }

    fn delete_collection(&mut self, cmd: &CommandInput) -> Value {
        let Some(kind) = cmd.kind.as_deref().and_then(collection_kind) else {
            return output::message(cmd, output::collection_missing("The collection"));
        };
        let name = cmd.name.as_deref().unwrap_or_default();
        let Some(id) = self
            .catalog
            .collection_by_name(kind, name)
            .map(|c| c.id.clone())
        else {
            return output::message(cmd, output::collection_missing(name));
        };
        // Stop dependent sessions before the entity disappears
        self.engine.collection_removed(&id);
        match self.catalog.remove_collection(&id) {
            Ok(removed) => output::message(cmd, output::collection_deleted(&removed.name)),
            Err(_) => output::message(cmd, output::collection_missing(name)),
        }
    }

    /// Resolve a 1-based playlist index into a user's playlists, in
    /// creation order
    fn user_playlist_id(&self, user: &Username, item_number: usize) -> Option<&CollectionId> {
        if item_number == 0 {
            return None;
        }
        self.catalog
            .collections_of_kind(CollectionKind::Playlist)
            .filter(|c| &c.owner == user)
            .nth(item_number - 1)
            .map(|c| &c.id)
    }

    /// Find a track by identity anywhere in the catalog
    fn find_track(&self, id: &TrackId) -> Option<Track> {
        if let Some(track) = self.catalog.track(id) {
            return Some(track.clone());
        }
        self.catalog.collections().find_map(|c| {
            c.position_of(id)
                .and_then(|index| c.track_at(index))
                .cloned()
        })
    }

    /// Read-only catalog access, for assertions and rendering
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

fn song_to_track(song: SongInput) -> anyhow::Result<Track> {
    let meta = TrackMeta {
        artist: song.artist,
        album: song.album,
        genre: song.genre,
        tags: song.tags,
        release_year: song.release_year,
        description: None,
    };
    Track::with_meta(song.name, Duration::from_secs(song.duration), meta)
        .context("building song")
}

fn username(cmd: &CommandInput) -> Username {
    Username::from(cmd.username.clone().unwrap_or_default())
}

fn search_kind(raw: &str) -> Option<SearchKind> {
    match raw {
        "song" => Some(SearchKind::Song),
        "album" => Some(SearchKind::Album),
        "playlist" => Some(SearchKind::Playlist),
        "podcast" => Some(SearchKind::Podcast),
        _ => None,
    }
}

fn collection_kind(raw: &str) -> Option<CollectionKind> {
    match raw {
        "album" => Some(CollectionKind::Album),
        "playlist" => Some(CollectionKind::Playlist),
        "podcast" => Some(CollectionKind::Podcast),
        _ => None,
    }
}
