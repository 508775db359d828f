//! Airwaves Playback
//!
//! The per-user playback simulation engine for Airwaves. No real audio and
//! no real clock: every state change is a function of elapsed simulated
//! time, delivered as discrete timestamps by a command-processing
//! collaborator.
//!
//! This crate provides:
//! - Four source kinds (library track, album, playlist, podcast) behind
//!   one session type
//! - Repeat modes in two families (collection and single-track)
//! - Deterministic seeded shuffle with the playing track pinned first
//! - A completion policy that lets one large time delta span several
//!   short tracks
//! - Recovery from catalog deletions and playlist edits made out from
//!   under a session
//!
//! # Example
//!
//! ```rust
//! use airwaves_core::{Catalog, Collection, CollectionKind, Track, Username};
//! use airwaves_playback::{PlaybackConfig, PlaybackEngine, PlaybackState};
//! use std::time::Duration;
//!
//! let mut catalog = Catalog::new();
//! let album = Collection::with_tracks(
//!     "Singles",
//!     Username::new("artist"),
//!     CollectionKind::Album,
//!     vec![
//!         Track::new("A", Duration::from_secs(200)).unwrap(),
//!         Track::new("B", Duration::from_secs(100)).unwrap(),
//!     ],
//! );
//! let album_id = album.id.clone();
//! catalog.add_collection(album).unwrap();
//!
//! let mut engine = PlaybackEngine::new(PlaybackConfig::default());
//! let alice = Username::new("alice");
//! engine.load_collection(&catalog, &alice, &album_id).unwrap();
//!
//! engine.advance_all(&catalog, 250);
//! let status = engine.status(&catalog, &alice);
//! assert_eq!(status.state, PlaybackState::Playing);
//! assert_eq!(status.track_name.as_deref(), Some("B"));
//! assert_eq!(status.remaining, Duration::from_secs(50));
//! ```

#![forbid(unsafe_code)]

mod engine;
mod error;
mod events;
mod shuffle;
mod source;
pub mod types;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use types::{PlaybackConfig, PlaybackState, PlaybackStatus, RepeatMode, SourceKind};
