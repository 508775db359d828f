//! Airwaves Core
//!
//! Catalog domain for the Airwaves streaming-service simulator: tracks,
//! collections (albums, playlists, podcasts), users, the registry that
//! holds them, and search filtering over it.
//!
//! The registry is an explicitly constructed [`Catalog`] value, passed by
//! reference into collaborators such as the playback engine; there is no
//! global state.
//!
//! # Example
//!
//! ```rust
//! use airwaves_core::{Catalog, Collection, CollectionKind, Track, User, Username};
//! use std::time::Duration;
//!
//! let mut catalog = Catalog::new();
//! catalog.add_user(User::new("alice", 23, "Bucharest")).unwrap();
//!
//! let track = Track::new("Stereo Love", Duration::from_secs(213)).unwrap();
//! catalog.add_track(track.clone());
//!
//! let album = Collection::with_tracks(
//!     "Singles",
//!     Username::new("edward_maya"),
//!     CollectionKind::Album,
//!     vec![track],
//! );
//! catalog.add_collection(album).unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{CoreError, Result};
pub use search::{Filters, SearchBar, SearchHit, SearchKind, SearchTarget, MAX_RESULTS};
pub use types::{Collection, CollectionId, CollectionKind, Track, TrackId, TrackMeta, User, Username};
