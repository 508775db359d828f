//! Catalog search and filtering
//!
//! Filter-per-function style over catalog entries, with a per-user
//! `SearchBar` holding the last result list and selection. Results are
//! capped at [`MAX_RESULTS`].

use crate::catalog::Catalog;
use crate::types::{CollectionId, CollectionKind, TrackId};
use serde::{Deserialize, Serialize};

/// Maximum number of search results returned
pub const MAX_RESULTS: usize = 5;

/// What a search query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Song,
    Album,
    Playlist,
    Podcast,
}

/// Search filters; absent fields do not constrain the result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Name prefix, case-insensitive
    pub name: Option<String>,

    /// Exact owner username
    pub owner: Option<String>,

    /// Genre, case-insensitive exact match
    pub genre: Option<String>,

    /// Tags that must all be present
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One search result, ready for selection and loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Display name
    pub name: String,

    /// What the hit points at
    pub target: SearchTarget,
}

/// The catalog entity behind a search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchTarget {
    /// A library song
    Song(TrackId),

    /// An album, playlist or podcast
    Collection(CollectionKind, CollectionId),
}

fn name_matches(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn genre_matches(genre: Option<&str>, wanted: &str) -> bool {
    genre.is_some_and(|g| g.eq_ignore_ascii_case(wanted))
}

fn tags_match(tags: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|w| tags.iter().any(|t| t == w))
}

/// Run a search over the catalog, capped at [`MAX_RESULTS`]
pub fn search(catalog: &Catalog, kind: SearchKind, filters: &Filters) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = match kind {
        SearchKind::Song => catalog
            .tracks()
            .filter(|t| {
                filters.name.as_deref().map_or(true, |n| name_matches(&t.name, n))
            })
            .filter(|t| {
                filters.genre.as_deref().map_or(true, |g| {
                    genre_matches(t.meta.as_ref().and_then(|m| m.genre.as_deref()), g)
                })
            })
            .filter(|t| {
                filters.tags.is_empty()
                    || t.meta
                        .as_ref()
                        .is_some_and(|m| tags_match(&m.tags, &filters.tags))
            })
            .filter(|t| {
                filters.owner.as_deref().map_or(true, |o| {
                    t.meta
                        .as_ref()
                        .and_then(|m| m.artist.as_deref())
                        .is_some_and(|a| a == o)
                })
            })
            .map(|t| SearchHit {
                name: t.name.clone(),
                target: SearchTarget::Song(t.id.clone()),
            })
            .collect(),
        SearchKind::Album | SearchKind::Playlist | SearchKind::Podcast => {
            let collection_kind = match kind {
                SearchKind::Album => CollectionKind::Album,
                SearchKind::Playlist => CollectionKind::Playlist,
                _ => CollectionKind::Podcast,
            };
            catalog
                .collections_of_kind(collection_kind)
                .filter(|c| {
                    filters.name.as_deref().map_or(true, |n| name_matches(&c.name, n))
                })
                .filter(|c| {
                    filters
                        .owner
                        .as_deref()
                        .map_or(true, |o| c.owner.as_str() == o)
                })
                .map(|c| SearchHit {
                    name: c.name.clone(),
                    target: SearchTarget::Collection(c.kind, c.id.clone()),
                })
                .collect()
        }
    };
    hits.truncate(MAX_RESULTS);
    hits
}

/// Per-user search state: last result list and last selection.
///
/// A new search clears any previous selection; `select` uses the 1-based
/// item numbers shown to the user.
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    results: Vec<SearchHit>,
    selected: Option<SearchHit>,
    searched: bool,
}

impl SearchBar {
    /// Create an empty search bar
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search, replacing previous results and clearing the selection
    pub fn search(&mut self, catalog: &Catalog, kind: SearchKind, filters: &Filters) -> &[SearchHit] {
        self.results = search(catalog, kind, filters);
        self.selected = None;
        self.searched = true;
        &self.results
    }

    /// Whether any search has run yet; selection before that is an error
    /// distinct from an out-of-range item number
    pub fn has_searched(&self) -> bool {
        self.searched
    }

    /// Select a result by 1-based item number
    pub fn select(&mut self, item_number: usize) -> Option<&SearchHit> {
        if item_number == 0 || item_number > self.results.len() {
            self.selected = None;
            return None;
        }
        self.selected = Some(self.results[item_number - 1].clone());
        self.selected.as_ref()
    }

    /// The current selection, if any
    pub fn selected(&self) -> Option<&SearchHit> {
        self.selected.as_ref()
    }

    /// Drop the selection (consumed by a successful load)
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
