//! Catalog registry
//!
//! One explicitly constructed `Catalog` value holds every user, library
//! track and collection. It is passed by reference wherever it is needed;
//! there is no process-wide singleton. The playback engine only ever holds
//! ids into the catalog, so external mutation (playlist edits, deletions)
//! is observable on its next access.

use crate::error::{CoreError, Result};
use crate::types::{Collection, CollectionId, CollectionKind, Track, TrackId, User, Username};
use tracing::debug;

/// Registry of users, library tracks and collections.
///
/// Entries keep insertion order, which search results and rendering depend
/// on. Lookups scan; catalog sizes in this simulator make an index
/// pointless.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    users: Vec<User>,
    library: Vec<Track>,
    collections: Vec<Collection>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    // --- users ---

    /// Register a user; usernames are unique
    pub fn add_user(&mut self, user: User) -> Result<()> {
        if self.user(&user.username).is_some() {
            return Err(CoreError::duplicate(user.username.to_string()));
        }
        self.users.push(user);
        Ok(())
    }

    /// Look up a user by name
    pub fn user(&self, username: &Username) -> Option<&User> {
        self.users.iter().find(|u| &u.username == username)
    }

    /// Remove a user, returning it
    pub fn remove_user(&mut self, username: &Username) -> Result<User> {
        let index = self
            .users
            .iter()
            .position(|u| &u.username == username)
            .ok_or_else(|| CoreError::UserNotFound(username.clone()))?;
        Ok(self.users.remove(index))
    }

    /// All users, in insertion order
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    // --- library tracks ---

    /// Add a standalone track to the library
    pub fn add_track(&mut self, track: Track) {
        self.library.push(track);
    }

    /// Look up a library track by id
    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.library.iter().find(|t| &t.id == id)
    }

    /// Look up a library track by exact name (first match)
    pub fn track_by_name(&self, name: &str) -> Option<&Track> {
        self.library.iter().find(|t| t.name == name)
    }

    /// Remove a library track, returning it.
    ///
    /// Callers must notify any playback engine so dependent sessions stop.
    pub fn remove_track(&mut self, id: &TrackId) -> Result<Track> {
        let index = self
            .library
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| CoreError::TrackNotFound(id.clone()))?;
        let track = self.library.remove(index);
        debug!(track = %track.name, "removed library track");
        Ok(track)
    }

    /// All library tracks, in insertion order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.library.iter()
    }

    // --- collections ---

    /// Register a collection; names are unique within a kind
    pub fn add_collection(&mut self, collection: Collection) -> Result<()> {
        if self
            .collection_by_name(collection.kind, &collection.name)
            .is_some()
        {
            return Err(CoreError::duplicate(format!(
                "{} {:?}",
                collection.kind.as_str(),
                collection.name
            )));
        }
        self.collections.push(collection);
        Ok(())
    }

    /// Look up a collection by id
    pub fn collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections.iter().find(|c| &c.id == id)
    }

    /// Mutable collection lookup, for playlist edits
    pub fn collection_mut(&mut self, id: &CollectionId) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| &c.id == id)
    }

    /// Look up a collection by kind and exact name (first match)
    pub fn collection_by_name(&self, kind: CollectionKind, name: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|c| c.kind == kind && c.name == name)
    }

    /// Remove a collection, returning it.
    ///
    /// Callers must notify any playback engine so dependent sessions stop.
    pub fn remove_collection(&mut self, id: &CollectionId) -> Result<Collection> {
        let index = self
            .collections
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| CoreError::CollectionNotFound(id.clone()))?;
        let collection = self.collections.remove(index);
        debug!(
            kind = collection.kind.as_str(),
            name = %collection.name,
            "removed collection"
        );
        Ok(collection)
    }

    /// All collections, in insertion order
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    /// Collections of one kind, in insertion order
    pub fn collections_of_kind(
        &self,
        kind: CollectionKind,
    ) -> impl Iterator<Item = &Collection> {
        self.collections.iter().filter(move |c| c.kind == kind)
    }
}
