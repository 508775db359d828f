/// User domain type
use crate::types::Username;
use serde::{Deserialize, Serialize};

/// A catalog user who can own playlists and drive a playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique username
    pub username: Username,

    /// User age
    pub age: u32,

    /// Home city
    pub city: String,
}

impl User {
    /// Create a new user
    pub fn new(username: impl Into<Username>, age: u32, city: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            age,
            city: city.into(),
        }
    }
}
