//! Domain types for the Airwaves catalog

mod collection;
mod ids;
mod track;
mod user;

pub use collection::{Collection, CollectionKind};
pub use ids::{CollectionId, TrackId, Username};
pub use track::{Track, TrackMeta};
pub use user::User;
