mod ids;

// People
mod admin;
mod artist;
mod person;
mod user;

// Content
mod chapter;
mod content;
mod genre;
mod track;

// Collections
mod album;
mod audiobook;
mod collection;
mod playlist;

pub use admin::Admin;
pub use album::Album;
pub use artist::{Artist, Release};
pub use audiobook::AudioBook;
pub use chapter::AudioBookChapter;
pub use collection::{Collection, CollectionItem};
pub use content::{Content, ContentInfo};
pub use genre::{AudioBookGenre, Permission, TrackGenre};
pub use ids::{CollectionId, ContentId, PersonId};
pub use person::{Person, PersonInfo};
pub use playlist::Playlist;
pub use track::Track;
pub use user::User;
