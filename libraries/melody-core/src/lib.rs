//! Melody Core
//!
//! Domain model and tree serialization contract for Melody.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: people (`User`, `Artist`, `Admin`), content (`Track`,
//!   `AudioBookChapter`) and collections (`Album`, `Playlist`, `AudioBook`)
//! - **Serialization Contract**: `Serializable` converts entities to and from a
//!   format-neutral [`Tree`]; `TaggedUnion` handles polymorphic lists
//! - **Library Index**: id-keyed storage resolving cross references
//! - **Error Handling**: Unified `MelodyError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use melody_core::types::{Album, ContentInfo, Track, TrackGenre};
//! use melody_core::types::{CollectionId, ContentId, PersonId};
//! use melody_core::Serializable;
//! use std::time::Duration;
//!
//! let info = ContentInfo::new(
//!     ContentId::new("track_001"),
//!     "Opening",
//!     Duration::from_secs(200),
//!     PersonId::new("artist_001"),
//! )?;
//! let track = Track::new(info, vec![TrackGenre::Rock])?;
//!
//! let album = Album::new(
//!     CollectionId::new("album_001"),
//!     "Debut",
//!     PersonId::new("artist_001"),
//!     vec![track],
//! )?;
//!
//! let tree = album.serialize();
//! assert_eq!(Album::deserialize(&tree)?, album);
//! # Ok::<(), melody_core::MelodyError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod library;
pub mod tagged;
pub mod tree;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use error::{MelodyError, Result};
pub use library::{CollectionRef, Library, Record};
pub use tagged::{Candidate, TaggedUnion};
pub use tree::{Serializable, Tagged, Tree};

pub use types::{
    // People
    Admin, Artist, Permission, Person, PersonInfo, User,
    // Content
    AudioBookChapter, AudioBookGenre, Content, ContentInfo, Track, TrackGenre,
    // Collections
    Album, AudioBook, Collection, CollectionItem, Playlist, Release,
    // Identifiers
    CollectionId, ContentId, PersonId,
};
