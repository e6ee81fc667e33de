//! Melody - Playback Sessions
//!
//! A single-user music player over the domain model in `melody-core`.
//!
//! This crate provides:
//! - Play / pause / stop state machine with speed-scaled position
//! - Playlist navigation with shuffle and repeat modes (none, one, all)
//! - Bounded playback history for "previous"
//! - Volume, speed and equalizer settings
//!
//! Wall time comes from a [`Clock`], so position accounting can be driven
//! deterministically with [`ManualClock`].
//!
//! # Example
//!
//! ```rust
//! use melody_core::{CollectionId, ContentId, ContentInfo, PersonId, Playlist, Track, TrackGenre};
//! use melody_playback::{PlaybackConfig, PlaybackSession, PlaybackState, RepeatMode};
//! use std::time::Duration;
//!
//! let info = ContentInfo::new(
//!     ContentId::new("track_001"),
//!     "Thunder Road",
//!     Duration::from_secs(75),
//!     PersonId::new("artist_001"),
//! )?;
//! let track = Track::new(info, vec![TrackGenre::Rock])?;
//! let playlist = Playlist::new(
//!     CollectionId::new("playlist_001"),
//!     "My Favs",
//!     PersonId::new("user_001"),
//!     vec![track],
//! )?;
//!
//! let mut session = PlaybackSession::new(PersonId::new("user_001"), PlaybackConfig::default());
//! session.load_playlist(playlist);
//! session.set_repeat(RepeatMode::Off);
//!
//! session.next_track().ok();
//! assert_eq!(session.get_state(), PlaybackState::Playing);
//!
//! // Only one track and repeat is off: playback stops
//! session.next_track().ok();
//! assert_eq!(session.get_state(), PlaybackState::Stopped);
//! # Ok::<(), melody_core::MelodyError>(())
//! ```

#![forbid(unsafe_code)]

pub mod clock;
mod error;
mod history;
mod session;
pub mod types;

// Public exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PlaybackError, Result};
pub use history::History;
pub use session::PlaybackSession;
pub use types::{PlaybackConfig, PlaybackState, RepeatMode};
