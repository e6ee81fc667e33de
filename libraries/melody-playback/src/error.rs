//! Error types for playback sessions

use std::time::Duration;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No current track and none given
    #[error("Nothing to play")]
    NothingToPlay,

    /// Navigation needs a loaded playlist
    #[error("No playlist loaded")]
    NoPlaylist,

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Speed must be finite and positive
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// Seek past the end of the current track
    #[error("Invalid seek position: {0:?}")]
    InvalidSeekPosition(Duration),

    /// Rejected equalizer band or gain
    #[error("Invalid equalizer setting: {0}")]
    InvalidEqualizer(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
