//! Core types for playback sessions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Position reset, nothing advancing
    #[default]
    Stopped,

    /// Position advancing with wall time
    Playing,

    /// Position frozen mid-track
    Paused,
}

impl PlaybackState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the playlist ends
    #[default]
    #[serde(rename = "none")]
    Off,

    /// Loop current track only
    #[serde(rename = "one")]
    One,

    /// Wrap to the start of the playlist
    #[serde(rename = "all")]
    All,
}

impl RepeatMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "none",
            Self::One => "one",
            Self::All => "all",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::Off),
            "one" => Some(Self::One),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Initial volume in [0, 1] (default: 0.8)
    pub volume: f64,

    /// Initial speed multiplier (default: 1.0)
    pub speed: f64,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: none)
    pub repeat: RepeatMode,

    /// Fixed seed for shuffle picks; random when absent
    pub seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            volume: 0.8,
            speed: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_size, 50);
        assert_eq!(config.volume, 0.8);
        assert_eq!(config.speed, 1.0);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(config.seed.is_none());
    }

    #[test]
    fn repeat_mode_tokens() {
        for mode in [RepeatMode::Off, RepeatMode::One, RepeatMode::All] {
            assert_eq!(RepeatMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::from_str("shuffle"), None);
        assert_eq!(RepeatMode::Off.to_string(), "none");
    }

    #[test]
    fn default_state_is_stopped() {
        assert_eq!(PlaybackState::default(), PlaybackState::Stopped);
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
    }
}
