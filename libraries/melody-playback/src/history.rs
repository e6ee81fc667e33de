//! Playback history tracking
//!
//! Bounded stack of previously played tracks for "previous" navigation

use melody_core::Track;
use std::collections::VecDeque;

/// Playback history with bounded size
///
/// Oldest entries are discarded once `max_size` is reached.
#[derive(Debug, Clone)]
pub struct History {
    /// Most recent at the back
    tracks: VecDeque<Track>,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    pub fn push(&mut self, track: Track) {
        if self.max_size == 0 {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track);
    }

    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_back()
    }

    /// Oldest first
    pub fn get_all(&self) -> Vec<&Track> {
        self.tracks.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}
