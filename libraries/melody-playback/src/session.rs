//! Playback session - the player state machine
//!
//! A session belongs to one user and plays tracks from an optional loaded
//! playlist. Position is accumulated from wall time scaled by the playback
//! speed whenever the session leaves the playing state.

use crate::{
    clock::{Clock, SystemClock},
    error::{PlaybackError, Result},
    history::History,
    types::{PlaybackConfig, PlaybackState, RepeatMode},
};
use melody_core::{PersonId, Playlist, Track};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Music player owned by a single user
#[derive(Debug)]
pub struct PlaybackSession {
    id: String,
    owner_id: PersonId,

    state: PlaybackState,
    current_track: Option<Track>,
    /// Index of `current_track` inside `playlist`, when it is there
    current_index: Option<usize>,
    playlist: Option<Playlist>,
    history: History,

    volume: f64,
    /// Position accumulated up to `started_at`
    position: Duration,
    /// Set only while playing
    started_at: Option<Instant>,

    shuffle: bool,
    repeat: RepeatMode,
    speed: f64,
    equalizer: BTreeMap<String, f64>,

    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl PlaybackSession {
    /// Create a session on the system clock
    pub fn new(owner_id: PersonId, config: PlaybackConfig) -> Self {
        Self::with_clock(owner_id, config, SystemClock)
    }

    /// Create a session driven by `clock`
    pub fn with_clock(owner_id: PersonId, config: PlaybackConfig, clock: impl Clock + 'static) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let speed = if is_valid_speed(config.speed) {
            config.speed
        } else {
            warn!(speed = config.speed, "Invalid configured speed, using 1.0");
            1.0
        };

        let mut session = Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            state: PlaybackState::Stopped,
            current_track: None,
            current_index: None,
            playlist: None,
            history: History::new(config.history_size),
            volume: 0.0,
            position: Duration::ZERO,
            started_at: None,
            shuffle: config.shuffle,
            repeat: config.repeat,
            speed,
            equalizer: BTreeMap::new(),
            clock: Box::new(clock),
            rng,
        };
        session.set_volume(config.volume);
        session
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// An explicit track becomes current and starts from zero. Without one,
    /// a paused session resumes, a stopped session restarts its current
    /// track and a playing session is left alone.
    pub fn play(&mut self, track: Option<Track>) -> Result<()> {
        if let Some(track) = track {
            debug!(track = %track.info().id(), "Playing explicit track");
            self.current_index = self.index_in_playlist(&track);
            self.current_track = Some(track);
            self.start_from(Duration::ZERO);
            return Ok(());
        }

        if self.current_track.is_none() {
            debug!("Play requested with nothing to play");
            return Err(PlaybackError::NothingToPlay);
        }

        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Paused | PlaybackState::Stopped => {
                self.state = PlaybackState::Playing;
                self.started_at = Some(self.clock.now());
            }
        }
        Ok(())
    }

    /// Pause playback, folding elapsed time into the position
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.settle();
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback and rewind to zero
    ///
    /// The current track stays loaded.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position = Duration::ZERO;
        self.started_at = None;
    }

    /// Advance within the loaded playlist
    ///
    /// Shuffle picks a uniformly random index, then repeat-one overrides the
    /// pick back to the current track. Past the end, repeat-none stops
    /// playback on the current track and repeat-all wraps around.
    pub fn next_track(&mut self) -> Result<()> {
        let len = match &self.playlist {
            Some(playlist) if !playlist.is_empty() => playlist.len(),
            Some(_) => return Err(PlaybackError::NothingToPlay),
            None => return Err(PlaybackError::NoPlaylist),
        };

        let mut candidate = if self.shuffle {
            self.rng.gen_range(0..len)
        } else {
            self.current_index.map_or(0, |index| index + 1)
        };

        if self.repeat == RepeatMode::One {
            if let Some(current) = self.current_index {
                candidate = current;
            }
        }

        if Some(candidate) == self.current_index && self.repeat == RepeatMode::One {
            debug!(index = candidate, "Repeating current track");
            self.start_from(Duration::ZERO);
            return Ok(());
        }

        if candidate >= len {
            match self.repeat {
                RepeatMode::All => candidate %= len,
                RepeatMode::Off | RepeatMode::One => {
                    debug!("Reached end of playlist");
                    self.stop();
                    return Ok(());
                }
            }
        }

        self.advance_to(candidate);
        Ok(())
    }

    /// Step back to the previously played track
    ///
    /// Falls back to the preceding playlist entry (wrapping under
    /// repeat-all) and finally to restarting the current track.
    pub fn previous_track(&mut self) -> Result<()> {
        if let Some(track) = self.history.pop() {
            debug!(track = %track.info().id(), "Returning to track from history");
            self.current_index = self.index_in_playlist(&track);
            self.current_track = Some(track);
            self.start_from(Duration::ZERO);
            return Ok(());
        }

        let len = self.playlist.as_ref().map_or(0, |playlist| playlist.len());
        let previous = match self.current_index {
            Some(0) if self.repeat == RepeatMode::All && len > 0 => Some(len - 1),
            Some(index) if index > 0 => Some(index - 1),
            _ => None,
        };

        let target = previous.and_then(|index| {
            self.playlist
                .as_ref()
                .and_then(|playlist| playlist.contents().get(index))
                .cloned()
                .map(|track| (index, track))
        });

        match target {
            Some((index, track)) => {
                self.current_track = Some(track);
                self.current_index = Some(index);
            }
            None if self.current_track.is_none() => return Err(PlaybackError::NothingToPlay),
            None => debug!("Restarting current track"),
        }
        self.start_from(Duration::ZERO);
        Ok(())
    }

    // ===== Seek =====

    /// Jump to `position` within the current track
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let track = self
            .current_track
            .as_ref()
            .ok_or(PlaybackError::NoTrackLoaded)?;

        if position > track.info().duration() {
            return Err(PlaybackError::InvalidSeekPosition(position));
        }

        self.position = position;
        if self.state == PlaybackState::Playing {
            self.started_at = Some(self.clock.now());
        }
        Ok(())
    }

    // ===== Settings =====

    /// Set volume, clamped to [0, 1]
    ///
    /// NaN is ignored.
    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            warn!("Ignoring NaN volume");
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Set the speed multiplier; must be finite and positive
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !is_valid_speed(speed) {
            return Err(PlaybackError::InvalidSpeed(speed));
        }

        // Time played so far counts at the old speed
        if self.state == PlaybackState::Playing {
            self.settle();
            self.started_at = Some(self.clock.now());
        }
        self.speed = speed;
        Ok(())
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Replace the playlist navigated by next/previous
    pub fn load_playlist(&mut self, playlist: Playlist) {
        debug!(playlist = %playlist.id(), tracks = playlist.len(), "Loading playlist");
        self.playlist = Some(playlist);
        self.current_index = self
            .current_track
            .as_ref()
            .and_then(|track| self.index_in_playlist(track));
    }

    /// Set the gain of one equalizer band
    pub fn set_equalizer_band(&mut self, band: impl Into<String>, gain: f64) -> Result<()> {
        let band = band.into();
        if band.trim().is_empty() {
            return Err(PlaybackError::InvalidEqualizer("band name is empty".to_string()));
        }
        if !gain.is_finite() {
            return Err(PlaybackError::InvalidEqualizer(format!("gain {gain} for band {band}")));
        }
        self.equalizer.insert(band, gain);
        Ok(())
    }

    pub fn clear_equalizer(&mut self) {
        self.equalizer.clear();
    }

    // ===== State Queries =====

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_owner_id(&self) -> &PersonId {
        &self.owner_id
    }

    pub fn get_state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn get_current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn get_playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Current position, including time elapsed since playback started
    pub fn get_position(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.position.saturating_add(self.elapsed_since(started_at)),
            None => self.position,
        }
    }

    pub fn get_volume(&self) -> f64 {
        self.volume
    }

    pub fn get_speed(&self) -> f64 {
        self.speed
    }

    pub fn get_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn get_repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn get_equalizer(&self) -> &BTreeMap<String, f64> {
        &self.equalizer
    }

    pub fn get_equalizer_band(&self, band: &str) -> Option<f64> {
        self.equalizer.get(band).copied()
    }

    /// Previously played tracks, oldest first
    pub fn get_history(&self) -> Vec<&Track> {
        self.history.get_all()
    }

    // ===== Internals =====

    fn index_in_playlist(&self, track: &Track) -> Option<usize> {
        self.playlist.as_ref().and_then(|playlist| {
            playlist
                .contents()
                .iter()
                .position(|item| item.info().id() == track.info().id())
        })
    }

    fn advance_to(&mut self, index: usize) {
        let Some(track) = self
            .playlist
            .as_ref()
            .and_then(|playlist| playlist.contents().get(index))
            .cloned()
        else {
            return;
        };

        debug!(index, track = %track.info().id(), "Advancing to track");
        if let Some(previous) = self.current_track.replace(track) {
            self.history.push(previous);
        }
        self.current_index = Some(index);
        self.start_from(Duration::ZERO);
    }

    fn start_from(&mut self, position: Duration) {
        self.position = position;
        self.state = PlaybackState::Playing;
        self.started_at = Some(self.clock.now());
    }

    /// Fold time elapsed since `started_at` into `position`
    fn settle(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.position = self.position.saturating_add(self.elapsed_since(started_at));
        }
    }

    /// Wall time since `started_at` scaled by speed, saturating at `Duration::MAX`
    fn elapsed_since(&self, started_at: Instant) -> Duration {
        let wall = self.clock.now().saturating_duration_since(started_at);
        Duration::try_from_secs_f64(wall.as_secs_f64() * self.speed).unwrap_or(Duration::MAX)
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use melody_core::{CollectionId, ContentId, ContentInfo, TrackGenre};

    fn create_test_track(id: &str) -> Track {
        let info = ContentInfo::new(
            ContentId::new(id),
            format!("Track {id}"),
            Duration::from_secs(180),
            PersonId::new("artist"),
        )
        .unwrap();
        Track::new(info, vec![TrackGenre::Pop]).unwrap()
    }

    fn create_test_playlist(count: usize) -> Playlist {
        let tracks = (0..count).map(|i| create_test_track(&format!("t{i}"))).collect();
        Playlist::new(CollectionId::new("pl"), "Test", PersonId::new("user"), tracks).unwrap()
    }

    fn create_test_session() -> (PlaybackSession, ManualClock) {
        let clock = ManualClock::new();
        let config = PlaybackConfig {
            seed: Some(7),
            ..PlaybackConfig::default()
        };
        let session = PlaybackSession::with_clock(PersonId::new("user"), config, clock.clone());
        (session, clock)
    }

    fn current_id(session: &PlaybackSession) -> &str {
        session.get_current_track().unwrap().info().id().as_str()
    }

    #[test]
    fn new_session_is_stopped() {
        let (session, _) = create_test_session();
        assert_eq!(session.get_state(), PlaybackState::Stopped);
        assert_eq!(session.get_volume(), 0.8);
        assert_eq!(session.get_owner_id().as_str(), "user");
        assert!(!session.get_id().is_empty());
    }

    #[test]
    fn play_without_track_reports_nothing_to_play() {
        let (mut session, _) = create_test_session();
        assert!(matches!(session.play(None), Err(PlaybackError::NothingToPlay)));
        assert_eq!(session.get_state(), PlaybackState::Stopped);
    }

    #[test]
    fn pause_accumulates_scaled_time() {
        let (mut session, clock) = create_test_session();
        session.set_speed(2.0).unwrap();
        session.play(Some(create_test_track("a"))).unwrap();

        clock.advance(Duration::from_secs(3));
        session.pause();
        clock.advance(Duration::from_secs(10));

        assert_eq!(session.get_state(), PlaybackState::Paused);
        assert_eq!(session.get_position(), Duration::from_secs(6));
    }

    #[test]
    fn pause_only_from_playing() {
        let (mut session, _) = create_test_session();
        session.pause();
        assert_eq!(session.get_state(), PlaybackState::Stopped);
    }

    #[test]
    fn resume_continues_from_paused_position() {
        let (mut session, clock) = create_test_session();
        session.play(Some(create_test_track("a"))).unwrap();
        clock.advance(Duration::from_secs(4));
        session.pause();

        session.play(None).unwrap();
        clock.advance(Duration::from_secs(1));
        assert_eq!(session.get_position(), Duration::from_secs(5));
    }

    #[test]
    fn play_while_playing_is_noop() {
        let (mut session, clock) = create_test_session();
        session.play(Some(create_test_track("a"))).unwrap();
        clock.advance(Duration::from_secs(2));

        session.play(None).unwrap();
        assert_eq!(session.get_position(), Duration::from_secs(2));
    }

    #[test]
    fn stop_resets_position() {
        let (mut session, clock) = create_test_session();
        session.play(Some(create_test_track("a"))).unwrap();
        clock.advance(Duration::from_secs(30));
        session.stop();

        assert_eq!(session.get_position(), Duration::ZERO);
        assert_eq!(current_id(&session), "a");
    }

    #[test]
    fn next_requires_playlist() {
        let (mut session, _) = create_test_session();
        assert!(matches!(session.next_track(), Err(PlaybackError::NoPlaylist)));
    }

    #[test]
    fn next_advances_and_records_history() {
        let (mut session, _) = create_test_session();
        session.load_playlist(create_test_playlist(3));

        session.next_track().unwrap();
        assert_eq!(current_id(&session), "t0");
        assert!(session.get_history().is_empty());

        session.next_track().unwrap();
        assert_eq!(current_id(&session), "t1");
        assert_eq!(session.get_history().len(), 1);
    }

    #[test]
    fn end_of_playlist_stops_without_advancing() {
        let (mut session, _) = create_test_session();
        session.load_playlist(create_test_playlist(2));
        session.next_track().unwrap();
        session.next_track().unwrap();

        session.next_track().unwrap();
        assert_eq!(session.get_state(), PlaybackState::Stopped);
        assert_eq!(current_id(&session), "t1");
        assert_eq!(session.get_history().len(), 1);
    }

    #[test]
    fn repeat_all_wraps_to_start() {
        let (mut session, _) = create_test_session();
        session.set_repeat(RepeatMode::All);
        session.load_playlist(create_test_playlist(2));
        session.next_track().unwrap();
        session.next_track().unwrap();

        session.next_track().unwrap();
        assert_eq!(current_id(&session), "t0");
        assert!(session.is_playing());
    }

    #[test]
    fn repeat_one_overrides_shuffle_and_skips_history() {
        let (mut session, clock) = create_test_session();
        session.load_playlist(create_test_playlist(5));
        session.next_track().unwrap();
        session.set_repeat(RepeatMode::One);
        session.set_shuffle(true);
        clock.advance(Duration::from_secs(20));

        for _ in 0..10 {
            session.next_track().unwrap();
            assert_eq!(current_id(&session), "t0");
        }
        assert!(session.get_history().is_empty());
        assert_eq!(session.get_position(), Duration::ZERO);
    }

    #[test]
    fn shuffle_picks_from_playlist() {
        let (mut session, _) = create_test_session();
        session.set_shuffle(true);
        session.set_repeat(RepeatMode::All);
        session.load_playlist(create_test_playlist(4));

        for _ in 0..20 {
            session.next_track().unwrap();
            let id = current_id(&session);
            assert!(["t0", "t1", "t2", "t3"].contains(&id));
        }
    }

    #[test]
    fn previous_pops_history() {
        let (mut session, _) = create_test_session();
        session.load_playlist(create_test_playlist(3));
        session.next_track().unwrap();
        session.next_track().unwrap();

        session.previous_track().unwrap();
        assert_eq!(current_id(&session), "t0");
        assert!(session.get_history().is_empty());
    }

    #[test]
    fn previous_without_history_steps_back_or_restarts() {
        let (mut session, clock) = create_test_session();
        session.load_playlist(create_test_playlist(3));
        session.play(Some(create_test_track("t2"))).unwrap();

        session.previous_track().unwrap();
        assert_eq!(current_id(&session), "t1");

        session.play(Some(create_test_track("t0"))).unwrap();
        clock.advance(Duration::from_secs(9));
        session.previous_track().unwrap();
        assert_eq!(current_id(&session), "t0");
        assert_eq!(session.get_position(), Duration::ZERO);

        session.set_repeat(RepeatMode::All);
        session.previous_track().unwrap();
        assert_eq!(current_id(&session), "t2");
    }

    #[test]
    fn previous_with_nothing_loaded_fails() {
        let (mut session, _) = create_test_session();
        assert!(matches!(session.previous_track(), Err(PlaybackError::NothingToPlay)));
    }

    #[test]
    fn volume_is_clamped() {
        let (mut session, _) = create_test_session();
        session.set_volume(1.5);
        assert_eq!(session.get_volume(), 1.0);
        session.set_volume(-0.2);
        assert_eq!(session.get_volume(), 0.0);
        session.set_volume(f64::NAN);
        assert_eq!(session.get_volume(), 0.0);
    }

    #[test]
    fn invalid_speed_is_rejected() {
        let (mut session, _) = create_test_session();
        for speed in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(session.set_speed(speed), Err(PlaybackError::InvalidSpeed(_))));
        }
        assert_eq!(session.get_speed(), 1.0);
    }

    #[test]
    fn speed_change_keeps_elapsed_time() {
        let (mut session, clock) = create_test_session();
        session.play(Some(create_test_track("a"))).unwrap();
        clock.advance(Duration::from_secs(4));
        session.set_speed(0.5).unwrap();
        clock.advance(Duration::from_secs(4));

        assert_eq!(session.get_position(), Duration::from_secs(6));
    }

    #[test]
    fn huge_speed_saturates_position() {
        let (mut session, clock) = create_test_session();
        session.set_speed(1e20).unwrap();
        session.play(Some(create_test_track("a"))).unwrap();
        clock.advance(Duration::from_secs(1));

        assert_eq!(session.get_position(), Duration::MAX);
        session.pause();
        assert_eq!(session.get_position(), Duration::MAX);

        session.play(None).unwrap();
        clock.advance(Duration::from_secs(1));
        assert_eq!(session.get_position(), Duration::MAX);
        session.set_speed(f64::MAX).unwrap();
        clock.advance(Duration::from_secs(1));
        assert_eq!(session.get_position(), Duration::MAX);
    }

    #[test]
    fn seek_within_track() {
        let (mut session, _) = create_test_session();
        assert!(matches!(
            session.seek(Duration::from_secs(1)),
            Err(PlaybackError::NoTrackLoaded)
        ));

        session.play(Some(create_test_track("a"))).unwrap();
        session.seek(Duration::from_secs(90)).unwrap();
        assert_eq!(session.get_position(), Duration::from_secs(90));
        assert!(matches!(
            session.seek(Duration::from_secs(181)),
            Err(PlaybackError::InvalidSeekPosition(_))
        ));
    }

    #[test]
    fn equalizer_bands() {
        let (mut session, _) = create_test_session();
        session.set_equalizer_band("bass", 3.5).unwrap();
        session.set_equalizer_band("treble", -2.0).unwrap();
        session.set_equalizer_band("bass", 1.0).unwrap();

        assert_eq!(session.get_equalizer_band("bass"), Some(1.0));
        assert_eq!(session.get_equalizer().len(), 2);
        assert!(session.set_equalizer_band(" ", 1.0).is_err());
        assert!(session.set_equalizer_band("mid", f64::NAN).is_err());

        session.clear_equalizer();
        assert!(session.get_equalizer().is_empty());
    }

    #[test]
    fn loading_playlist_locates_current_track() {
        let (mut session, _) = create_test_session();
        session.play(Some(create_test_track("t1"))).unwrap();
        session.load_playlist(create_test_playlist(3));

        session.next_track().unwrap();
        assert_eq!(current_id(&session), "t2");
    }
}
