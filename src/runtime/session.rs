//! Round Session
//!
//! Owns one round: the world, the held-key state, the optional recorder and
//! the last HUD shown. Hosts feed it key events and elapsed time; each frame
//! comes back as a draw list plus HUD.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::input::{KeyBindings, KeyboardState};
use crate::game::replay::{RoundRecorder, RoundRecording};
use crate::game::state::{PlayerSlot, RoundPhase, WorldState};
use crate::game::tick::{tick, RoundConfig, TickResult};
use crate::render::{build_frame, Frame, Hud};

/// Session errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Input arrived after the timer ran out.
    #[error("Round is over")]
    RoundOver,

    /// Viewport resized to a degenerate size.
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },
}

/// Everything produced by one frame.
#[derive(Debug)]
pub struct FrameOutput {
    /// Simulation result
    pub result: TickResult,
    /// Draw list
    pub frame: Frame,
    /// HUD after this frame
    pub hud: Hud,
    /// HUD text differs from the previous frame
    pub hud_changed: bool,
}

/// A single round in progress.
pub struct RoundSession {
    state: WorldState,
    round: RoundConfig,
    bindings: KeyBindings,
    keyboard: KeyboardState,
    recorder: Option<RoundRecorder>,
    hud: Hud,
}

impl RoundSession {
    /// Start a round from configuration.
    pub fn new(config: &GameConfig) -> Self {
        let state = WorldState::new(config.world.bounds(), config.rng_seed, &config.round);
        let hud = Hud::from_state(&state);

        info!(
            "Round started: {}x{} seed {} ({} s)",
            config.world.width, config.world.height, config.rng_seed, config.round.round_seconds
        );

        Self {
            state,
            round: config.round.clone(),
            bindings: config.bindings.clone(),
            keyboard: KeyboardState::new(),
            recorder: None,
            hud,
        }
    }

    /// Start a round that records itself for replay.
    pub fn with_recording(config: &GameConfig) -> Self {
        let mut session = Self::new(config);
        session.recorder = Some(RoundRecorder::new(
            config.rng_seed,
            config.world.bounds(),
            config.round.clone(),
        ));
        session
    }

    /// Current world.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Latest HUD.
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Has the timer run out?
    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    /// Loser, once the round is over.
    pub fn loser(&self) -> Option<PlayerSlot> {
        match self.state.phase {
            RoundPhase::Ended { loser } => Some(loser),
            RoundPhase::Playing => None,
        }
    }

    /// Key pressed. Returns `Ok(false)` for keys no control is bound to.
    pub fn key_down(&mut self, key: &str) -> Result<bool, SessionError> {
        self.set_key(key, true)
    }

    /// Key released. Returns `Ok(false)` for keys no control is bound to.
    pub fn key_up(&mut self, key: &str) -> Result<bool, SessionError> {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, pressed: bool) -> Result<bool, SessionError> {
        if self.is_ended() {
            return Err(SessionError::RoundOver);
        }
        let bound = self.keyboard.set_key(&self.bindings, key, pressed);
        if !bound {
            debug!("Ignoring unbound key {:?}", key);
        }
        Ok(bound)
    }

    /// Release every held key.
    pub fn release_all(&mut self) {
        self.keyboard.release_all();
    }

    /// Viewport changed size. Platforms stay where they were generated.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SessionError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(SessionError::InvalidViewport { width, height });
        }
        if self.is_ended() {
            return Ok(());
        }

        self.state.resize(width, height);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record_resize(width, height);
        }
        debug!("Viewport resized to {}x{}", width, height);
        Ok(())
    }

    /// Run one frame with `elapsed_ms` of logical time.
    pub fn advance(&mut self, elapsed_ms: u64) -> FrameOutput {
        let was_ended = self.is_ended();
        let inputs = self.keyboard.sample();
        let result = tick(&mut self.state, &inputs, elapsed_ms, &self.round);

        if !was_ended {
            if let Some(recorder) = self.recorder.as_mut() {
                recorder.record_frame(&self.state, &inputs, elapsed_ms);
            }
        }

        let hud = Hud::from_state(&self.state);
        let hud_changed = hud != self.hud;
        self.hud = hud.clone();

        FrameOutput {
            result,
            frame: build_frame(&self.state),
            hud,
            hud_changed,
        }
    }

    /// Close the session, sealing the recording if one was kept.
    pub fn finish(self) -> (WorldState, Option<RoundRecording>) {
        let recording = self.recorder.map(|r| r.finish(&self.state));
        (self.state, recording)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::replay::replay;

    fn config() -> GameConfig {
        GameConfig {
            rng_seed: 31337,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_held_key_moves_player() {
        let mut session = RoundSession::new(&config());
        let start_x = session.state().player(PlayerSlot::One).position.x;

        assert_eq!(session.key_down("KeyD"), Ok(true));
        for _ in 0..5 {
            session.advance(16);
        }
        assert_eq!(session.key_up("KeyD"), Ok(true));
        session.advance(16);

        assert_eq!(session.state().player(PlayerSlot::One).position.x, start_x + 20.0);
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut session = RoundSession::new(&config());
        assert_eq!(session.key_down("KeyQ"), Ok(false));
    }

    #[test]
    fn test_input_after_end_rejected() {
        let mut cfg = config();
        cfg.round.round_seconds = 1;
        let mut session = RoundSession::new(&cfg);

        let output = session.advance(1000);
        assert!(output.result.round_ended);
        assert_eq!(output.hud.message.as_deref(), Some("Time's up! Green loses!"));
        assert_eq!(session.loser(), Some(PlayerSlot::Two));
        assert_eq!(session.key_down("KeyA"), Err(SessionError::RoundOver));
    }

    #[test]
    fn test_hud_changes_once_per_second() {
        let mut session = RoundSession::new(&config());

        let changes = (0..125).filter(|_| session.advance(16).hud_changed).count();

        // 2000 ms elapsed: two countdown steps
        assert_eq!(changes, 2);
        assert_eq!(session.hud().timer_text, "118");
    }

    #[test]
    fn test_resize_validation() {
        let mut session = RoundSession::new(&config());
        let platforms = session.state().platforms.clone();

        assert!(session.resize(0.0, 600.0).is_err());
        session.resize(1280.0, 720.0).unwrap();

        assert_eq!(session.state().bounds.width, 1280.0);
        assert_eq!(session.state().platforms, platforms);
        assert_eq!(session.advance(16).frame.width, 1280.0);
    }

    #[test]
    fn test_recorded_session_replays() {
        let mut session = RoundSession::with_recording(&config());
        for t in 0..900u32 {
            if t % 100 == 0 {
                session.key_down("KeyD").unwrap();
                session.key_down("ArrowUp").unwrap();
            }
            if t % 100 == 50 {
                session.key_up("KeyD").unwrap();
                session.key_up("ArrowUp").unwrap();
            }
            if t == 400 {
                session.resize(1000.0, 700.0).unwrap();
            }
            session.advance(16 + (t % 3) as u64);
        }

        let (live, recording) = session.finish();
        let recording = recording.unwrap();
        assert_eq!(recording.frame_count(), 900);
        assert_eq!(replay(&recording).unwrap().compute_hash(), live.compute_hash());
    }
}
