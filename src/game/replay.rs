//! Round Recording and Replay
//!
//! Records everything needed to re-simulate a round bit-for-bit: the seed,
//! the initial bounds and config, delta-compressed inputs per player, the
//! elapsed time of every frame and any viewport resizes. State hashes are
//! checkpointed periodically so a replay can pinpoint the first divergent
//! tick.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::hash::StateHash;
use crate::game::input::{PlayerInputBuffer, PlayerInputs};
use crate::game::state::{PlayerSlot, WorldBounds, WorldState};
use crate::game::tick::{tick, RoundConfig};

/// Current recording format version.
pub const RECORDING_VERSION: u8 = 1;

/// Checkpoint interval in ticks (every 10 seconds at 60 Hz).
pub const CHECKPOINT_INTERVAL: u32 = 600;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Recording could not be parsed or written
    #[error("Recording JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Recording was produced by an incompatible version
    #[error("Unsupported recording version {0}")]
    UnsupportedVersion(u8),

    /// Re-simulation diverged at a checkpoint
    #[error("State hash mismatch at tick {tick}: expected {expected}, got {actual}")]
    CheckpointMismatch {
        /// Checkpoint tick
        tick: u32,
        /// Recorded hash (hex)
        expected: String,
        /// Re-simulated hash (hex)
        actual: String,
    },

    /// Re-simulation diverged at the end of the recording
    #[error("Final state hash mismatch: expected {expected}, got {actual}")]
    FinalHashMismatch {
        /// Recorded hash (hex)
        expected: String,
        /// Re-simulated hash (hex)
        actual: String,
    },
}

/// Viewport resize applied before a tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResizeRecord {
    /// Tick the new bounds first apply to
    pub tick: u32,
    /// New width
    pub width: f32,
    /// New height
    pub height: f32,
}

/// State checkpoint for partial verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCheckpoint {
    /// Tick number
    pub tick: u32,
    /// State hash after the tick
    pub state_hash: StateHash,
}

/// Complete round recording.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundRecording {
    /// Format version
    pub version: u8,
    /// RNG seed
    pub rng_seed: u64,
    /// Bounds at world generation
    pub bounds: WorldBounds,
    /// Round rules in force
    pub config: RoundConfig,
    /// Per-slot input deltas
    pub inputs: [PlayerInputBuffer; 2],
    /// Elapsed logical time for each simulated frame, in order
    pub elapsed_ms: Vec<u64>,
    /// Viewport resizes in tick order
    pub resizes: Vec<ResizeRecord>,
    /// Periodic state hashes
    pub checkpoints: Vec<StateCheckpoint>,
    /// Hash after the last recorded frame
    pub final_hash: StateHash,
}

impl RoundRecording {
    /// Number of simulated frames.
    pub fn frame_count(&self) -> u32 {
        self.elapsed_ms.len() as u32
    }

    /// Fresh world matching the recording's starting conditions.
    pub fn initial_state(&self) -> WorldState {
        WorldState::new(self.bounds, self.rng_seed, &self.config)
    }

    /// Inputs both players held during `tick`.
    pub fn inputs_at(&self, tick: u32) -> PlayerInputs {
        PlayerSlot::ALL.map(|slot| self.inputs[slot.index()].get_input_at(tick))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(data: &str) -> Result<Self, ReplayError> {
        let recording: Self = serde_json::from_str(data)?;
        if recording.version != RECORDING_VERSION {
            return Err(ReplayError::UnsupportedVersion(recording.version));
        }
        Ok(recording)
    }
}

/// Builds a `RoundRecording` frame by frame alongside a live round.
#[derive(Clone, Debug)]
pub struct RoundRecorder {
    recording: RoundRecording,
}

impl RoundRecorder {
    /// Start recording a round generated from these parameters.
    pub fn new(rng_seed: u64, bounds: WorldBounds, config: RoundConfig) -> Self {
        Self {
            recording: RoundRecording {
                version: RECORDING_VERSION,
                rng_seed,
                bounds,
                config,
                inputs: PlayerSlot::ALL.map(PlayerInputBuffer::new),
                elapsed_ms: Vec::new(),
                resizes: Vec::new(),
                checkpoints: Vec::new(),
                final_hash: [0; 32],
            },
        }
    }

    /// Record a resize that takes effect from the next frame.
    pub fn record_resize(&mut self, width: f32, height: f32) {
        let tick = self.recording.frame_count() + 1;
        self.recording.resizes.push(ResizeRecord { tick, width, height });
    }

    /// Record one simulated frame, checkpointing the resulting state.
    ///
    /// Call only for frames that advanced the simulation.
    pub fn record_frame(&mut self, state: &WorldState, inputs: &PlayerInputs, elapsed_ms: u64) {
        for slot in PlayerSlot::ALL {
            self.recording.inputs[slot.index()].record(state.tick, inputs[slot.index()]);
        }
        self.recording.elapsed_ms.push(elapsed_ms);

        if state.tick % CHECKPOINT_INTERVAL == 0 {
            self.recording.checkpoints.push(StateCheckpoint {
                tick: state.tick,
                state_hash: state.compute_hash(),
            });
        }
    }

    /// Frames recorded so far.
    pub fn frame_count(&self) -> u32 {
        self.recording.frame_count()
    }

    /// Seal the recording with the final state hash.
    pub fn finish(mut self, state: &WorldState) -> RoundRecording {
        self.recording.final_hash = state.compute_hash();
        self.recording
    }
}

/// Re-simulate a recording, verifying every checkpoint and the final hash.
///
/// Returns the re-simulated final state.
pub fn replay(recording: &RoundRecording) -> Result<WorldState, ReplayError> {
    let mut state = recording.initial_state();
    let mut resizes = recording.resizes.iter().peekable();
    let mut checkpoints = recording.checkpoints.iter().peekable();

    for (i, elapsed) in recording.elapsed_ms.iter().enumerate() {
        let tick_no = i as u32 + 1;

        while let Some(resize) = resizes.next_if(|r| r.tick <= tick_no) {
            state.resize(resize.width, resize.height);
        }

        let inputs = recording.inputs_at(tick_no);
        tick(&mut state, &inputs, *elapsed, &recording.config);

        if let Some(checkpoint) = checkpoints.next_if(|c| c.tick == state.tick) {
            let actual = state.compute_hash();
            if actual != checkpoint.state_hash {
                warn!("Replay diverged at tick {}", checkpoint.tick);
                return Err(ReplayError::CheckpointMismatch {
                    tick: checkpoint.tick,
                    expected: hex::encode(checkpoint.state_hash),
                    actual: hex::encode(actual),
                });
            }
            debug!("Checkpoint {} verified", checkpoint.tick);
        }
    }

    let actual = state.compute_hash();
    if actual != recording.final_hash {
        return Err(ReplayError::FinalHashMismatch {
            expected: hex::encode(recording.final_hash),
            actual: hex::encode(actual),
        });
    }

    Ok(state)
}
