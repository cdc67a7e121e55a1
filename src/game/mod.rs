//! Game Logic Module
//!
//! All round simulation code. Deterministic given a seed, the per-frame
//! inputs and the per-frame elapsed time.
//!
//! ## Module Structure
//!
//! - `input`: Key bindings, held-key sampling, input recording
//! - `state`: World state, players, platforms, power-ups, orbs
//! - `tick`: Per-frame orchestrator
//! - `physics`: Gravity, landing, clamping
//! - `collision`: Overlap and proximity tests
//! - `history`: Position history for reversal
//! - `schedule`: Logical-clock intervals
//! - `powerup` / `effects`: Power-up spawning and effects
//! - `orb`: Teleport orbs
//! - `tag`: Tag arbitration
//! - `replay`: Round recordings and verification
//! - `events`: Game events for logging, rendering and replay

pub mod input;
pub mod state;
pub mod tick;
pub mod physics;
pub mod collision;
pub mod history;
pub mod map;
pub mod schedule;
pub mod powerup;
pub mod effects;
pub mod orb;
pub mod tag;
pub mod replay;
pub mod events;

// Re-export key types
pub use input::{InputFrame, KeyBindings, KeyboardState, PlayerInputBuffer, PlayerInputs};
pub use state::{PlayerSlot, PlayerState, PowerupType, RoundPhase, WorldBounds, WorldState};
pub use tick::{tick, RoundConfig, TickResult};
pub use events::{GameEvent, GameEventData};
pub use replay::{RoundRecorder, RoundRecording};
