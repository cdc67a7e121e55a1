//! # Tag Arena
//!
//! Deterministic two-player platform tag. One player is "it"; touching the
//! other passes the tag. Power-ups, teleport orbs and time reversal shake
//! things up, and whoever holds the tag when the clock runs out loses.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TAG ARENA                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── vec2.rs     - 2D vector                                │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG          │
//! │  └── hash.rs     - State hashing for verification           │
//! │                                                             │
//! │  game/           - Round simulation (deterministic)         │
//! │  ├── state.rs    - World, players, platforms, pickups       │
//! │  ├── tick.rs     - Per-frame orchestrator                   │
//! │  ├── physics.rs  - Gravity, landing, clamping               │
//! │  ├── tag.rs      - Tag arbitration with cooldown            │
//! │  ├── powerup.rs  - Power-up spawning and pickup             │
//! │  ├── orb.rs      - Teleport orbs                            │
//! │  ├── history.rs  - Position history for reversal            │
//! │  ├── schedule.rs - Logical-clock intervals                  │
//! │  └── replay.rs   - Recording and verification               │
//! │                                                             │
//! │  render/         - Draw lists and HUD                       │
//! │  runtime/        - Session and tokio frame driver           │
//! │  config.rs       - JSON configuration                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Given the same seed, per-frame inputs and per-frame elapsed time, the
//! simulation produces identical state hashes:
//! - All randomness from seeded Xorshift128+
//! - Timers run on a logical clock advanced by the caller
//! - Fixed iteration order (slot order, spawn order)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod render;
pub mod runtime;
pub mod config;

// Re-export commonly used types
pub use crate::core::vec2::Vec2;
pub use crate::core::rng::DeterministicRng;
pub use config::{ConfigError, GameConfig};
pub use game::input::{InputFrame, KeyBindings, PlayerInputs};
pub use game::state::{PlayerSlot, PlayerState, WorldState};
pub use game::tick::{tick, RoundConfig, TickResult};
pub use runtime::{RealtimeDriver, RoundSession};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate (Hz)
pub const TICK_RATE: u32 = 60;
