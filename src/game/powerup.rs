//! Power-up Spawning and Collection
//!
//! Deterministic power-up spawning from the world RNG, and pickup resolution
//! with deferred removal so each power-up is consumed at most once.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::game::collision::check_powerup_collision;
use crate::game::effects::apply_powerup;
use crate::game::events::GameEvent;
use crate::game::state::{PlayerSlot, PowerupState, PowerupType, WorldState};

/// Configuration for power-up spawning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupSpawnConfig {
    /// Milliseconds between spawns
    pub interval_ms: u64,
    /// Band above the bottom of the world kept free of spawns
    pub bottom_margin: f32,
}

impl Default for PowerupSpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
            bottom_margin: 100.0,
        }
    }
}

/// Spawn one power-up at a random position with a uniform random type.
///
/// x is drawn from [0, width - 20), y from [0, height - margin).
pub fn spawn_powerup(state: &mut WorldState, config: &PowerupSpawnConfig) -> u32 {
    let max_x = state.bounds.width - PowerupState::SIZE;
    let max_y = state.bounds.height - config.bottom_margin;
    let position = state.rng.random_point(max_x, max_y);
    let powerup_type = random_powerup_type(&mut state.rng);

    let id = state.spawn_powerup(position, powerup_type);
    debug!("Spawned {:?} power-up #{} at {:?}", powerup_type, id, position);
    state.push_event(GameEvent::powerup_spawned(state.tick, id, powerup_type, position));
    id
}

/// Uniform draw over all five kinds.
fn random_powerup_type(rng: &mut DeterministicRng) -> PowerupType {
    rng.choose(&PowerupType::ALL)
        .copied()
        .unwrap_or(PowerupType::Speed)
}

/// Resolve pickups for all active power-ups.
///
/// Power-ups are visited in spawn order; players in slot order. The first
/// overlapping player takes the effect and the power-up is marked consumed,
/// so a second player cannot also resolve it. Consumed entries are compacted
/// after the pass.
pub fn resolve_pickups(state: &mut WorldState, effect_duration_ms: u64) -> Vec<(PlayerSlot, u32)> {
    let mut collected = Vec::new();

    for idx in 0..state.powerups.len() {
        let taker = PlayerSlot::ALL
            .into_iter()
            .find(|slot| check_powerup_collision(state.player(*slot), &state.powerups[idx]));

        let Some(slot) = taker else {
            continue;
        };

        let (id, powerup_type) = {
            let powerup = &mut state.powerups[idx];
            powerup.consumed = true;
            (powerup.id, powerup.powerup_type)
        };

        apply_powerup(state, slot, powerup_type, effect_duration_ms);
        state.push_event(GameEvent::powerup_collected(state.tick, slot, id, powerup_type));
        collected.push((slot, id));
    }

    state.powerups.retain(|p| !p.consumed);
    collected
}
