//! Teleport Orbs
//!
//! Orbs spawn as two linked endpoints. A player whose center comes within
//! trigger range of one endpoint is moved to the other. There is no
//! re-trigger cooldown: a player left inside range of the arrival endpoint
//! bounces back on the next tick.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::collision::{touched_endpoint, OrbEndpoint};
use crate::game::events::GameEvent;
use crate::game::state::{OrbColor, PlayerSlot, WorldState};

/// Configuration for orb spawning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbSpawnConfig {
    /// Milliseconds between spawns
    pub interval_ms: u64,
}

impl Default for OrbSpawnConfig {
    fn default() -> Self {
        Self { interval_ms: 8_000 }
    }
}

/// Spawn one orb with two independent endpoints anywhere in the world.
pub fn spawn_orb(state: &mut WorldState) -> u32 {
    let (w, h) = (state.bounds.width, state.bounds.height);
    let a = state.rng.random_point(w, h);
    let b = state.rng.random_point(w, h);
    let color = state
        .rng
        .choose(&OrbColor::PALETTE)
        .copied()
        .unwrap_or(OrbColor::Purple);

    let id = state.spawn_orb(a, b, color);
    debug!("Spawned {:?} orb #{} linking {:?} <-> {:?}", color, id, a, b);
    state.push_event(GameEvent::orb_spawned(state.tick, id, a, b));
    id
}

/// Teleport players touching an orb endpoint.
///
/// Orbs are visited in spawn order and players in slot order; a player moved
/// by one orb is tested against later orbs at the new position.
pub fn resolve_teleports(state: &mut WorldState) -> usize {
    let mut moves: usize = 0;

    for orb_idx in 0..state.orbs.len() {
        for slot in PlayerSlot::ALL {
            let orb = &state.orbs[orb_idx];
            let player = &state.players[slot.index()];

            let destination: Vec2 = match touched_endpoint(player, orb) {
                Some(OrbEndpoint::A) => orb.b,
                Some(OrbEndpoint::B) => orb.a,
                None => continue,
            };
            let orb_id = orb.id;
            let from = player.position;

            state.player_mut(slot).position = destination;
            state.push_event(GameEvent::teleported(state.tick, slot, orb_id, from, destination));
            moves += 1;
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{PlayerState, WorldBounds};
    use crate::game::tick::RoundConfig;

    fn world() -> WorldState {
        WorldState::new(WorldBounds::new(800.0, 600.0), 42, &RoundConfig::default())
    }

    /// Put a player's center exactly on `point`.
    fn center_on(state: &mut WorldState, slot: PlayerSlot, point: Vec2) {
        let half = PlayerState::SIZE / 2.0;
        state.player_mut(slot).position = Vec2::new(point.x - half, point.y - half);
    }

    #[test]
    fn test_orb_symmetry() {
        let a = Vec2::new(200.0, 200.0);
        let b = Vec2::new(600.0, 100.0);

        let mut state = world();
        state.spawn_orb(a, b, OrbColor::Red);
        center_on(&mut state, PlayerSlot::One, a);
        resolve_teleports(&mut state);
        assert_eq!(state.player(PlayerSlot::One).position, b);

        let mut state = world();
        state.spawn_orb(a, b, OrbColor::Red);
        center_on(&mut state, PlayerSlot::One, b);
        resolve_teleports(&mut state);
        assert_eq!(state.player(PlayerSlot::One).position, a);
    }

    #[test]
    fn test_out_of_range_untouched() {
        let mut state = world();
        state.spawn_orb(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0), OrbColor::Blue);
        let before = state.players.clone();

        assert_eq!(resolve_teleports(&mut state), 0);
        assert_eq!(state.players[0].position, before[0].position);
        assert_eq!(state.players[1].position, before[1].position);
    }

    #[test]
    fn test_both_players_teleport() {
        let a = Vec2::new(200.0, 200.0);
        let b = Vec2::new(600.0, 100.0);
        let mut state = world();
        state.spawn_orb(a, b, OrbColor::Green);
        center_on(&mut state, PlayerSlot::One, a);
        center_on(&mut state, PlayerSlot::Two, b);

        assert_eq!(resolve_teleports(&mut state), 2);
        assert_eq!(state.player(PlayerSlot::One).position, b);
        assert_eq!(state.player(PlayerSlot::Two).position, a);
        assert_eq!(state.take_events().len(), 2);
    }

    #[test]
    fn test_no_bounce_until_reentry() {
        let a = Vec2::new(200.0, 200.0);
        let b = Vec2::new(600.0, 100.0);
        let mut state = world();
        state.spawn_orb(a, b, OrbColor::Orange);
        center_on(&mut state, PlayerSlot::One, a);

        assert_eq!(resolve_teleports(&mut state), 1);
        assert_eq!(state.player(PlayerSlot::One).position, b);

        // Arrival puts the corner on the endpoint, just outside its trigger
        assert_eq!(resolve_teleports(&mut state), 0);

        center_on(&mut state, PlayerSlot::One, b);
        assert_eq!(resolve_teleports(&mut state), 1);
        assert_eq!(state.player(PlayerSlot::One).position, a);
    }

    #[test]
    fn test_spawn_within_world() {
        let mut state = world();
        for _ in 0..100 {
            spawn_orb(&mut state);
        }
        for orb in &state.orbs {
            for p in [orb.a, orb.b] {
                assert!(p.x >= 0.0 && p.x < 800.0);
                assert!(p.y >= 0.0 && p.y < 600.0);
            }
        }
    }
}
