//! Power-up Effects
//!
//! Applies each power-up kind to a player and expires timed effects against
//! the logical clock.

use crate::game::events::{GameEvent, TimedEffect};
use crate::game::state::{Platform, PlayerSlot, PlayerState, PowerupType, WorldState};

/// Apply a power-up's effect to `slot`.
///
/// Timed effects expire `duration_ms` after the current clock; picking up
/// the same kind again restarts the countdown.
pub fn apply_powerup(state: &mut WorldState, slot: PlayerSlot, powerup_type: PowerupType, duration_ms: u64) {
    let expires_at = state.clock_ms.saturating_add(duration_ms);

    match powerup_type {
        PowerupType::Speed => {
            let player = state.player_mut(slot);
            player.speed = PlayerState::BOOSTED_SPEED;
            player.speed_expires_at = Some(expires_at);
        }
        PowerupType::Shield => {
            let player = state.player_mut(slot);
            player.shield = true;
            player.shield_expires_at = Some(expires_at);
        }
        PowerupType::Swap => {
            swap_positions(state);
        }
        PowerupType::Elevator => {
            let platforms = &state.platforms;
            let player = &mut state.players[slot.index()];
            elevate(player, platforms);
        }
        PowerupType::Reversal => {
            state.player_mut(slot).reversal = true;
        }
    }
}

/// Exchange the two players' positions exactly. Velocities stay put.
pub fn swap_positions(state: &mut WorldState) {
    let [one, two] = &mut state.players;
    std::mem::swap(&mut one.position, &mut two.position);
}

/// Nearest platform whose top lies strictly above `y`.
pub fn nearest_platform_above(platforms: &[Platform], y: f32) -> Option<&Platform> {
    let mut above: Vec<&Platform> = platforms.iter().filter(|p| p.y < y).collect();
    above.sort_by(|a, b| b.y.total_cmp(&a.y));
    above.first().copied()
}

/// Lift a player onto the nearest platform above them.
///
/// The player lands resting on its surface with x pulled inside the
/// platform's extent. Returns false when there is nothing above.
pub fn elevate(player: &mut PlayerState, platforms: &[Platform]) -> bool {
    let Some(target) = nearest_platform_above(platforms, player.position.y) else {
        return false;
    };

    let max_x = (target.right() - PlayerState::SIZE).max(target.x);
    player.position.x = player.position.x.clamp(target.x, max_x);
    player.position.y = target.y - PlayerState::SIZE;
    player.velocity.y = 0.0;
    player.on_ground = true;
    true
}

/// Revert speed and shield effects whose expiry has passed.
pub fn expire_effects(state: &mut WorldState) {
    let now = state.clock_ms;
    let tick = state.tick;
    let mut expired: Vec<GameEvent> = Vec::new();

    for player in state.players.iter_mut() {
        if player.speed_expires_at.is_some_and(|t| now >= t) {
            player.speed = PlayerState::BASE_SPEED;
            player.speed_expires_at = None;
            expired.push(GameEvent::effect_expired(tick, player.slot, TimedEffect::Speed));
        }
        if player.shield_expires_at.is_some_and(|t| now >= t) {
            player.shield = false;
            player.shield_expires_at = None;
            expired.push(GameEvent::effect_expired(tick, player.slot, TimedEffect::Shield));
        }
    }

    for event in expired {
        state.push_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::state::WorldBounds;
    use crate::game::tick::RoundConfig;

    fn world() -> WorldState {
        WorldState::new(WorldBounds::new(800.0, 600.0), 7, &RoundConfig::default())
    }

    #[test]
    fn test_speed_boost_and_expiry() {
        let mut state = world();
        state.clock_ms = 1000;

        apply_powerup(&mut state, PlayerSlot::One, PowerupType::Speed, 5000);
        assert_eq!(state.player(PlayerSlot::One).speed, PlayerState::BOOSTED_SPEED);

        state.clock_ms = 5999;
        expire_effects(&mut state);
        assert_eq!(state.player(PlayerSlot::One).speed, PlayerState::BOOSTED_SPEED);

        state.clock_ms = 6000;
        expire_effects(&mut state);
        assert_eq!(state.player(PlayerSlot::One).speed, PlayerState::BASE_SPEED);
        assert_eq!(state.take_events().len(), 1);
    }

    #[test]
    fn test_reapply_resets_expiry() {
        let mut state = world();

        apply_powerup(&mut state, PlayerSlot::Two, PowerupType::Shield, 5000);
        state.clock_ms = 4000;
        apply_powerup(&mut state, PlayerSlot::Two, PowerupType::Shield, 5000);

        state.clock_ms = 5000;
        expire_effects(&mut state);
        assert!(state.player(PlayerSlot::Two).shield, "second pickup extends shield");

        state.clock_ms = 9000;
        expire_effects(&mut state);
        assert!(!state.player(PlayerSlot::Two).shield);
    }

    #[test]
    fn test_swap_exchanges_positions_only() {
        let mut state = world();
        let p1 = state.player(PlayerSlot::One).position;
        let p2 = state.player(PlayerSlot::Two).position;

        apply_powerup(&mut state, PlayerSlot::One, PowerupType::Swap, 5000);

        assert_eq!(state.player(PlayerSlot::One).position, p2);
        assert_eq!(state.player(PlayerSlot::Two).position, p1);
        assert!(state.player(PlayerSlot::Two).tagger, "swap does not move the tag");
    }

    #[test]
    fn test_elevator_nearest_above() {
        let mut state = world();
        // Standing on the ground under the (100, 450) ledge
        state.player_mut(PlayerSlot::One).position = Vec2::new(120.0, 540.0);

        apply_powerup(&mut state, PlayerSlot::One, PowerupType::Elevator, 5000);

        let player = state.player(PlayerSlot::One);
        assert_eq!(player.position.y, 450.0 - PlayerState::SIZE);
        assert_eq!(player.position.x, 120.0);
        assert!(player.on_ground);
    }

    #[test]
    fn test_elevator_pulls_x_onto_platform() {
        let platforms = vec![Platform::new(300.0, 400.0, 180.0)];
        let mut player = PlayerState::new(PlayerSlot::One, Vec2::new(700.0, 500.0), false);

        assert!(elevate(&mut player, &platforms));
        assert_eq!(player.position, Vec2::new(450.0, 370.0));
    }

    #[test]
    fn test_elevator_nothing_above() {
        let mut state = world();
        state.player_mut(PlayerSlot::One).position = Vec2::new(400.0, 50.0);
        let before = state.player(PlayerSlot::One).position;

        apply_powerup(&mut state, PlayerSlot::One, PowerupType::Elevator, 5000);

        assert_eq!(state.player(PlayerSlot::One).position, before);
    }

    #[test]
    fn test_reversal_sets_flag() {
        let mut state = world();
        apply_powerup(&mut state, PlayerSlot::Two, PowerupType::Reversal, 5000);
        assert!(state.player(PlayerSlot::Two).reversal);
        assert_eq!(state.player(PlayerSlot::Two).speed_expires_at, None);
    }
}
