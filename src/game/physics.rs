//! Platform Physics
//!
//! One fixed step of player motion: input to velocity, gravity, Euler
//! integration, platform landing and world clamping.

use crate::game::input::InputFrame;
use crate::game::state::{Platform, PlayerState, WorldBounds};

/// Downward acceleration per tick. No terminal velocity.
pub const GRAVITY: f32 = 0.5;

/// Apply held input to velocity and integrate gravity.
pub fn apply_input(player: &mut PlayerState, input: InputFrame) {
    player.velocity.x = input.horizontal() * player.speed;
    player.velocity.y += GRAVITY;

    if input.jump_held() && player.on_ground {
        player.velocity.y = PlayerState::JUMP_IMPULSE;
        player.on_ground = false;
    }
}

/// Euler step: position += velocity.
#[inline]
pub fn integrate(player: &mut PlayerState) {
    player.position.x += player.velocity.x;
    player.position.y += player.velocity.y;
}

/// Check whether a player lands on a platform this tick.
///
/// Horizontal extents overlap, the bottom edge sits less than one platform
/// thickness below the top surface, and the projected bottom reaches it.
pub fn lands_on(player: &PlayerState, platform: &Platform) -> bool {
    let bottom = player.bottom();
    player.bounds().overlaps_x(&platform.bounds())
        && bottom < platform.y + Platform::HEIGHT
        && bottom + player.velocity.y >= platform.y
}

/// Resolve landings against all platforms.
///
/// When several platforms qualify in the same tick the highest surface
/// wins. Returns the index of the platform landed on.
pub fn resolve_platforms(player: &mut PlayerState, platforms: &[Platform]) -> Option<usize> {
    player.on_ground = false;

    let probe: &PlayerState = player;
    let landed = platforms
        .iter()
        .enumerate()
        .filter(|(_, platform)| lands_on(probe, platform))
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
        .map(|(idx, platform)| (idx, platform.y));

    if let Some((_, top)) = landed {
        player.position.y = top - PlayerState::SIZE;
        player.velocity.y = 0.0;
        player.on_ground = true;
    }

    landed.map(|(idx, _)| idx)
}

/// Keep the player inside the world.
///
/// x is clamped on both sides; y only at the bottom.
pub fn clamp_to_bounds(player: &mut PlayerState, bounds: WorldBounds) {
    let max_x = (bounds.width - PlayerState::SIZE).max(0.0);
    player.position.x = player.position.x.clamp(0.0, max_x);
    player.position.y = player.position.y.min(bounds.height - PlayerState::SIZE);
}

/// Run one full physics step for a player.
pub fn step_player(
    player: &mut PlayerState,
    input: InputFrame,
    platforms: &[Platform],
    bounds: WorldBounds,
) {
    apply_input(player, input);
    integrate(player);
    resolve_platforms(player, platforms);
    clamp_to_bounds(player, bounds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::map::generate_platforms;
    use crate::game::state::PlayerSlot;
    use proptest::prelude::*;

    const BOUNDS: WorldBounds = WorldBounds::new(800.0, 600.0);

    fn resting_player(x: f32) -> (PlayerState, Vec<Platform>) {
        let platforms = generate_platforms(BOUNDS);
        let ground_y = platforms[0].y;
        let mut player = PlayerState::new(PlayerSlot::One, Vec2::new(x, ground_y - PlayerState::SIZE), false);
        player.on_ground = true;
        (player, platforms)
    }

    #[test]
    fn test_hold_right_ten_ticks() {
        let (mut player, platforms) = resting_player(100.0);
        let start_y = player.position.y;
        let input = InputFrame::new().with_right(true);

        for _ in 0..10 {
            step_player(&mut player, input, &platforms, BOUNDS);
        }

        assert_eq!(player.position.x, 100.0 + PlayerState::BASE_SPEED * 10.0);
        assert_eq!(player.position.y, start_y);
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.on_ground);
    }

    #[test]
    fn test_right_overrides_left() {
        let (mut player, platforms) = resting_player(100.0);
        let input = InputFrame::new().with_left(true).with_right(true);

        step_player(&mut player, input, &platforms, BOUNDS);

        assert_eq!(player.velocity.x, PlayerState::BASE_SPEED);
    }

    #[test]
    fn test_jump_requires_ground() {
        let (mut player, platforms) = resting_player(700.0);
        let jump = InputFrame::new().with_jump(true);

        step_player(&mut player, jump, &platforms, BOUNDS);
        assert!(!player.on_ground);
        assert_eq!(player.velocity.y, PlayerState::JUMP_IMPULSE);

        // Holding jump mid-air only accumulates gravity
        step_player(&mut player, jump, &platforms, BOUNDS);
        assert_eq!(player.velocity.y, PlayerState::JUMP_IMPULSE + GRAVITY);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let (mut player, platforms) = resting_player(700.0);
        let start_y = player.position.y;

        step_player(&mut player, InputFrame::new().with_jump(true), &platforms, BOUNDS);
        for _ in 0..100 {
            step_player(&mut player, InputFrame::new(), &platforms, BOUNDS);
        }

        assert!(player.on_ground);
        assert_eq!(player.position.y, start_y);
    }

    #[test]
    fn test_highest_platform_wins() {
        let platforms = vec![Platform::new(0.0, 200.0, 100.0), Platform::new(0.0, 190.0, 100.0)];
        let mut player = PlayerState::new(PlayerSlot::One, Vec2::new(10.0, 165.0), false);
        player.velocity.y = 30.0;

        let landed = resolve_platforms(&mut player, &platforms);

        assert_eq!(landed, Some(1));
        assert_eq!(player.position.y, 190.0 - PlayerState::SIZE);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn test_walk_off_ledge_falls() {
        let platforms = vec![Platform::new(0.0, 300.0, 100.0), Platform::new(0.0, 570.0, 800.0)];
        let mut player = PlayerState::new(PlayerSlot::One, Vec2::new(60.0, 270.0), false);
        player.on_ground = true;

        for _ in 0..15 {
            step_player(&mut player, InputFrame::new().with_right(true), &platforms, BOUNDS);
        }

        assert!(player.position.y > 270.0);
    }

    #[test]
    fn test_clamp_x_both_sides() {
        let mut player = PlayerState::new(PlayerSlot::One, Vec2::new(-50.0, 100.0), false);
        clamp_to_bounds(&mut player, BOUNDS);
        assert_eq!(player.position.x, 0.0);

        player.position.x = 900.0;
        clamp_to_bounds(&mut player, BOUNDS);
        assert_eq!(player.position.x, 770.0);

        player.position.y = -500.0;
        clamp_to_bounds(&mut player, BOUNDS);
        assert_eq!(player.position.y, -500.0, "no upper clamp");
    }

    proptest! {
        #[test]
        fn prop_stays_in_bounds(
            x in -100.0f32..900.0,
            y in -300.0f32..700.0,
            vy in -20.0f32..40.0,
            flags in 0u8..8,
            ticks in 1usize..120,
        ) {
            let platforms = generate_platforms(BOUNDS);
            let mut player = PlayerState::new(PlayerSlot::Two, Vec2::new(x, y), false);
            player.velocity.y = vy;
            let input = InputFrame::from_bits(flags);

            for _ in 0..ticks {
                step_player(&mut player, input, &platforms, BOUNDS);
                prop_assert!(player.position.x >= 0.0);
                prop_assert!(player.position.x <= BOUNDS.width - PlayerState::SIZE);
                prop_assert!(player.position.y <= BOUNDS.height - PlayerState::SIZE);
            }
        }
    }
}
