//! Collision Detection
//!
//! Axis-aligned box overlap, orb trigger range and tag proximity tests.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::{OrbState, PlayerState, PowerupState};

/// Axis-aligned bounding box (top-left origin, y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Aabb {
    /// Create a box.
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Horizontal extents overlap (strict).
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w && self.x + self.w > other.x
    }
}

/// Tag range on each axis.
pub const TAG_RANGE: f32 = 30.0;

/// Check whether two players are close enough to tag.
///
/// Per-axis test on the top-left corners: `|dx| < 30 && |dy| < 30`.
#[inline]
pub fn players_in_tag_range(a: &PlayerState, b: &PlayerState) -> bool {
    let d = a.position.abs_diff(b.position);
    d.x < TAG_RANGE && d.y < TAG_RANGE
}

/// Check if a player overlaps a power-up.
#[inline]
pub fn check_powerup_collision(player: &PlayerState, powerup: &PowerupState) -> bool {
    !powerup.consumed && player.bounds().overlaps(&powerup.bounds())
}

/// Which orb endpoint a player is touching, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbEndpoint {
    /// First endpoint
    A,
    /// Second endpoint
    B,
}

/// Find the endpoint whose trigger range contains the player's center.
///
/// Endpoint A is tested first.
pub fn touched_endpoint(player: &PlayerState, orb: &OrbState) -> Option<OrbEndpoint> {
    let center: Vec2 = player.center();
    if center.within(orb.a, OrbState::TRIGGER_DISTANCE) {
        Some(OrbEndpoint::A)
    } else if center.within(orb.b, OrbState::TRIGGER_DISTANCE) {
        Some(OrbEndpoint::B)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{OrbColor, PlayerSlot, PowerupType};

    fn player_at(x: f32, y: f32) -> PlayerState {
        PlayerState::new(PlayerSlot::One, Vec2::new(x, y), false)
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(0.0, 0.0, 30.0, 30.0);
        assert!(a.overlaps(&Aabb::new(29.0, 29.0, 20.0, 20.0)));
        assert!(!a.overlaps(&Aabb::new(30.0, 0.0, 20.0, 20.0)), "touching is not overlap");
        assert!(!a.overlaps(&Aabb::new(0.0, 40.0, 20.0, 20.0)));
        assert!(a.overlaps_x(&Aabb::new(10.0, 500.0, 5.0, 5.0)));
    }

    #[test]
    fn test_tag_range_is_per_axis() {
        let a = player_at(100.0, 100.0);
        assert!(players_in_tag_range(&a, &player_at(129.0, 71.0)));
        assert!(!players_in_tag_range(&a, &player_at(130.0, 100.0)));
        assert!(!players_in_tag_range(&a, &player_at(100.0, 130.0)));
    }

    #[test]
    fn test_powerup_collision() {
        let player = player_at(100.0, 100.0);
        let near = PowerupState::new(0, Vec2::new(120.0, 110.0), PowerupType::Speed);
        let far = PowerupState::new(1, Vec2::new(200.0, 110.0), PowerupType::Speed);

        assert!(check_powerup_collision(&player, &near));
        assert!(!check_powerup_collision(&player, &far));

        let mut consumed = near.clone();
        consumed.consumed = true;
        assert!(!check_powerup_collision(&player, &consumed));
    }

    #[test]
    fn test_touched_endpoint() {
        let orb = OrbState::new(0, Vec2::new(115.0, 115.0), Vec2::new(500.0, 300.0), OrbColor::Red);

        // Center at (115, 115)
        assert_eq!(touched_endpoint(&player_at(100.0, 100.0), &orb), Some(OrbEndpoint::A));
        // Center at (500, 300)
        assert_eq!(touched_endpoint(&player_at(485.0, 285.0), &orb), Some(OrbEndpoint::B));
        assert_eq!(touched_endpoint(&player_at(300.0, 50.0), &orb), None);
    }
}
