//! Arena Layout
//!
//! Platform layout generated once per round from the world bounds captured
//! at generation time. The ground always comes first and spans the full width.

use crate::game::state::{Platform, WorldBounds};

/// Distance from the bottom of the world to the ground's top surface.
pub const GROUND_OFFSET: f32 = 30.0;

/// Floating platforms as (x, y, width).
const LEDGES: [(f32, f32, f32); 7] = [
    (100.0, 450.0, 150.0),
    (300.0, 400.0, 180.0),
    (600.0, 350.0, 160.0),
    (200.0, 280.0, 140.0),
    (500.0, 220.0, 130.0),
    (100.0, 150.0, 120.0),
    (400.0, 100.0, 110.0),
];

/// Build the platform list for a world of the given size.
pub fn generate_platforms(bounds: WorldBounds) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(LEDGES.len() + 1);
    platforms.push(Platform::new(0.0, bounds.height - GROUND_OFFSET, bounds.width));
    platforms.extend(LEDGES.iter().map(|&(x, y, w)| Platform::new(x, y, w)));
    platforms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_spans_world() {
        let platforms = generate_platforms(WorldBounds::new(1280.0, 720.0));
        let ground = platforms[0];

        assert_eq!(ground.x, 0.0);
        assert_eq!(ground.y, 690.0);
        assert_eq!(ground.width, 1280.0);
        assert_eq!(platforms.len(), 8);
    }

    #[test]
    fn test_ledges_fixed() {
        let small = generate_platforms(WorldBounds::new(800.0, 600.0));
        let large = generate_platforms(WorldBounds::new(1920.0, 1080.0));
        assert_eq!(small[1..], large[1..]);
    }
}
