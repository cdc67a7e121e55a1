//! Game State Definitions
//!
//! All state types for round simulation, gathered in the `WorldState`
//! aggregate. Subsystems receive the aggregate explicitly; nothing is global.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::collision::Aabb;
use crate::game::events::GameEvent;
use crate::game::history::PositionHistory;
use crate::game::map::generate_platforms;
use crate::game::schedule::Schedule;
use crate::game::tick::RoundConfig;

// =============================================================================
// PLAYER SLOT
// =============================================================================

/// One of the two fixed player seats.
///
/// Ordering is the fixed test order used by pickups and teleports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerSlot {
    /// Blue player, spawns on the left
    One = 0,
    /// Green player, spawns on the right and starts as tagger
    Two = 1,
}

impl PlayerSlot {
    /// Both slots in processing order.
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// Array index for this slot.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposing slot.
    #[inline]
    pub fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// Display name (the player's color identity).
    pub fn name(self) -> &'static str {
        match self {
            PlayerSlot::One => "Blue",
            PlayerSlot::Two => "Green",
        }
    }

    /// Spawn x coordinate.
    pub fn spawn_x(self) -> f32 {
        match self {
            PlayerSlot::One => 100.0,
            PlayerSlot::Two => 300.0,
        }
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// State of a single player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    /// Seat this player occupies
    pub slot: PlayerSlot,

    /// Top-left corner of the player box
    pub position: Vec2,

    /// Current velocity (units per tick)
    pub velocity: Vec2,

    /// Horizontal speed while a direction is held
    pub speed: f32,

    /// Resting on a platform this tick?
    pub on_ground: bool,

    /// Currently "it"?
    pub tagger: bool,

    /// Shield active (cannot become tagged)?
    pub shield: bool,

    /// Replaying position history instead of running physics?
    pub reversal: bool,

    /// Clock time (ms) when the speed boost wears off
    pub speed_expires_at: Option<u64>,

    /// Clock time (ms) when the shield wears off
    pub shield_expires_at: Option<u64>,

    /// Recorded positions for reversal
    pub history: PositionHistory,
}

impl PlayerState {
    /// Player box edge length.
    pub const SIZE: f32 = 30.0;

    /// Default horizontal speed.
    pub const BASE_SPEED: f32 = 4.0;

    /// Horizontal speed while boosted.
    pub const BOOSTED_SPEED: f32 = 8.0;

    /// Vertical velocity applied on jump.
    pub const JUMP_IMPULSE: f32 = -12.0;

    /// Create a player at rest.
    pub fn new(slot: PlayerSlot, position: Vec2, tagger: bool) -> Self {
        Self {
            slot,
            position,
            velocity: Vec2::ZERO,
            speed: Self::BASE_SPEED,
            on_ground: false,
            tagger,
            shield: false,
            reversal: false,
            speed_expires_at: None,
            shield_expires_at: None,
            history: PositionHistory::new(),
        }
    }

    /// Bounding box at the current position.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, Self::SIZE, Self::SIZE)
    }

    /// Center of the player box.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + Self::SIZE / 2.0,
            self.position.y + Self::SIZE / 2.0,
        )
    }

    /// Y coordinate of the bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + Self::SIZE
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.slot as u8);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_f32(self.speed);
        hasher.update_bool(self.on_ground);
        hasher.update_bool(self.tagger);
        hasher.update_bool(self.shield);
        hasher.update_bool(self.reversal);
        hasher.update_opt_u64(self.speed_expires_at);
        hasher.update_opt_u64(self.shield_expires_at);
        hasher.update_u32(self.history.len() as u32);
        for pos in self.history.iter() {
            hasher.update_vec2(pos);
        }
    }
}

// =============================================================================
// PLATFORM
// =============================================================================

/// Static platform. Immutable once the world is generated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge
    pub x: f32,
    /// Top surface
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
}

impl Platform {
    /// Platform thickness.
    pub const HEIGHT: f32 = 20.0;

    /// Create a platform.
    pub const fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, y, width }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bounding box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, Self::HEIGHT)
    }
}

// =============================================================================
// POWER-UPS
// =============================================================================

/// Power-up effect kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PowerupType {
    /// Double horizontal speed for a while
    Speed = 0,
    /// Immune to being tagged for a while
    Shield = 1,
    /// Exchange positions with the opponent
    Swap = 2,
    /// Jump onto the nearest platform above
    Elevator = 3,
    /// Replay recorded positions
    Reversal = 4,
}

impl PowerupType {
    /// All types, uniform spawn table.
    pub const ALL: [PowerupType; 5] = [
        PowerupType::Speed,
        PowerupType::Shield,
        PowerupType::Swap,
        PowerupType::Elevator,
        PowerupType::Reversal,
    ];
}

/// An active power-up on the field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerupState {
    /// Unique power-up ID (monotonic counter)
    pub id: u32,

    /// Top-left corner
    pub position: Vec2,

    /// Effect kind
    pub powerup_type: PowerupType,

    /// Consumed this pass, pending removal
    pub consumed: bool,
}

impl PowerupState {
    /// Power-up box edge length.
    pub const SIZE: f32 = 20.0;

    /// Create a new power-up.
    pub fn new(id: u32, position: Vec2, powerup_type: PowerupType) -> Self {
        Self {
            id,
            position,
            powerup_type,
            consumed: false,
        }
    }

    /// Bounding box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, Self::SIZE, Self::SIZE)
    }
}

// =============================================================================
// ORBS
// =============================================================================

/// Cosmetic orb color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OrbColor {
    /// Red
    Red = 0,
    /// Green
    Green = 1,
    /// Blue
    Blue = 2,
    /// Orange
    Orange = 3,
    /// Purple
    Purple = 4,
}

impl OrbColor {
    /// Spawn palette.
    pub const PALETTE: [OrbColor; 5] = [
        OrbColor::Red,
        OrbColor::Green,
        OrbColor::Blue,
        OrbColor::Orange,
        OrbColor::Purple,
    ];
}

/// A linked pair of teleport endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrbState {
    /// Unique orb ID (monotonic counter)
    pub id: u32,

    /// First endpoint
    pub a: Vec2,

    /// Second endpoint
    pub b: Vec2,

    /// Display color
    pub color: OrbColor,
}

impl OrbState {
    /// Drawn radius of each endpoint.
    pub const RADIUS: f32 = 15.0;

    /// Distance from a player's center that triggers a teleport.
    pub const TRIGGER_DISTANCE: f32 = 20.0;

    /// Create a new orb.
    pub fn new(id: u32, a: Vec2, b: Vec2, color: OrbColor) -> Self {
        Self { id, a, b, color }
    }
}

// =============================================================================
// ROUND PHASE
// =============================================================================

/// Current phase of the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum RoundPhase {
    /// Clock running
    #[default]
    Playing,
    /// Timer hit zero; the tagger at that moment lost
    Ended {
        /// Player holding the tag at expiry
        loser: PlayerSlot,
    },
}

/// Size of the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
}

impl WorldBounds {
    /// Create bounds.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// Complete state of a round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    /// Current playfield size (follows the viewport)
    pub bounds: WorldBounds,

    /// Static platforms, laid out from the bounds at generation time
    pub platforms: Vec<Platform>,

    /// Both players, indexed by `PlayerSlot::index`
    pub players: [PlayerState; 2],

    /// Active power-ups in spawn order
    pub powerups: Vec<PowerupState>,

    /// Active orbs in spawn order
    pub orbs: Vec<OrbState>,

    /// Seconds left on the round clock
    pub timer_secs: u32,

    /// Latched after a tag transfer until the players separate
    pub tag_cooldown: bool,

    /// Logical clock (ms since round start)
    pub clock_ms: u64,

    /// Frames simulated so far
    pub tick: u32,

    /// Current round phase
    pub phase: RoundPhase,

    /// RNG seed (for verification)
    pub rng_seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Countdown and spawn timers
    pub schedule: Schedule,

    /// Next power-up ID (monotonic counter)
    pub next_powerup_id: u32,

    /// Next orb ID (monotonic counter)
    pub next_orb_id: u32,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl WorldState {
    /// Generate a fresh world for the given bounds.
    ///
    /// Platforms and spawn points are derived from the bounds once, here.
    pub fn new(bounds: WorldBounds, rng_seed: u64, config: &RoundConfig) -> Self {
        let platforms = generate_platforms(bounds);
        let ground_y = platforms
            .first()
            .map(|p| p.y)
            .unwrap_or(bounds.height);
        let spawn_y = ground_y - PlayerState::SIZE;

        let players = PlayerSlot::ALL.map(|slot| {
            let mut player = PlayerState::new(
                slot,
                Vec2::new(slot.spawn_x(), spawn_y),
                slot == PlayerSlot::Two,
            );
            player.on_ground = true;
            player
        });

        Self {
            bounds,
            platforms,
            players,
            powerups: Vec::new(),
            orbs: Vec::new(),
            timer_secs: config.round_seconds,
            tag_cooldown: false,
            clock_ms: 0,
            tick: 0,
            phase: RoundPhase::Playing,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            schedule: Schedule::new(config),
            next_powerup_id: 0,
            next_orb_id: 0,
            pending_events: Vec::new(),
        }
    }

    /// Get a player by slot.
    #[inline]
    pub fn player(&self, slot: PlayerSlot) -> &PlayerState {
        &self.players[slot.index()]
    }

    /// Get a player mutably by slot.
    #[inline]
    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerState {
        &mut self.players[slot.index()]
    }

    /// Slot currently holding the tag.
    ///
    /// Falls back to `PlayerSlot::Two` only if the single-tagger invariant
    /// was broken from outside the simulation.
    pub fn tagger(&self) -> PlayerSlot {
        PlayerSlot::ALL
            .into_iter()
            .find(|slot| self.player(*slot).tagger)
            .unwrap_or(PlayerSlot::Two)
    }

    /// Update bounds after a viewport resize. Platforms are kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = WorldBounds::new(width, height);
    }

    /// Spawn a new power-up.
    pub fn spawn_powerup(&mut self, position: Vec2, powerup_type: PowerupType) -> u32 {
        let id = self.next_powerup_id;
        self.next_powerup_id += 1;
        self.powerups.push(PowerupState::new(id, position, powerup_type));
        id
    }

    /// Spawn a new orb.
    pub fn spawn_orb(&mut self, a: Vec2, b: Vec2, color: OrbColor) -> u32 {
        let id = self.next_orb_id;
        self.next_orb_id += 1;
        self.orbs.push(OrbState::new(id, a, b, color));
        id
    }

    /// Check if round has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, RoundPhase::Ended { .. })
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            hasher.update_f32(self.bounds.width);
            hasher.update_f32(self.bounds.height);

            for player in &self.players {
                player.hash_into(hasher);
            }

            for powerup in &self.powerups {
                hasher.update_u32(powerup.id);
                hasher.update_vec2(powerup.position);
                hasher.update_u8(powerup.powerup_type as u8);
            }

            for orb in &self.orbs {
                hasher.update_u32(orb.id);
                hasher.update_vec2(orb.a);
                hasher.update_vec2(orb.b);
                hasher.update_u8(orb.color as u8);
            }

            hasher.update_u32(self.timer_secs);
            hasher.update_bool(self.tag_cooldown);
            hasher.update_u64(self.clock_ms);
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldState {
        WorldState::new(WorldBounds::new(800.0, 600.0), 12345, &RoundConfig::default())
    }

    #[test]
    fn test_slot_other() {
        assert_eq!(PlayerSlot::One.other(), PlayerSlot::Two);
        assert_eq!(PlayerSlot::Two.other(), PlayerSlot::One);
        assert!(PlayerSlot::One < PlayerSlot::Two);
    }

    #[test]
    fn test_new_world_spawns_on_ground() {
        let state = world();
        let ground = state.platforms[0];

        for player in &state.players {
            assert_eq!(player.bottom(), ground.y);
            assert!(player.on_ground);
            assert_eq!(player.speed, PlayerState::BASE_SPEED);
        }
        assert_eq!(state.player(PlayerSlot::One).position.x, 100.0);
        assert_eq!(state.player(PlayerSlot::Two).position.x, 300.0);
    }

    #[test]
    fn test_exactly_one_initial_tagger() {
        let state = world();
        assert!(!state.player(PlayerSlot::One).tagger);
        assert!(state.player(PlayerSlot::Two).tagger);
        assert_eq!(state.tagger(), PlayerSlot::Two);
        assert_eq!(state.timer_secs, 120);
    }

    #[test]
    fn test_resize_keeps_platforms() {
        let mut state = world();
        let before = state.platforms.clone();

        state.resize(1024.0, 768.0);

        assert_eq!(state.bounds, WorldBounds::new(1024.0, 768.0));
        assert_eq!(state.platforms, before);
    }

    #[test]
    fn test_spawn_ids_monotonic() {
        let mut state = world();
        assert_eq!(state.spawn_powerup(Vec2::ZERO, PowerupType::Speed), 0);
        assert_eq!(state.spawn_powerup(Vec2::ZERO, PowerupType::Swap), 1);
        assert_eq!(state.spawn_orb(Vec2::ZERO, Vec2::ZERO, OrbColor::Red), 0);
        assert_eq!(state.powerups.len(), 2);
        assert_eq!(state.orbs.len(), 1);
    }

    #[test]
    fn test_world_hash_determinism() {
        let a = world();
        let b = world();
        assert_eq!(a.compute_hash(), b.compute_hash());

        let mut c = world();
        c.player_mut(PlayerSlot::One).position.x += 1.0;
        assert_ne!(a.compute_hash(), c.compute_hash());
    }
}
