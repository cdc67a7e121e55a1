//! Game Events
//!
//! Events generated during simulation for logging, rendering cues and replay
//! verification.

use serde::{Serialize, Deserialize};
use crate::core::vec2::Vec2;
use crate::game::state::{PlayerSlot, PowerupType};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Round end first
    RoundEnd = 0,
    /// Then tag changes
    Tag = 1,
    /// Then pickups and effects
    Pickup = 2,
    /// Then teleports
    Teleport = 3,
    /// Then spawns
    Spawn = 4,
    /// Lowest priority
    Other = 255,
}

/// Timed effect that can wear off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimedEffect {
    /// Boosted speed
    Speed,
    /// Tag immunity
    Shield,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// The tag changed hands
    TagTransferred {
        /// Previous tagger
        from: PlayerSlot,
        /// New tagger
        to: PlayerSlot,
    },

    /// A power-up appeared
    PowerupSpawned {
        /// Power-up id
        powerup_id: u32,
        /// Effect type
        powerup_type: PowerupType,
        /// Top-left corner
        position: Vec2,
    },

    /// A player picked up a power-up
    PowerupCollected {
        /// Collector
        player: PlayerSlot,
        /// Power-up id
        powerup_id: u32,
        /// Effect type
        powerup_type: PowerupType,
    },

    /// An orb appeared
    OrbSpawned {
        /// Orb id
        orb_id: u32,
        /// Endpoint A
        a: Vec2,
        /// Endpoint B
        b: Vec2,
    },

    /// A player went through an orb
    Teleported {
        /// Teleported player
        player: PlayerSlot,
        /// Orb used
        orb_id: u32,
        /// Position before
        from: Vec2,
        /// Position after
        to: Vec2,
    },

    /// A timed effect wore off
    EffectExpired {
        /// Affected player
        player: PlayerSlot,
        /// Effect that ended
        effect: TimedEffect,
    },

    /// History playback finished
    ReversalEnded {
        /// Player back under control
        player: PlayerSlot,
    },

    /// The round clock lost a second
    TimerTick {
        /// Seconds left on the clock
        seconds_remaining: u32,
    },

    /// Timer reached zero
    RoundEnded {
        /// Tagger at expiry
        loser: PlayerSlot,
        /// Ticks played
        duration_ticks: u32,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Player involved (for tie-breaking)
    pub player: Option<PlayerSlot>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        let player = match &data {
            GameEventData::TagTransferred { to, .. } => Some(*to),
            GameEventData::PowerupCollected { player, .. } => Some(*player),
            GameEventData::Teleported { player, .. } => Some(*player),
            GameEventData::EffectExpired { player, .. } => Some(*player),
            GameEventData::ReversalEnded { player } => Some(*player),
            GameEventData::RoundEnded { loser, .. } => Some(*loser),
            _ => None,
        };

        Self {
            tick,
            priority,
            player,
            data,
        }
    }

    /// Ordering key: tick, then priority, then player.
    pub fn sort_key(&self) -> (u32, EventPriority, Option<PlayerSlot>) {
        (self.tick, self.priority, self.player)
    }

    /// Create tag transferred event.
    pub fn tag_transferred(tick: u32, from: PlayerSlot, to: PlayerSlot) -> Self {
        Self::new(tick, EventPriority::Tag, GameEventData::TagTransferred { from, to })
    }

    /// Create power-up spawned event.
    pub fn powerup_spawned(tick: u32, powerup_id: u32, powerup_type: PowerupType, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Spawn,
            GameEventData::PowerupSpawned {
                powerup_id,
                powerup_type,
                position,
            },
        )
    }

    /// Create power-up collected event.
    pub fn powerup_collected(tick: u32, player: PlayerSlot, powerup_id: u32, powerup_type: PowerupType) -> Self {
        Self::new(
            tick,
            EventPriority::Pickup,
            GameEventData::PowerupCollected {
                player,
                powerup_id,
                powerup_type,
            },
        )
    }

    /// Create orb spawned event.
    pub fn orb_spawned(tick: u32, orb_id: u32, a: Vec2, b: Vec2) -> Self {
        Self::new(tick, EventPriority::Spawn, GameEventData::OrbSpawned { orb_id, a, b })
    }

    /// Create teleported event.
    pub fn teleported(tick: u32, player: PlayerSlot, orb_id: u32, from: Vec2, to: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Teleport,
            GameEventData::Teleported {
                player,
                orb_id,
                from,
                to,
            },
        )
    }

    /// Create effect expired event.
    pub fn effect_expired(tick: u32, player: PlayerSlot, effect: TimedEffect) -> Self {
        Self::new(tick, EventPriority::Pickup, GameEventData::EffectExpired { player, effect })
    }

    /// Create reversal ended event.
    pub fn reversal_ended(tick: u32, player: PlayerSlot) -> Self {
        Self::new(tick, EventPriority::Pickup, GameEventData::ReversalEnded { player })
    }

    /// Create timer tick event.
    pub fn timer_tick(tick: u32, seconds_remaining: u32) -> Self {
        Self::new(tick, EventPriority::Other, GameEventData::TimerTick { seconds_remaining })
    }

    /// Create round ended event.
    pub fn round_ended(tick: u32, loser: PlayerSlot) -> Self {
        Self::new(
            tick,
            EventPriority::RoundEnd,
            GameEventData::RoundEnded {
                loser,
                duration_ticks: tick,
            },
        )
    }
}

/// Put a tick's events into processing order.
///
/// Stable: events with equal keys keep the order they were raised in.
pub fn sort_events(events: &mut [GameEvent]) {
    events.sort_by_key(GameEvent::sort_key);
}
