//! Authoritative Simulation Tick
//!
//! The per-frame orchestrator. Everything that changes a round goes through
//! `tick`, so a seed plus the recorded inputs and frame timings reproduce a
//! round exactly.

use serde::{Serialize, Deserialize};
use tracing::info;
#[cfg(feature = "debug-tracing")]
use tracing::debug;

use crate::game::effects::expire_effects;
use crate::game::events::{sort_events, GameEvent};
use crate::game::history::ReversalOrder;
use crate::game::input::PlayerInputs;
use crate::game::orb::{resolve_teleports, spawn_orb, OrbSpawnConfig};
use crate::game::physics::{clamp_to_bounds, step_player};
use crate::game::powerup::{resolve_pickups, spawn_powerup, PowerupSpawnConfig};
use crate::game::schedule::ScheduledTask;
use crate::game::state::{PlayerSlot, RoundPhase, WorldState};
use crate::game::tag::arbitrate;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the round is over (this tick or earlier)
    pub round_ended: bool,
    /// Tagger at expiry
    pub loser: Option<PlayerSlot>,
}

/// Configuration for round simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Round length in seconds
    pub round_seconds: u32,
    /// Lifetime of speed and shield effects
    pub effect_duration_ms: u64,
    /// Reversal playback order
    pub reversal_order: ReversalOrder,
    /// Power-up spawner
    pub powerup_spawn: PowerupSpawnConfig,
    /// Orb spawner
    pub orb_spawn: OrbSpawnConfig,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_seconds: 120,
            effect_duration_ms: 5_000,
            reversal_order: ReversalOrder::default(),
            powerup_spawn: PowerupSpawnConfig::default(),
            orb_spawn: OrbSpawnConfig::default(),
        }
    }
}

/// Run one simulation frame.
///
/// # Arguments
///
/// * `state` - The world state (will be mutated)
/// * `inputs` - Held controls for both players, indexed by slot
/// * `elapsed_ms` - Logical time since the previous frame
/// * `config` - Round configuration
///
/// # Order
///
/// 1. Advance the clock and fire due intervals (countdown, spawns)
/// 2. Expire timed effects
/// 3. Update players (reversal playback or physics + history)
/// 4. Orb teleports
/// 5. Power-up pickups, then clamp everyone into the world
/// 6. Tag arbitration
/// 7. End of round when the timer reaches zero
///
/// The clock never advances past the end of the round, and events come back
/// sorted by priority.
pub fn tick(
    state: &mut WorldState,
    inputs: &PlayerInputs,
    elapsed_ms: u64,
    config: &RoundConfig,
) -> TickResult {
    let mut result = TickResult::default();

    if let RoundPhase::Ended { loser } = state.phase {
        result.round_ended = true;
        result.loser = Some(loser);
        return result;
    }

    // 0. Advance counters, never past the end of the round
    state.tick += 1;
    let advance = match state.schedule.round_end_ms(state.timer_secs) {
        Some(end_ms) => elapsed_ms.min(end_ms.saturating_sub(state.clock_ms)),
        None => elapsed_ms,
    };
    state.clock_ms = state.clock_ms.saturating_add(advance);

    // 1. Interval timers
    run_scheduled(state, config);

    // 2. Timed effects
    expire_effects(state);

    // 3. Players
    update_players(state, inputs, config);

    // 4. Orbs
    resolve_teleports(state);

    // 5. Power-ups
    resolve_pickups(state, config.effect_duration_ms);
    contain_players(state);

    // 6. Tag
    arbitrate(state);

    // 7. End condition
    check_end_condition(state, &mut result);

    #[cfg(feature = "debug-tracing")]
    debug!(
        "tick {} clock {}ms timer {}s tagger {:?}",
        state.tick,
        state.clock_ms,
        state.timer_secs,
        state.tagger()
    );

    let mut events = state.take_events();
    sort_events(&mut events);
    result.events = events;
    result
}

/// Fire every interval that came due since the previous frame.
///
/// Nothing fires once the countdown has reached zero.
fn run_scheduled(state: &mut WorldState, config: &RoundConfig) {
    let now = state.clock_ms;

    for task in state.schedule.due_tasks(now) {
        if state.timer_secs == 0 {
            break;
        }
        match task {
            ScheduledTask::CountdownTick => {
                if state.timer_secs > 0 {
                    state.timer_secs -= 1;
                    state.push_event(GameEvent::timer_tick(state.tick, state.timer_secs));
                }
            }
            ScheduledTask::SpawnPowerup => {
                spawn_powerup(state, &config.powerup_spawn);
            }
            ScheduledTask::SpawnOrb => {
                spawn_orb(state);
            }
        }
    }
}

/// Update both players in slot order.
///
/// A reversing player consumes one recorded position per tick and skips
/// physics; the flag clears on the tick the history runs dry. Everyone else
/// records their pre-step position, then steps physics.
fn update_players(state: &mut WorldState, inputs: &PlayerInputs, config: &RoundConfig) {
    let tick = state.tick;
    let bounds = state.bounds;
    let mut ended: Vec<PlayerSlot> = Vec::new();

    for slot in PlayerSlot::ALL {
        let player = &mut state.players[slot.index()];

        if player.reversal {
            if let Some(position) = player.history.pop(config.reversal_order) {
                player.position = position;
            }
            if player.history.is_empty() {
                player.reversal = false;
                ended.push(slot);
            }
            continue;
        }

        player.history.record(player.position);
        step_player(player, inputs[slot.index()], &state.platforms, bounds);
    }

    for slot in ended {
        state.push_event(GameEvent::reversal_ended(tick, slot));
    }
}

/// Pull players back inside the world after teleports, swaps and resizes.
fn contain_players(state: &mut WorldState) {
    let bounds = state.bounds;
    for player in state.players.iter_mut() {
        clamp_to_bounds(player, bounds);
    }
}

/// End the round once the clock has run out.
fn check_end_condition(state: &mut WorldState, result: &mut TickResult) {
    if state.timer_secs > 0 {
        return;
    }

    let loser = state.tagger();
    state.phase = RoundPhase::Ended { loser };
    result.round_ended = true;
    result.loser = Some(loser);

    info!("Time's up at tick {}: {} loses", state.tick, loser.name());
    state.push_event(GameEvent::round_ended(state.tick, loser));
}

/// Replay a round from per-tick inputs and frame timings.
///
/// Frames past the end of `inputs` use idle input. Stops early when the round
/// ends. Returns the final state and every event produced.
pub fn replay_round(
    initial_state: WorldState,
    inputs: &[PlayerInputs],
    elapsed_ms: &[u64],
    config: &RoundConfig,
) -> (WorldState, Vec<GameEvent>) {
    let mut state = initial_state;
    let mut all_events = Vec::new();

    for (t, elapsed) in elapsed_ms.iter().enumerate() {
        let frame_inputs = inputs.get(t).copied().unwrap_or_default();
        let result = tick(&mut state, &frame_inputs, *elapsed, config);
        all_events.extend(result.events);

        if result.round_ended {
            break;
        }
    }

    (state, all_events)
}
