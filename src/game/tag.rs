//! Tag Arbitration
//!
//! Decides when the tag passes between players. A transfer latches the
//! cooldown, which only clears once the players separate, so continuous
//! contact cannot pass the tag back and forth every tick.

use tracing::trace;

use crate::game::collision::players_in_tag_range;
use crate::game::events::GameEvent;
use crate::game::state::{PlayerSlot, WorldState};

/// Run tag arbitration for this tick.
///
/// Returns `(from, to)` when the tag changed hands.
pub fn arbitrate(state: &mut WorldState) -> Option<(PlayerSlot, PlayerSlot)> {
    let [one, two] = &state.players;
    let close = players_in_tag_range(one, two);

    if !close {
        state.tag_cooldown = false;
        return None;
    }

    if state.tag_cooldown || one.reversal || two.reversal {
        return None;
    }

    let from = state.tagger();
    let to = from.other();

    {
        let target = state.player(to);
        if !state.player(from).tagger || target.shield || target.tagger {
            trace!("Tag blocked: {:?} -> {:?}", from, to);
            return None;
        }
    }

    state.player_mut(from).tagger = false;
    state.player_mut(to).tagger = true;
    state.tag_cooldown = true;
    state.push_event(GameEvent::tag_transferred(state.tick, from, to));

    Some((from, to))
}
