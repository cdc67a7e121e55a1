//! Whole-round invariants under arbitrary input.

use proptest::prelude::*;

use tag_arena::game::history::PositionHistory;
use tag_arena::game::replay::{replay, RoundRecorder};
use tag_arena::game::state::WorldBounds;
use tag_arena::{tick, InputFrame, PlayerInputs, RoundConfig, WorldState};

fn inputs_strategy(len: usize) -> impl Strategy<Value = Vec<(u8, u8, u64)>> {
    prop::collection::vec((0u8..8, 0u8..8, 1u64..120), 1..len)
}

fn frame(bits: (u8, u8)) -> PlayerInputs {
    [InputFrame::from_bits(bits.0), InputFrame::from_bits(bits.1)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn invariants_hold_every_tick(seed in any::<u64>(), script in inputs_strategy(800)) {
        let config = RoundConfig::default();
        let bounds = WorldBounds::new(800.0, 600.0);
        let mut state = WorldState::new(bounds, seed, &config);

        for (a, b, elapsed) in script {
            tick(&mut state, &frame((a, b)), elapsed, &config);

            let taggers = state.players.iter().filter(|p| p.tagger).count();
            prop_assert_eq!(taggers, 1);

            for player in &state.players {
                prop_assert!(player.position.x >= 0.0);
                prop_assert!(player.position.x <= bounds.width - 30.0);
                prop_assert!(player.position.y <= bounds.height - 30.0);
                prop_assert!(player.history.len() <= PositionHistory::CAPACITY);
            }
        }
    }

    #[test]
    fn recordings_replay_exactly(seed in any::<u64>(), script in inputs_strategy(400)) {
        let config = RoundConfig::default();
        let bounds = WorldBounds::new(800.0, 600.0);
        let mut state = WorldState::new(bounds, seed, &config);
        let mut recorder = RoundRecorder::new(seed, bounds, config.clone());

        for (a, b, elapsed) in script {
            let inputs = frame((a, b));
            let result = tick(&mut state, &inputs, elapsed, &config);
            recorder.record_frame(&state, &inputs, elapsed);
            if result.round_ended {
                break;
            }
        }

        let recording = recorder.finish(&state);
        let replayed = replay(&recording).unwrap();
        prop_assert_eq!(replayed.compute_hash(), state.compute_hash());
    }
}

#[test]
fn full_round_names_tagger() {
    let config = RoundConfig::default();
    let mut state = WorldState::new(WorldBounds::new(800.0, 600.0), 2024, &config);
    let right = [InputFrame::new().with_right(true), InputFrame::new().with_left(true)];

    let mut frames = 0;
    let result = loop {
        frames += 1;
        let result = tick(&mut state, &right, 16, &config);
        if result.round_ended {
            break result;
        }
        assert!(frames < 10_000, "round never ended");
    };

    assert_eq!(state.timer_secs, 0);
    assert_eq!(result.loser, Some(state.tagger()));
}
