//! Tag Arena
//!
//! Headless runner: plays one scripted round, logs the outcome and verifies
//! the recording replays to the same state hash.

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tag_arena::{
    GameConfig, RoundSession, TICK_RATE, VERSION,
    game::{
        events::GameEventData,
        replay::{replay, RoundRecording},
    },
    runtime::{DriverEvent, RealtimeDriver, TracingSink},
};

/// Scripted key events for frame `t`: (key, pressed).
fn scripted_keys(t: u32) -> Vec<(&'static str, bool)> {
    let mut keys = Vec::new();
    // Blue runs back and forth and hops
    match t % 240 {
        0 => keys.push(("KeyD", true)),
        120 => {
            keys.push(("KeyD", false));
            keys.push(("KeyA", true));
        }
        239 => keys.push(("KeyA", false)),
        _ => {}
    }
    if t % 90 == 0 {
        keys.push(("KeyW", true));
    } else if t % 90 == 10 {
        keys.push(("KeyW", false));
    }
    // Green chases
    match t % 200 {
        0 => keys.push(("ArrowLeft", true)),
        100 => {
            keys.push(("ArrowLeft", false));
            keys.push(("ArrowRight", true));
        }
        199 => keys.push(("ArrowRight", false)),
        _ => {}
    }
    if t % 75 == 30 {
        keys.push(("ArrowUp", true));
    } else if t % 75 == 40 {
        keys.push(("ArrowUp", false));
    }
    keys
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tag Arena v{}", VERSION);
    info!("Nominal frame rate: {} Hz", TICK_RATE);

    let config = GameConfig::from_env().context("loading configuration")?;

    let recording = if config.driver.realtime {
        realtime_round(&config).await?
    } else {
        headless_round(&config)?
    };

    verify(&recording)
}

/// Run a round flat out with fixed frame time.
fn headless_round(config: &GameConfig) -> Result<RoundRecording> {
    info!("=== Headless round ({} ms frames) ===", config.driver.frame_ms);

    let mut session = RoundSession::with_recording(config);
    let mut total_events = 0usize;
    let mut t: u32 = 0;

    while !session.is_ended() {
        for (key, pressed) in scripted_keys(t) {
            if pressed {
                session.key_down(key)?;
            } else {
                session.key_up(key)?;
            }
        }

        let output = session.advance(config.driver.frame_ms);
        total_events += output.result.events.len();

        for event in &output.result.events {
            match &event.data {
                GameEventData::TagTransferred { from, to } => {
                    info!("Tick {}: {} tagged {}", event.tick, from.name(), to.name());
                }
                GameEventData::PowerupCollected { player, powerup_type, .. } => {
                    info!("Tick {}: {} picked up {:?}", event.tick, player.name(), powerup_type);
                }
                GameEventData::Teleported { player, .. } => {
                    info!("Tick {}: {} teleported", event.tick, player.name());
                }
                _ => {}
            }
        }

        if output.hud_changed && output.hud.timer_text.ends_with('0') {
            info!("Timer: {} s", output.hud.timer_text);
        }
        if let Some(message) = &output.hud.message {
            info!("{}", message);
        }
        t += 1;
    }

    info!("Round finished after {} frames, {} events", t, total_events);

    let (state, recording) = session.finish();
    info!("Final State Hash: {}", hex::encode(state.compute_hash()));
    recording.context("session was not recording")
}

/// Run a round paced against the wall clock.
async fn realtime_round(config: &GameConfig) -> Result<RoundRecording> {
    info!("=== Real-time round ({} ms frames) ===", config.driver.frame_ms);

    let driver = RealtimeDriver::new(config.driver.frame_ms);
    let session = RoundSession::with_recording(config);
    let (tx, rx) = mpsc::channel(64);
    let frame_ms = config.driver.frame_ms;

    let feeder = tokio::spawn(async move {
        let mut t: u32 = 0;
        loop {
            for (key, pressed) in scripted_keys(t) {
                let event = if pressed {
                    DriverEvent::KeyDown(key.to_string())
                } else {
                    DriverEvent::KeyUp(key.to_string())
                };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(frame_ms)).await;
            t = t.wrapping_add(1);
        }
    });

    let outcome = driver.run(session, rx, &mut TracingSink).await;
    feeder.abort();

    info!(
        "Round stopped ({:?}) after {} frames; loser {:?}",
        outcome.reason,
        outcome.frames,
        outcome.loser.map(|s| s.name())
    );
    info!("Final State Hash: {}", hex::encode(outcome.state.compute_hash()));
    outcome.recording.context("session was not recording")
}

/// Replay the recording and compare hashes.
fn verify(recording: &RoundRecording) -> Result<()> {
    info!("=== Verifying Determinism ===");

    let json = recording.to_json()?;
    let parsed = RoundRecording::from_json(&json)?;

    match replay(&parsed) {
        Ok(state) => {
            info!("Replay State Hash: {}", hex::encode(state.compute_hash()));
            info!("DETERMINISM VERIFIED: {} checkpoints matched", parsed.checkpoints.len());
            Ok(())
        }
        Err(e) => bail!("DETERMINISM FAILURE: {}", e),
    }
}
