//! Real-time Driver
//!
//! Paces a `RoundSession` against the wall clock on a tokio interval. Key
//! and resize events arrive over an mpsc channel; a broadcast channel stops
//! the loop early. The loop exits as soon as the round ends, dropping the
//! frame interval with it.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::game::replay::RoundRecording;
use crate::game::state::{PlayerSlot, WorldState};
use crate::runtime::session::{FrameOutput, RoundSession};

/// Host input delivered to the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverEvent {
    /// Key pressed
    KeyDown(String),
    /// Key released
    KeyUp(String),
    /// Viewport resized
    Resize {
        /// New width
        width: f32,
        /// New height
        height: f32,
    },
    /// Window lost focus
    FocusLost,
}

/// Consumer of rendered frames.
pub trait FrameSink: Send {
    /// Present one frame.
    fn present(&mut self, output: &FrameOutput);
}

/// Sink that only logs HUD changes.
#[derive(Debug, Default)]
pub struct TracingSink;

impl FrameSink for TracingSink {
    fn present(&mut self, output: &FrameOutput) {
        if output.hud_changed {
            debug!("HUD: {} (tagger {})", output.hud.timer_text, output.hud.tagger.name());
        }
        if let Some(message) = &output.hud.message {
            info!("{}", message);
        }
    }
}

/// Why the driver stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Timer ran out
    RoundEnded,
    /// Shutdown was signalled
    Shutdown,
}

/// Result of a driven round.
#[derive(Debug)]
pub struct DriverOutcome {
    /// Why the loop ended
    pub reason: StopReason,
    /// Frames simulated
    pub frames: u32,
    /// Tagger at expiry, if the round finished
    pub loser: Option<PlayerSlot>,
    /// Final world
    pub state: WorldState,
    /// Recording, if the session kept one
    pub recording: Option<RoundRecording>,
}

/// Wall-clock frame loop.
pub struct RealtimeDriver {
    frame_period: Duration,
    shutdown_tx: broadcast::Sender<()>,
}

impl RealtimeDriver {
    /// Create a driver targeting one frame every `frame_ms`.
    pub fn new(frame_ms: u64) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            frame_period: Duration::from_millis(frame_ms.max(1)),
            shutdown_tx,
        }
    }

    /// Handle for stopping the loop from another task.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Signal the loop to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Drive `session` until the round ends or shutdown is signalled.
    pub async fn run<S: FrameSink>(
        &self,
        mut session: RoundSession,
        mut events: mpsc::Receiver<DriverEvent>,
        sink: &mut S,
    ) -> DriverOutcome {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut ticker = interval(self.frame_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last = Instant::now();
        let mut frames: u32 = 0;

        info!("Driver running at {:?} per frame", self.frame_period);

        let reason = loop {
            tokio::select! {
                now = ticker.tick() => {
                    let elapsed_ms = now.saturating_duration_since(last).as_millis() as u64;
                    last = now;

                    let output = session.advance(elapsed_ms);
                    frames += 1;
                    sink.present(&output);

                    if output.result.round_ended {
                        break StopReason::RoundEnded;
                    }
                }
                Some(event) = events.recv() => {
                    handle_event(&mut session, event);
                }
                _ = shutdown_rx.recv() => {
                    info!("Driver shutting down");
                    break StopReason::Shutdown;
                }
            }
        };

        let loser = session.loser();
        let (state, recording) = session.finish();
        info!("Driver stopped after {} frames ({:?})", frames, reason);

        DriverOutcome {
            reason,
            frames,
            loser,
            state,
            recording,
        }
    }
}

fn handle_event(session: &mut RoundSession, event: DriverEvent) {
    let outcome = match event {
        DriverEvent::KeyDown(key) => session.key_down(&key).map(|_| ()),
        DriverEvent::KeyUp(key) => session.key_up(&key).map(|_| ()),
        DriverEvent::Resize { width, height } => session.resize(width, height),
        DriverEvent::FocusLost => {
            session.release_all();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        warn!("Dropped input: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        messages: Vec<String>,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, output: &FrameOutput) {
            self.frames += 1;
            if let Some(m) = &output.hud.message {
                self.messages.push(m.clone());
            }
        }
    }

    #[tokio::test]
    async fn test_round_runs_to_end() {
        let mut config = GameConfig::default();
        config.round.round_seconds = 1;
        let session = RoundSession::with_recording(&config);
        let driver = RealtimeDriver::new(5);
        let (_tx, rx) = mpsc::channel(8);
        let mut sink = CountingSink::default();

        let outcome = driver.run(session, rx, &mut sink).await;

        assert_eq!(outcome.reason, StopReason::RoundEnded);
        assert_eq!(outcome.loser, Some(PlayerSlot::Two));
        assert_eq!(sink.frames as u32, outcome.frames);
        assert_eq!(sink.messages, vec!["Time's up! Green loses!".to_string()]);
        let recording = outcome.recording.unwrap();
        assert_eq!(recording.frame_count(), outcome.frames);
        assert!(crate::game::replay::replay(&recording).is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let session = RoundSession::new(&GameConfig::default());
        let driver = RealtimeDriver::new(5);
        let shutdown = driver.shutdown_handle();
        let (tx, rx) = mpsc::channel(8);
        let mut sink = TracingSink;

        tokio::spawn(async move {
            tx.send(DriverEvent::KeyDown("KeyD".into())).await.ok();
            tokio::time::sleep(Duration::from_millis(60)).await;
            shutdown.send(()).ok();
        });

        let outcome = driver.run(session, rx, &mut sink).await;

        assert_eq!(outcome.reason, StopReason::Shutdown);
        assert_eq!(outcome.loser, None);
        assert!(outcome.state.player(PlayerSlot::One).position.x > 100.0);
    }
}
