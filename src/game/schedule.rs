//! Interval Schedule
//!
//! Logical-clock replacement for wall-clock intervals: the round countdown,
//! the power-up spawner and the orb spawner. Frames advance the clock by
//! whatever time elapsed; every interval that came due fires in due order.

use serde::{Serialize, Deserialize};

use crate::game::tick::RoundConfig;

/// A repeating timer on the logical clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTimer {
    /// Period in milliseconds (0 = disabled)
    pub period_ms: u64,
    /// Clock time of the next firing
    pub next_due_ms: u64,
}

impl IntervalTimer {
    /// First firing one period after `start_ms`.
    pub fn new(period_ms: u64, start_ms: u64) -> Self {
        Self {
            period_ms,
            next_due_ms: start_ms.saturating_add(period_ms),
        }
    }

    /// Collect every due time at or before `now_ms`, advancing the timer.
    pub fn drain_due(&mut self, now_ms: u64, out: &mut Vec<u64>) {
        if self.period_ms == 0 {
            return;
        }
        while self.next_due_ms <= now_ms {
            out.push(self.next_due_ms);
            match self.next_due_ms.checked_add(self.period_ms) {
                Some(next) => self.next_due_ms = next,
                None => {
                    // Clock exhausted
                    self.period_ms = 0;
                    break;
                }
            }
        }
    }
}

/// Work triggered by an interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduledTask {
    /// Decrement the round timer by one second
    CountdownTick,
    /// Spawn one power-up
    SpawnPowerup,
    /// Spawn one orb
    SpawnOrb,
}

/// All round intervals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Round countdown, one step per second
    pub countdown: IntervalTimer,
    /// Power-up spawner
    pub powerup_spawn: IntervalTimer,
    /// Orb spawner
    pub orb_spawn: IntervalTimer,
}

impl Schedule {
    /// Countdown period.
    pub const SECOND_MS: u64 = 1000;

    /// Create intervals starting at clock zero.
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            countdown: IntervalTimer::new(Self::SECOND_MS, 0),
            powerup_spawn: IntervalTimer::new(config.powerup_spawn.interval_ms, 0),
            orb_spawn: IntervalTimer::new(config.orb_spawn.interval_ms, 0),
        }
    }

    /// Clock time at which the countdown reaches zero, given the seconds left.
    pub fn round_end_ms(&self, timer_secs: u32) -> Option<u64> {
        let remaining = u64::from(timer_secs.checked_sub(1)?);
        Some(
            self.countdown
                .next_due_ms
                .saturating_add(remaining.saturating_mul(Self::SECOND_MS)),
        )
    }

    /// Tasks due at or before `now_ms`, ordered by due time.
    ///
    /// Ties resolve countdown, then power-up, then orb.
    pub fn due_tasks(&mut self, now_ms: u64) -> Vec<ScheduledTask> {
        let mut tasks: Vec<(u64, ScheduledTask)> = Vec::new();
        let mut due = Vec::new();

        for (timer, task) in [
            (&mut self.countdown, ScheduledTask::CountdownTick),
            (&mut self.powerup_spawn, ScheduledTask::SpawnPowerup),
            (&mut self.orb_spawn, ScheduledTask::SpawnOrb),
        ] {
            due.clear();
            timer.drain_due(now_ms, &mut due);
            tasks.extend(due.iter().map(|t| (*t, task)));
        }

        tasks.sort();
        tasks.into_iter().map(|(_, task)| task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_per_period() {
        let mut timer = IntervalTimer::new(1000, 0);
        let mut out = Vec::new();

        timer.drain_due(999, &mut out);
        assert!(out.is_empty());

        timer.drain_due(3500, &mut out);
        assert_eq!(out, vec![1000, 2000, 3000]);
        assert_eq!(timer.next_due_ms, 4000);
    }

    #[test]
    fn test_disabled_interval() {
        let mut timer = IntervalTimer::new(0, 0);
        let mut out = Vec::new();
        timer.drain_due(u64::MAX / 2, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_interval_stops_at_clock_limit() {
        let mut timer = IntervalTimer::new(1000, u64::MAX - 1500);
        let mut out = Vec::new();

        timer.drain_due(u64::MAX, &mut out);
        assert_eq!(out, vec![u64::MAX - 500]);

        out.clear();
        timer.drain_due(u64::MAX, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_round_end_time() {
        let mut schedule = Schedule::new(&RoundConfig::default());
        assert_eq!(schedule.round_end_ms(120), Some(120_000));
        assert_eq!(schedule.round_end_ms(0), None);

        schedule.due_tasks(2_500);
        assert_eq!(schedule.round_end_ms(118), Some(120_000));
    }

    #[test]
    fn test_due_tasks_ordering() {
        let mut schedule = Schedule::new(&RoundConfig::default());

        let tasks = schedule.due_tasks(16_000);

        let countdowns = tasks.iter().filter(|t| **t == ScheduledTask::CountdownTick).count();
        let powerups = tasks.iter().filter(|t| **t == ScheduledTask::SpawnPowerup).count();
        let orbs = tasks.iter().filter(|t| **t == ScheduledTask::SpawnOrb).count();
        assert_eq!((countdowns, powerups, orbs), (16, 1, 2));

        // The 8 s orb fires after the 8 s countdown tick and before the 9 s one
        let first_orb = tasks.iter().position(|t| *t == ScheduledTask::SpawnOrb).unwrap();
        assert_eq!(first_orb, 8);

        assert!(schedule.due_tasks(16_000).is_empty());
    }
}
