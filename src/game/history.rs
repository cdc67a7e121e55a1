//! Position History
//!
//! Bounded FIFO of past positions that the reversal power-up plays back.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

/// Order in which a reversal consumes recorded positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversalOrder {
    /// Replay from the earliest stored position forward
    #[default]
    OldestFirst,
    /// True rewind: most recent position first
    NewestFirst,
}

/// Ring of the last `CAPACITY` positions, oldest at the front.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionHistory {
    entries: VecDeque<Vec2>,
}

impl PositionHistory {
    /// Maximum number of stored positions (6 seconds at 60 Hz).
    pub const CAPACITY: usize = 360;

    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(Self::CAPACITY + 1),
        }
    }

    /// Append a position, evicting the oldest when over capacity.
    pub fn record(&mut self, position: Vec2) {
        self.entries.push_back(position);
        if self.entries.len() > Self::CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Remove the next position to replay.
    pub fn pop(&mut self, order: ReversalOrder) -> Option<Vec2> {
        match order {
            ReversalOrder::OldestFirst => self.entries.pop_front(),
            ReversalOrder::NewestFirst => self.entries.pop_back(),
        }
    }

    /// Number of stored positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No positions stored?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.entries.iter().copied()
    }

    /// Drop all stored positions.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
