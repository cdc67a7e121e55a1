//! Input Capture and Normalization
//!
//! Key bindings, held-key tracking and the per-tick `InputFrame` each player
//! feeds into physics. Held state is sampled once per tick.

use serde::{Serialize, Deserialize};

use crate::game::state::PlayerSlot;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Held controls for one player on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    /// Control flags (packed bits):
    /// - Bit 0: Left held
    /// - Bit 1: Right held
    /// - Bit 2: Jump held
    pub flags: u8,
}

impl InputFrame {
    /// Left flag bit
    pub const FLAG_LEFT: u8 = 0x01;

    /// Right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;

    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x04;

    const MASK: u8 = Self::FLAG_LEFT | Self::FLAG_RIGHT | Self::FLAG_JUMP;

    /// Create an idle input frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create from raw flag bits; unknown bits are dropped.
    pub const fn from_bits(flags: u8) -> Self {
        Self { flags: flags & Self::MASK }
    }

    /// Builder: set left.
    pub fn with_left(mut self, held: bool) -> Self {
        self.set(Control::Left, held);
        self
    }

    /// Builder: set right.
    pub fn with_right(mut self, held: bool) -> Self {
        self.set(Control::Right, held);
        self
    }

    /// Builder: set jump.
    pub fn with_jump(mut self, held: bool) -> Self {
        self.set(Control::Jump, held);
        self
    }

    /// Set or clear a control.
    pub fn set(&mut self, control: Control, held: bool) {
        let bit = control.flag();
        if held {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }

    /// Check if left is held.
    #[inline]
    pub fn left_held(&self) -> bool {
        self.flags & Self::FLAG_LEFT != 0
    }

    /// Check if right is held.
    #[inline]
    pub fn right_held(&self) -> bool {
        self.flags & Self::FLAG_RIGHT != 0
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump_held(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Horizontal direction: +1 right, -1 left, 0 idle.
    ///
    /// Right wins when both are held.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        if self.right_held() {
            1.0
        } else if self.left_held() {
            -1.0
        } else {
            0.0
        }
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

/// Inputs for both players on one tick, indexed by `PlayerSlot::index`.
pub type PlayerInputs = [InputFrame; 2];

/// One of the three per-player controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    /// Move left
    Left,
    /// Move right
    Right,
    /// Jump
    Jump,
}

impl Control {
    #[inline]
    fn flag(self) -> u8 {
        match self {
            Control::Left => InputFrame::FLAG_LEFT,
            Control::Right => InputFrame::FLAG_RIGHT,
            Control::Jump => InputFrame::FLAG_JUMP,
        }
    }
}

// =============================================================================
// KEY BINDINGS
// =============================================================================

/// Key identifiers for one player's controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    /// Key for moving left
    pub left: String,
    /// Key for moving right
    pub right: String,
    /// Key for jumping
    pub jump: String,
}

impl ControlScheme {
    /// Create a scheme from key identifiers.
    pub fn new(left: &str, right: &str, jump: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            jump: jump.to_string(),
        }
    }

    fn control_for(&self, key: &str) -> Option<Control> {
        if key == self.left {
            Some(Control::Left)
        } else if key == self.right {
            Some(Control::Right)
        } else if key == self.jump {
            Some(Control::Jump)
        } else {
            None
        }
    }
}

/// Fixed key bindings for both players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Player One controls
    pub one: ControlScheme,
    /// Player Two controls
    pub two: ControlScheme,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            one: ControlScheme::new("KeyA", "KeyD", "KeyW"),
            two: ControlScheme::new("ArrowLeft", "ArrowRight", "ArrowUp"),
        }
    }
}

impl KeyBindings {
    /// Scheme for a slot.
    pub fn scheme(&self, slot: PlayerSlot) -> &ControlScheme {
        match slot {
            PlayerSlot::One => &self.one,
            PlayerSlot::Two => &self.two,
        }
    }

    /// Resolve a key to the player and control it drives.
    ///
    /// Player One's bindings take precedence on conflict.
    pub fn lookup(&self, key: &str) -> Option<(PlayerSlot, Control)> {
        PlayerSlot::ALL
            .into_iter()
            .find_map(|slot| self.scheme(slot).control_for(key).map(|c| (slot, c)))
    }
}

// =============================================================================
// KEYBOARD STATE
// =============================================================================

/// Held-key tracker fed by key down/up events.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    held: PlayerInputs,
}

impl KeyboardState {
    /// Create with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release. Returns false for unbound keys.
    pub fn set_key(&mut self, bindings: &KeyBindings, key: &str, pressed: bool) -> bool {
        match bindings.lookup(key) {
            Some((slot, control)) => {
                self.held[slot.index()].set(control, pressed);
                true
            }
            None => false,
        }
    }

    /// Sample held state for this tick.
    pub fn sample(&self) -> PlayerInputs {
        self.held
    }

    /// Release everything (e.g. on focus loss).
    pub fn release_all(&mut self) {
        self.held = [InputFrame::new(); 2];
    }
}

// =============================================================================
// INPUT BUFFER
// =============================================================================

/// Delta-compressed input entry. Only stored when input changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

/// Complete input recording for one player in one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInputBuffer {
    /// Player slot
    pub slot: PlayerSlot,

    /// Last recorded tick
    pub end_tick: u32,

    /// Ticks where input changed
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl PlayerInputBuffer {
    /// Create a new input buffer for a player.
    pub fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            end_tick: 0,
            deltas: Vec::with_capacity(512),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta { tick, frame });
            self.last_frame = frame;
        }
    }

    /// Get input at a specific tick.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
