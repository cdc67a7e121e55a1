//! Rendering Module
//!
//! Turns a `WorldState` into a backend-neutral draw list. Nothing here
//! touches the simulation; a frame is rebuilt from scratch every tick.
//!
//! - `scene`: frame and HUD builders

pub mod scene;

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

pub use scene::{build_frame, end_of_round_message, hud_timer_text, Hud};

/// Packed RGBA color, `0xRRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Canvas background
    pub const BACKGROUND: Color = Color(0x1A1A2EFF);
    /// Platforms
    pub const PLATFORM: Color = Color(0x8B8B8BFF);
    /// Player One, blue orbs
    pub const BLUE: Color = Color(0x3A7BFFFF);
    /// Player Two, green orbs
    pub const GREEN: Color = Color(0x2ECC71FF);
    /// Red orbs
    pub const RED: Color = Color(0xE74C3CFF);
    /// Orange orbs
    pub const ORANGE: Color = Color(0xF39C12FF);
    /// Purple orbs
    pub const PURPLE: Color = Color(0x9B59B6FF);
    /// Speed power-up
    pub const YELLOW: Color = Color(0xF1C40FFF);
    /// Shield power-up
    pub const CYAN: Color = Color(0x00E5FFFF);
    /// HUD text
    pub const WHITE: Color = Color(0xFFFFFFFF);
    /// Tagger marker
    pub const GOLD: Color = Color(0xFFD700FF);

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Color((self.0 & 0xFFFF_FF00) | alpha as u32)
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// One drawing primitive, in world coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Fill the whole viewport
    Clear {
        /// Fill color
        color: Color,
    },
    /// Solid rectangle
    FillRect {
        /// Top-left corner
        origin: Vec2,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Fill color
        color: Color,
    },
    /// Rectangle outline
    StrokeRect {
        /// Top-left corner
        origin: Vec2,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Line color
        color: Color,
        /// Line width in pixels
        line_width: f32,
    },
    /// Solid circle
    FillCircle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f32,
        /// Fill color
        color: Color,
    },
    /// Text anchored at its center
    Text {
        /// Contents
        text: String,
        /// Anchor point
        center: Vec2,
        /// Font size in pixels
        size: f32,
        /// Text color
        color: Color,
    },
}

/// Draw list for one tick, sized to the viewport.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Viewport width
    pub width: f32,
    /// Viewport height
    pub height: f32,
    /// Commands in paint order
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Empty frame for a viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(64),
        }
    }

    /// Append a command.
    #[inline]
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Nothing drawn?
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn this frame.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
