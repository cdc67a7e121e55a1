//! Scene Builder
//!
//! Paint order: background, platforms, orbs, power-ups, players, then the
//! end-of-round banner. Shielded players are drawn as an outline only.

use crate::core::vec2::Vec2;
use crate::game::state::{
    OrbColor, Platform, PlayerSlot, PlayerState, PowerupState, PowerupType, RoundPhase, WorldState,
};
use crate::render::{Color, DrawCommand, Frame};

const SHIELD_LINE_WIDTH: f32 = 3.0;
const TAGGER_MARK_SIZE: f32 = 8.0;
const BANNER_TEXT_SIZE: f32 = 32.0;

/// Heads-up display state shown outside the playfield.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Countdown text
    pub timer_text: String,
    /// Slot currently "it"
    pub tagger: PlayerSlot,
    /// Set once the round has ended
    pub message: Option<String>,
}

impl Hud {
    /// Snapshot the HUD for the current state.
    pub fn from_state(state: &WorldState) -> Self {
        let message = match state.phase {
            RoundPhase::Ended { loser } => Some(end_of_round_message(loser)),
            RoundPhase::Playing => None,
        };
        Self {
            timer_text: hud_timer_text(state),
            tagger: state.tagger(),
            message,
        }
    }
}

/// Countdown shown in the HUD: whole seconds remaining.
pub fn hud_timer_text(state: &WorldState) -> String {
    state.timer_secs.to_string()
}

/// Banner announcing the loser.
pub fn end_of_round_message(loser: PlayerSlot) -> String {
    format!("Time's up! {} loses!", loser.name())
}

fn player_color(slot: PlayerSlot) -> Color {
    match slot {
        PlayerSlot::One => Color::BLUE,
        PlayerSlot::Two => Color::GREEN,
    }
}

fn powerup_color(powerup_type: PowerupType) -> Color {
    match powerup_type {
        PowerupType::Speed => Color::YELLOW,
        PowerupType::Shield => Color::CYAN,
        PowerupType::Swap => Color::ORANGE,
        PowerupType::Elevator => Color::WHITE,
        PowerupType::Reversal => Color::PURPLE,
    }
}

fn orb_color(color: OrbColor) -> Color {
    match color {
        OrbColor::Red => Color::RED,
        OrbColor::Green => Color::GREEN,
        OrbColor::Blue => Color::BLUE,
        OrbColor::Orange => Color::ORANGE,
        OrbColor::Purple => Color::PURPLE,
    }
}

/// Build the draw list for the current state.
pub fn build_frame(state: &WorldState) -> Frame {
    let mut frame = Frame::new(state.bounds.width, state.bounds.height);
    frame.push(DrawCommand::Clear { color: Color::BACKGROUND });

    for platform in &state.platforms {
        draw_platform(&mut frame, platform);
    }

    for orb in &state.orbs {
        let color = orb_color(orb.color);
        for center in [orb.a, orb.b] {
            frame.push(DrawCommand::FillCircle {
                center,
                radius: crate::game::state::OrbState::RADIUS,
                color,
            });
        }
    }

    for powerup in &state.powerups {
        draw_powerup(&mut frame, powerup);
    }

    for player in &state.players {
        draw_player(&mut frame, player);
    }

    if let RoundPhase::Ended { loser } = state.phase {
        frame.push(DrawCommand::Text {
            text: end_of_round_message(loser),
            center: Vec2::new(state.bounds.width / 2.0, state.bounds.height / 2.0),
            size: BANNER_TEXT_SIZE,
            color: Color::WHITE,
        });
    }

    frame
}

fn draw_platform(frame: &mut Frame, platform: &Platform) {
    frame.push(DrawCommand::FillRect {
        origin: Vec2::new(platform.x, platform.y),
        width: platform.width,
        height: Platform::HEIGHT,
        color: Color::PLATFORM,
    });
}

fn draw_powerup(frame: &mut Frame, powerup: &PowerupState) {
    frame.push(DrawCommand::FillRect {
        origin: powerup.position,
        width: PowerupState::SIZE,
        height: PowerupState::SIZE,
        color: powerup_color(powerup.powerup_type),
    });
}

fn draw_player(frame: &mut Frame, player: &PlayerState) {
    let color = player_color(player.slot);

    if player.shield {
        frame.push(DrawCommand::StrokeRect {
            origin: player.position,
            width: PlayerState::SIZE,
            height: PlayerState::SIZE,
            color,
            line_width: SHIELD_LINE_WIDTH,
        });
    } else {
        // Translucent while replaying history
        let color = if player.reversal { color.with_alpha(0x80) } else { color };
        frame.push(DrawCommand::FillRect {
            origin: player.position,
            width: PlayerState::SIZE,
            height: PlayerState::SIZE,
            color,
        });
    }

    if player.tagger {
        let offset = (PlayerState::SIZE - TAGGER_MARK_SIZE) / 2.0;
        frame.push(DrawCommand::FillRect {
            origin: Vec2::new(player.position.x + offset, player.position.y - TAGGER_MARK_SIZE - 2.0),
            width: TAGGER_MARK_SIZE,
            height: TAGGER_MARK_SIZE,
            color: Color::GOLD,
        });
    }
}
