//! Movement domain: edge-triggered input channels.

use bevy::prelude::*;

/// Per-step transition state of a single input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeState {
    #[default]
    Off,
    /// Became active this step
    Down,
    Held,
    /// Became inactive this step
    Up,
}

impl EdgeState {
    /// Advance the edge state by one step given the raw sample.
    pub fn next(self, raw: bool) -> Self {
        match (raw, self) {
            (true, EdgeState::Off | EdgeState::Up) => EdgeState::Down,
            (true, EdgeState::Down | EdgeState::Held) => EdgeState::Held,
            (false, EdgeState::Down | EdgeState::Held) => EdgeState::Up,
            (false, EdgeState::Up | EdgeState::Off) => EdgeState::Off,
        }
    }

    pub fn is_down(self) -> bool {
        self == EdgeState::Down
    }

    /// Down or Held.
    pub fn is_active(self) -> bool {
        matches!(self, EdgeState::Down | EdgeState::Held)
    }
}

/// One raw input sample, from the keyboard or from a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawInput {
    pub jump: bool,
    pub dash: bool,
    pub crouch: bool,
    pub direction: Vec2,
}

impl RawInput {
    pub const NEUTRAL: Self = Self {
        jump: false,
        dash: false,
        crouch: false,
        direction: Vec2::ZERO,
    };
}

/// Edge states of the jump, dash and crouch channels plus the
/// continuous direction axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputChannels {
    jump: EdgeState,
    dash: EdgeState,
    crouch: EdgeState,
    direction: Vec2,
}

impl InputChannels {
    /// Fold one raw sample into the channels. Called once per fixed step.
    pub fn sample(&mut self, raw: &RawInput) {
        self.jump = self.jump.next(raw.jump);
        self.dash = self.dash.next(raw.dash);
        self.crouch = self.crouch.next(raw.crouch);
        self.direction = raw.direction;
    }

    pub fn jump(&self) -> EdgeState {
        self.jump
    }

    pub fn dash(&self) -> EdgeState {
        self.dash
    }

    pub fn crouch(&self) -> EdgeState {
        self.crouch
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn is_jump_active(&self) -> bool {
        self.jump.is_active()
    }

    pub fn is_dash_active(&self) -> bool {
        self.dash.is_active()
    }

    pub fn is_crouch_active(&self) -> bool {
        self.crouch.is_active()
    }

    pub fn direction_x(&self) -> f32 {
        self.direction.x
    }

    pub fn direction_y(&self) -> f32 {
        self.direction.y
    }
}
