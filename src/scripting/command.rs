//! Scripting domain: timed commands and command sequences.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const JUMP_COMMAND_DURATION: f32 = 0.1;
pub const DASH_COMMAND_DURATION: f32 = 0.1;
pub const DEFAULT_COMMAND_DURATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CommandKind {
    Jump,
    Dash,
    Walk,
    Crouch,
    Idle,
    Wait,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub direction: Vec2,
    pub duration: f32,
    /// Pause before this command, expanded into a Wait when queued
    pub delay: f32,
    pub is_executing: bool,
    pub start_time: f32,
    pub has_triggered_action: bool,
}

impl Command {
    pub fn new(kind: CommandKind, direction: Vec2, duration: f32) -> Self {
        Self {
            kind,
            direction,
            duration,
            delay: 0.0,
            is_executing: false,
            start_time: 0.0,
            has_triggered_action: false,
        }
    }

    pub fn jump(direction: Vec2) -> Self {
        Self::new(CommandKind::Jump, direction, JUMP_COMMAND_DURATION)
    }

    pub fn dash(direction: Vec2) -> Self {
        Self::new(CommandKind::Dash, direction, DASH_COMMAND_DURATION)
    }

    pub fn walk(direction: Vec2, duration: f32) -> Self {
        Self::new(CommandKind::Walk, direction, duration)
    }

    pub fn crouch(duration: f32) -> Self {
        Self::new(CommandKind::Crouch, Vec2::ZERO, duration)
    }

    pub fn idle(duration: f32) -> Self {
        Self::new(CommandKind::Idle, Vec2::ZERO, duration)
    }

    pub fn wait(duration: f32) -> Self {
        Self::new(CommandKind::Wait, Vec2::ZERO, duration)
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn begin(&mut self, now: f32) {
        self.is_executing = true;
        self.start_time = now;
        self.has_triggered_action = false;
    }

    pub(crate) fn finish(&mut self) {
        self.is_executing = false;
        self.has_triggered_action = false;
    }

    pub(crate) fn is_expired(&self, now: f32) -> bool {
        now - self.start_time >= self.duration
    }
}

/// Ordered commands plus the execution cursor.
#[derive(Debug, Clone, Default)]
pub struct CommandSequence {
    pub commands: Vec<Command>,
    pub current_index: usize,
    pub is_executing: bool,
    pub looping: bool,
    pub start_delay: f32,
}

impl CommandSequence {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn current(&self) -> Option<&Command> {
        self.commands.get(self.current_index)
    }

    /// Sum of all command durations.
    pub fn total_duration(&self) -> f32 {
        self.commands.iter().map(|c| c.duration).sum()
    }
}
