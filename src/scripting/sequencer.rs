//! Scripting domain: replays a command sequence as synthesized input.

use bevy::prelude::*;

use crate::movement::RawInput;
use crate::scripting::{Command, CommandKind, CommandSequence};

/// Drives one character from a timed command list.
///
/// Every command is held "active" for its whole duration; the edge detector
/// on the receiving side turns that into a single Down step, so one-shot
/// actions fire exactly once per command.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    sequence: CommandSequence,
    synthesized: RawInput,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_executing(&self) -> bool {
        self.sequence.is_executing
    }

    pub fn current_index(&self) -> usize {
        self.sequence.current_index
    }

    pub fn current_command(&self) -> Option<&Command> {
        if self.sequence.is_executing {
            self.sequence.current()
        } else {
            None
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.sequence.commands
    }

    /// Input the character should see this step.
    pub fn synthesized(&self) -> RawInput {
        self.synthesized
    }

    pub fn is_looping(&self) -> bool {
        self.sequence.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.sequence.looping = looping;
    }

    pub fn start_delay(&self) -> f32 {
        self.sequence.start_delay
    }

    pub fn set_start_delay(&mut self, delay: f32) {
        self.sequence.start_delay = delay.max(0.0);
    }

    /// Queue a command. A positive `delay` queues a Wait of that length first.
    pub fn push(&mut self, command: Command) {
        if command.delay > 0.0 {
            self.sequence.commands.push(Command::wait(command.delay));
        }
        self.sequence.commands.push(command);
    }

    pub fn add_jump(&mut self, direction: Vec2) {
        self.push(Command::jump(direction));
    }

    pub fn add_dash(&mut self, direction: Vec2) {
        self.push(Command::dash(direction));
    }

    pub fn add_walk(&mut self, direction: Vec2, duration: f32) {
        self.push(Command::walk(direction, duration));
    }

    pub fn add_crouch(&mut self, duration: f32) {
        self.push(Command::crouch(duration));
    }

    pub fn add_idle(&mut self, duration: f32) {
        self.push(Command::idle(duration));
    }

    pub fn add_wait(&mut self, duration: f32) {
        self.push(Command::wait(duration));
    }

    pub fn start(&mut self, now: f32) {
        if self.sequence.is_empty() {
            debug!("Sequencer start ignored: no commands");
            return;
        }
        self.sequence.is_executing = true;
        self.sequence.current_index = 0;
        self.begin_current(now);
    }

    /// Stop executing and release all synthesized input. Commands are kept.
    pub fn stop(&mut self) {
        self.sequence.is_executing = false;
        self.sequence.current_index = 0;
        for command in &mut self.sequence.commands {
            command.finish();
        }
        self.synthesized = RawInput::NEUTRAL;
    }

    pub fn clear(&mut self) {
        self.stop();
        self.sequence.commands.clear();
    }

    /// Per-step bookkeeping: expire the current command or refresh its input.
    pub fn update(&mut self, now: f32) {
        if !self.sequence.is_executing {
            return;
        }

        if self.sequence.current_index >= self.sequence.len() {
            if self.sequence.looping && !self.sequence.is_empty() {
                debug!("Sequence looped");
                self.sequence.current_index = 0;
                self.begin_current(now);
            } else {
                self.stop();
            }
            return;
        }

        let index = self.sequence.current_index;
        let command = &self.sequence.commands[index];
        if command.is_expired(now) {
            self.advance(now);
        } else if command.start_time < now {
            self.synthesize(index);
        }
        // A command begun at `now` (e.g. by a landing) keeps the input it was
        // begun with, so a released one-shot channel is seen for one step.
    }

    /// The character touched ground after being airborne.
    pub fn on_landed(&mut self, now: f32) {
        self.synthesized.direction = Vec2::ZERO;

        let landing_on_jump = self.sequence.is_executing
            && self
                .sequence
                .current()
                .is_some_and(|c| c.kind == CommandKind::Jump);
        if landing_on_jump {
            debug!("Landed during jump command: advancing");
            self.advance(now);
        }
    }

    fn advance(&mut self, now: f32) {
        let index = self.sequence.current_index;
        let command = &mut self.sequence.commands[index];
        command.finish();
        if command.kind == CommandKind::Crouch {
            self.synthesized.crouch = false;
        }

        self.sequence.current_index += 1;
        if self.sequence.current_index < self.sequence.len() {
            self.begin_current(now);
        } else if self.sequence.looping {
            debug!("Sequence looped");
            self.sequence.current_index = 0;
            self.begin_current(now);
        } else {
            debug!("Sequence finished");
            self.stop();
        }
    }

    fn begin_current(&mut self, now: f32) {
        let index = self.sequence.current_index;
        let command = &mut self.sequence.commands[index];
        command.begin(now);
        debug!(
            "Command {}: {:?} direction={:?} duration={}s",
            index, command.kind, command.direction, command.duration
        );
        self.synthesize(index);
    }

    fn synthesize(&mut self, index: usize) {
        let command = &mut self.sequence.commands[index];
        let input = &mut self.synthesized;
        match command.kind {
            CommandKind::Jump => {
                input.dash = false;
                input.crouch = false;
                input.direction = command.direction;
                input.jump = press_once(input.jump, &mut command.has_triggered_action);
            }
            CommandKind::Dash => {
                input.jump = false;
                input.crouch = false;
                input.direction = command.direction;
                input.dash = press_once(input.dash, &mut command.has_triggered_action);
            }
            CommandKind::Crouch => {
                input.jump = false;
                input.dash = false;
                input.crouch = true;
                input.direction = Vec2::ZERO;
            }
            CommandKind::Walk => {
                *input = RawInput {
                    direction: command.direction,
                    ..RawInput::NEUTRAL
                };
            }
            CommandKind::Idle | CommandKind::Wait => *input = RawInput::NEUTRAL,
        }
    }
}

/// Level for a one-shot channel. A channel still held by the previous command
/// is released for one step so the edge detector sees a fresh Down.
fn press_once(already_active: bool, triggered: &mut bool) -> bool {
    if *triggered {
        return true;
    }
    if already_active {
        return false;
    }
    *triggered = true;
    true
}
