//! Movement domain: the per-character controller aggregate.
//!
//! A [`CharacterController`] owns the input channels, the locomotion state
//! and (optionally) the sequencer for one character. It is built once with
//! [`CharacterController::new`] and stepped in a fixed order: sample input,
//! step locomotion, advance the script.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{
    InputChannels, Locomotion, LocomotionTuning, PhysicsProbe, RawInput, StepReport,
};
use crate::scripting::Sequencer;

/// Where a character's input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum InputMode {
    /// Keyboard, overridden by the sequencer while it executes
    #[default]
    Live,
    /// Sequencer only; neutral input when no sequence runs
    Scripted,
}

/// Misconfiguration detected while setting up a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    MissingSequencer,
    MissingPhysics {
        entity: Entity,
        component: &'static str,
    },
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::MissingSequencer => {
                write!(f, "Scripted input requires a sequencer, none was given")
            }
            ControllerError::MissingPhysics { entity, component } => {
                write!(f, "Character {} has no {} component", entity, component)
            }
        }
    }
}

impl std::error::Error for ControllerError {}

#[derive(Component, Debug)]
pub struct CharacterController {
    mode: InputMode,
    channels: InputChannels,
    locomotion: Locomotion,
    sequencer: Option<Sequencer>,
    last_report: StepReport,
}

impl CharacterController {
    pub fn new(
        tuning: &LocomotionTuning,
        mode: InputMode,
        sequencer: Option<Sequencer>,
    ) -> Result<Self, ControllerError> {
        if mode == InputMode::Scripted && sequencer.is_none() {
            return Err(ControllerError::MissingSequencer);
        }

        Ok(Self {
            mode,
            channels: InputChannels::default(),
            locomotion: Locomotion::new(tuning),
            sequencer,
            last_report: StepReport::default(),
        })
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn channels(&self) -> &InputChannels {
        &self.channels
    }

    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn sequencer(&self) -> Option<&Sequencer> {
        self.sequencer.as_ref()
    }

    pub fn sequencer_mut(&mut self) -> Option<&mut Sequencer> {
        self.sequencer.as_mut()
    }

    /// Outcome of the most recent locomotion step.
    pub fn last_report(&self) -> StepReport {
        self.last_report
    }

    pub fn is_jump_active(&self) -> bool {
        self.channels.is_jump_active()
    }

    pub fn is_dash_active(&self) -> bool {
        self.channels.is_dash_active()
    }

    pub fn is_crouch_active(&self) -> bool {
        self.channels.is_crouch_active()
    }

    pub fn direction_x(&self) -> f32 {
        self.channels.direction_x()
    }

    pub fn direction_y(&self) -> f32 {
        self.channels.direction_y()
    }

    /// Whether this step's input comes from the sequencer.
    pub fn uses_scripted_input(&self) -> bool {
        match self.mode {
            InputMode::Scripted => true,
            InputMode::Live => self.sequencer.as_ref().is_some_and(Sequencer::is_executing),
        }
    }

    /// Edge-detect this step's input from the live sample or the sequencer.
    pub fn sample_input(&mut self, live: &RawInput) {
        let raw = if self.uses_scripted_input() {
            self.sequencer
                .as_ref()
                .map(Sequencer::synthesized)
                .unwrap_or(RawInput::NEUTRAL)
        } else {
            *live
        };
        self.channels.sample(&raw);
    }

    pub fn step_locomotion(
        &mut self,
        tuning: &LocomotionTuning,
        velocity: Vec2,
        probe: &impl PhysicsProbe,
    ) -> StepReport {
        self.locomotion.sync_velocity(velocity);
        self.last_report = self.locomotion.step(tuning, &self.channels, probe);
        self.last_report
    }

    /// Sequencer bookkeeping after the locomotion step.
    pub fn advance_script(&mut self, now: f32, landed: bool) {
        let Some(sequencer) = self.sequencer.as_mut() else {
            return;
        };
        if landed {
            sequencer.on_landed(now);
        }
        sequencer.update(now);
    }

    /// One full fixed step: input, locomotion, script.
    pub fn step(
        &mut self,
        now: f32,
        tuning: &LocomotionTuning,
        live: &RawInput,
        velocity: Vec2,
        probe: &impl PhysicsProbe,
    ) -> StepReport {
        self.sample_input(live);
        let report = self.step_locomotion(tuning, velocity, probe);
        self.advance_script(now, report.landed);
        report
    }

    /// Dash without going through the input channels.
    pub fn trigger_dash(&mut self, tuning: &LocomotionTuning, direction: Vec2) -> bool {
        self.locomotion.trigger_dash(tuning, direction)
    }

    pub fn reset_to_idle(&mut self, tuning: &LocomotionTuning) {
        self.locomotion.reset_to_idle(tuning);
    }

    pub fn set_crouching(&mut self, crouching: bool) {
        self.locomotion.set_crouching(crouching);
    }
}
