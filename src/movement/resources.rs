//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Physical constants of the locomotion state machine, in pixels and
/// fixed steps. Loaded from `assets/data/locomotion.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocomotionTuning {
    pub walk_speed: f32,
    pub crouch_speed: f32,
    pub jump_impulse: f32,
    pub max_fall_speed: f32,
    pub dash_speed: f32,
    /// Dash length in fixed steps
    pub dash_ticks: u32,
    /// Fraction of walk speed airborne velocity may change per step
    pub air_control_ratio: f32,
    pub gravity: f32,
    pub nominal_gravity_scale: f32,
    pub ground_probe_height: f32,
    pub ground_probe_width_ratio: f32,
    pub wall_probe_distance: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            walk_speed: 280.0,
            crouch_speed: 140.0,
            jump_impulse: 560.0,
            max_fall_speed: 600.0,
            dash_speed: 480.0,
            dash_ticks: 8,
            air_control_ratio: 0.1,
            gravity: 1400.0,
            nominal_gravity_scale: 1.0,
            ground_probe_height: 4.0,
            ground_probe_width_ratio: 0.8,
            wall_probe_distance: 4.0,
        }
    }
}

impl LocomotionTuning {
    /// Maximum height of a standing jump: h = v² / (2g)
    pub fn jump_height(&self) -> f32 {
        self.jump_impulse * self.jump_impulse / (2.0 * self.gravity * self.nominal_gravity_scale)
    }

    /// Seconds from takeoff to the apex of a jump.
    pub fn time_to_apex(&self) -> f32 {
        self.jump_impulse / (self.gravity * self.nominal_gravity_scale)
    }

    /// Largest per-step horizontal velocity change while airborne.
    pub fn air_control_step(&self) -> f32 {
        self.walk_speed * self.air_control_ratio
    }
}

/// Live keyboard sample, refreshed every frame and consumed by the fixed step.
#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub axis: Vec2,
    pub jump_held: bool,
    pub dash_held: bool,
    pub crouch_held: bool,
}

impl MovementInput {
    pub fn raw(&self) -> crate::movement::RawInput {
        crate::movement::RawInput {
            jump: self.jump_held,
            dash: self.dash_held,
            crouch: self.crouch_held,
            direction: self.axis,
        }
    }
}
