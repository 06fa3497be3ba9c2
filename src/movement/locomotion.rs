//! Movement domain: the locomotion state machine.
//!
//! Walk/idle, airborne, dashing and crouching are derived from a handful of
//! flags rather than a single enum. [`Locomotion::step`] runs once per fixed
//! step and is the only writer of those flags.

use bevy::prelude::*;

use crate::movement::{EdgeState, Facing, InputChannels, LocomotionTuning};

/// Read-only view of the physics world around one character.
pub trait PhysicsProbe {
    /// Non-trigger shapes, other than the character itself, overlapping the
    /// thin probe box under the character's feet.
    fn ground_contacts(&self) -> usize;

    /// Whether the character's shape, swept `distance` along `direction`,
    /// hits wall geometry.
    fn wall_hit(&self, direction: Dir2, distance: f32) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashEnd {
    Timeout,
    Wall,
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub grounded: bool,
    /// Airborne last step, grounded and not dashing this step
    pub landed: bool,
    pub jumped: bool,
    pub dash_started: bool,
    pub dash_ended: Option<DashEnd>,
}

#[derive(Debug, Clone)]
pub struct Locomotion {
    velocity: Vec2,
    facing: Facing,
    grounded: bool,
    airborne: bool,
    gravity_scale: f32,
    dash_ticks: u32,
    dash_direction: Vec2,
    can_dash: bool,
    is_dashing: bool,
    is_crouching: bool,
}

impl Locomotion {
    pub fn new(tuning: &LocomotionTuning) -> Self {
        Self {
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            grounded: false,
            airborne: false,
            gravity_scale: tuning.nominal_gravity_scale,
            dash_ticks: 0,
            dash_direction: Vec2::ZERO,
            can_dash: true,
            is_dashing: false,
            is_crouching: false,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn dash_ticks(&self) -> u32 {
        self.dash_ticks
    }

    pub fn dash_direction(&self) -> Vec2 {
        self.dash_direction
    }

    pub fn can_dash(&self) -> bool {
        self.can_dash
    }

    pub fn is_dashing(&self) -> bool {
        self.is_dashing
    }

    pub fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    /// Grounded, not dashing, not crouching. The only state a jump may start from.
    pub fn is_walk_or_idle(&self) -> bool {
        self.grounded && !self.is_dashing && !self.is_crouching
    }

    /// Pull in the velocity the physics integrator produced since the last step.
    pub fn sync_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Advance the state machine by one fixed step.
    pub fn step(
        &mut self,
        tuning: &LocomotionTuning,
        input: &InputChannels,
        probe: &impl PhysicsProbe,
    ) -> StepReport {
        let was_airborne = self.airborne;
        self.grounded = probe.ground_contacts() > 0;
        self.airborne = !self.grounded;

        let mut report = StepReport {
            grounded: self.grounded,
            ..default()
        };

        self.update_facing(input.direction_x());
        self.update_crouch(input.crouch());
        self.update_dash(tuning, input, probe, &mut report);
        self.update_velocity(tuning, input, &mut report);

        if self.is_walk_or_idle() && !self.can_dash {
            self.can_dash = true;
            debug!("Grounded in walk/idle: dash restored");
        }

        if was_airborne && self.grounded && !self.is_dashing {
            self.enter_idle(tuning);
            report.landed = true;
            debug!("Landed: velocity={:?}", self.velocity);
        }

        report
    }

    /// Start a dash directly, bypassing the input channels. Returns whether
    /// the dash guards allowed it.
    pub fn trigger_dash(&mut self, tuning: &LocomotionTuning, direction: Vec2) -> bool {
        if !self.can_start_dash() {
            debug!(
                "Direct dash rejected: can_dash={}, dashing={}, crouching={}",
                self.can_dash, self.is_dashing, self.is_crouching
            );
            return false;
        }
        let direction = self.resolve_dash_direction(direction);
        self.begin_dash(tuning, direction);
        true
    }

    /// Force the idle state, e.g. after a respawn.
    pub fn reset_to_idle(&mut self, tuning: &LocomotionTuning) {
        self.enter_idle(tuning);
    }

    /// External crouch override. Ignored while dashing.
    pub fn set_crouching(&mut self, crouching: bool) {
        if crouching && self.is_dashing {
            return;
        }
        self.is_crouching = crouching;
    }

    fn update_facing(&mut self, x: f32) {
        if self.is_dashing {
            return;
        }
        if x > 0.0 {
            self.facing = Facing::Right;
        } else if x < 0.0 {
            self.facing = Facing::Left;
        }
    }

    fn update_crouch(&mut self, crouch: EdgeState) {
        match crouch {
            EdgeState::Down | EdgeState::Held => {
                if self.grounded && !self.is_dashing {
                    self.is_crouching = true;
                }
            }
            EdgeState::Up => self.is_crouching = false,
            EdgeState::Off => {}
        }
    }

    fn update_dash(
        &mut self,
        tuning: &LocomotionTuning,
        input: &InputChannels,
        probe: &impl PhysicsProbe,
        report: &mut StepReport,
    ) {
        if input.dash().is_down() {
            if self.can_start_dash() {
                let direction = self.resolve_dash_direction(input.direction());
                self.begin_dash(tuning, direction);
                report.dash_started = true;
            } else {
                debug!(
                    "Dash rejected: can_dash={}, dashing={}, crouching={}",
                    self.can_dash, self.is_dashing, self.is_crouching
                );
            }
        }

        if !self.is_dashing {
            return;
        }

        if self.dash_ticks == 0 {
            self.end_dash(tuning);
            report.dash_ended = Some(DashEnd::Timeout);
            return;
        }

        // Other systems may have restored gravity since the last step.
        self.gravity_scale = 0.0;

        if self.blocked_by_wall(tuning, probe) {
            self.end_dash(tuning);
            report.dash_ended = Some(DashEnd::Wall);
            debug!("Dash stopped by wall");
            return;
        }

        self.velocity = self.dash_direction * tuning.dash_speed;
        self.dash_ticks -= 1;
    }

    fn update_velocity(
        &mut self,
        tuning: &LocomotionTuning,
        input: &InputChannels,
        report: &mut StepReport,
    ) {
        let x = input.direction_x();

        if !self.is_dashing {
            if self.grounded {
                let speed = if self.is_crouching {
                    tuning.crouch_speed
                } else {
                    tuning.walk_speed
                };
                self.velocity.x = x * speed;
            } else if x != 0.0 {
                let target = x * tuning.walk_speed;
                let max_change = tuning.air_control_step();
                let change = (target - self.velocity.x).clamp(-max_change, max_change);
                self.velocity.x += change;
            }
        }

        if input.jump().is_down() {
            if self.is_walk_or_idle() {
                self.velocity = Vec2::new(x * tuning.walk_speed, tuning.jump_impulse);
                report.jumped = true;
                debug!("Jump: velocity={:?}", self.velocity);
            } else {
                debug!(
                    "Jump rejected: grounded={}, dashing={}, crouching={}",
                    self.grounded, self.is_dashing, self.is_crouching
                );
            }
        }

        if self.velocity.y < -tuning.max_fall_speed {
            self.velocity.y = -tuning.max_fall_speed;
        }
    }

    fn can_start_dash(&self) -> bool {
        self.can_dash && !self.is_dashing && !self.is_crouching
    }

    fn resolve_dash_direction(&self, direction: Vec2) -> Vec2 {
        let normalized = direction.normalize_or_zero();
        if normalized == Vec2::ZERO {
            self.facing.unit()
        } else {
            normalized
        }
    }

    fn begin_dash(&mut self, tuning: &LocomotionTuning, direction: Vec2) {
        self.can_dash = false;
        self.is_dashing = true;
        self.dash_ticks = tuning.dash_ticks;
        self.dash_direction = direction;
        self.gravity_scale = 0.0;
        self.velocity = direction * tuning.dash_speed;
        debug!("Dash: direction={:?}, velocity={:?}", direction, self.velocity);
    }

    fn end_dash(&mut self, tuning: &LocomotionTuning) {
        self.velocity = Vec2::ZERO;
        self.gravity_scale = tuning.nominal_gravity_scale;
        self.is_dashing = false;
        self.dash_ticks = 0;
    }

    fn blocked_by_wall(&self, tuning: &LocomotionTuning, probe: &impl PhysicsProbe) -> bool {
        let distance = tuning.wall_probe_distance;
        let horizontal = match self.dash_direction.x {
            x if x > 0.0 => Some(Dir2::X),
            x if x < 0.0 => Some(Dir2::NEG_X),
            _ => None,
        };
        let vertical = match self.dash_direction.y {
            y if y > 0.0 => Some(Dir2::Y),
            y if y < 0.0 => Some(Dir2::NEG_Y),
            _ => None,
        };

        horizontal.is_some_and(|dir| probe.wall_hit(dir, distance))
            || vertical.is_some_and(|dir| probe.wall_hit(dir, distance))
    }

    fn enter_idle(&mut self, tuning: &LocomotionTuning) {
        self.is_dashing = false;
        self.dash_ticks = 0;
        if self.grounded {
            self.can_dash = true;
        }
        self.is_crouching = false;
        self.gravity_scale = tuning.nominal_gravity_scale;
    }
}
