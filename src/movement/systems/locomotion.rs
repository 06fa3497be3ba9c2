//! Movement domain: fixed-step locomotion systems.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::probe::{SpatialProbe, collider_half_extents};
use crate::movement::{CharacterController, CharacterLanded, LocomotionTuning, MovementInput};

pub(crate) fn sample_input(
    input: Res<MovementInput>,
    mut query: Query<&mut CharacterController>,
) {
    let live = input.raw();
    for mut controller in &mut query {
        controller.sample_input(&live);
    }
}

pub(crate) fn step_locomotion(
    spatial_query: SpatialQuery,
    sensors: Query<(), With<Sensor>>,
    tuning: Res<LocomotionTuning>,
    mut query: Query<(
        Entity,
        &Transform,
        &Collider,
        &mut CharacterController,
        &mut LinearVelocity,
        &mut GravityScale,
    )>,
    mut landed: MessageWriter<CharacterLanded>,
) {
    for (entity, transform, collider, mut controller, mut velocity, mut gravity) in &mut query {
        let probe = SpatialProbe {
            spatial_query: &spatial_query,
            sensors: &sensors,
            entity,
            position: transform.translation.truncate(),
            half_extents: collider_half_extents(collider),
            tuning: &tuning,
        };

        let report = controller.step_locomotion(&tuning, velocity.0, &probe);

        let locomotion = controller.locomotion();
        velocity.0 = locomotion.velocity();
        gravity.0 = locomotion.gravity_scale();

        if report.landed {
            landed.write(CharacterLanded { entity });
        }
    }
}

/// Keep the physics gravity in step with the loaded tuning.
pub(crate) fn apply_gravity_tuning(tuning: Res<LocomotionTuning>, mut gravity: ResMut<Gravity>) {
    gravity.0 = Vec2::NEG_Y * tuning.gravity;
    info!(
        "Gravity set to {} (jump height {:.1}, apex in {:.2}s)",
        tuning.gravity,
        tuning.jump_height(),
        tuning.time_to_apex()
    );
}
