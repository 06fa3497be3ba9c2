//! Movement domain: edge-detected input, the locomotion state machine and
//! the fixed-step systems that drive it.

mod bootstrap;
mod components;
mod controller;
#[cfg(feature = "dev-tools")]
mod dev;
mod edge;
mod events;
mod locomotion;
mod probe;
mod resources;
mod systems;
#[cfg(test)]
mod tests;

pub use bootstrap::{PLAYER_SIZE, sequencer_from_config};
pub use components::{Facing, GameLayer, Ground, Player, Wall};
pub use controller::{CharacterController, ControllerError, InputMode};
pub use edge::{EdgeState, InputChannels, RawInput};
pub use events::CharacterLanded;
pub use locomotion::{DashEnd, Locomotion, PhysicsProbe, StepReport};
pub use probe::{SpatialProbe, collider_half_extents};
pub use resources::{LocomotionTuning, MovementInput};

use bevy::prelude::*;

use crate::movement::bootstrap::spawn_player;
use crate::movement::systems::{
    apply_gravity_tuning, read_input, sample_input, step_locomotion, validate_characters,
};
use crate::scripting::{ScriptingSet, configure_library};

/// Fixed-step ordering for one character: input edges, then locomotion, then
/// sequencer bookkeeping.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    Input,
    Step,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocomotionTuning>()
            .init_resource::<MovementInput>()
            .add_message::<CharacterLanded>()
            .configure_sets(
                FixedUpdate,
                (LocomotionSet::Input, LocomotionSet::Step, ScriptingSet::Advance).chain(),
            )
            .add_systems(
                Startup,
                (apply_gravity_tuning, spawn_player.after(configure_library)),
            )
            .add_systems(Update, read_input)
            .add_systems(
                FixedUpdate,
                (
                    (validate_characters, sample_input)
                        .chain()
                        .in_set(LocomotionSet::Input),
                    step_locomotion.in_set(LocomotionSet::Step),
                ),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_test_room);
    }
}
