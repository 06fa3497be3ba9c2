//! Scripting domain: command sequences, the sequencer that replays them as
//! synthesized input, and the module library that builds them.

mod command;
mod events;
mod library;
mod schedule;
mod sequencer;
mod systems;
#[cfg(feature = "dev-tools")]
mod tester;

pub use command::{
    Command, CommandKind, CommandSequence, DASH_COMMAND_DURATION, DEFAULT_COMMAND_DURATION,
    JUMP_COMMAND_DURATION,
};
pub use events::{RunScript, Script};
pub use library::{
    DEFAULT_JUMP_TO_DASH_DELAY, JumpDashDelay, JumpVariant, Module, ModuleCategory, ModuleKey,
    ModuleLibrary,
};
pub use schedule::PendingStart;
pub use sequencer::Sequencer;
pub use systems::configure_library;

use bevy::prelude::*;

use crate::movement::LocomotionSet;
use crate::scripting::systems::{advance_scripts, handle_run_script, tick_pending_starts};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptingSet {
    /// Fire due delayed starts before input is sampled
    Schedule,
    /// Landing interrupts and command expiry after the locomotion step
    Advance,
}

pub struct ScriptingPlugin;

impl Plugin for ScriptingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModuleLibrary>()
            .add_message::<RunScript>()
            .configure_sets(
                FixedUpdate,
                ScriptingSet::Schedule.before(LocomotionSet::Input),
            )
            .add_systems(Startup, configure_library)
            .add_systems(Update, handle_run_script)
            .add_systems(
                FixedUpdate,
                (
                    tick_pending_starts.in_set(ScriptingSet::Schedule),
                    advance_scripts.in_set(ScriptingSet::Advance),
                ),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(
            Update,
            (tester::module_tester, tester::direct_control_tester).before(handle_run_script),
        );
    }
}
