//! Scripting domain: systems that start, advance and redirect sequences.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::content::ScriptConfig;
use crate::movement::{CharacterController, CharacterLanded};
use crate::scripting::{JumpDashDelay, ModuleLibrary, PendingStart, RunScript, Script};

/// Rebuild the module library with the configured delay scales.
pub fn configure_library(config: Res<ScriptConfig>, mut library: ResMut<ModuleLibrary>) {
    *library = ModuleLibrary::new(JumpDashDelay {
        straight_scale: config.straight_jump_scale,
        directional_scale: config.directional_jump_scale,
    });
    info!("Module library ready: {} modules", library.list_modules().len());
}

pub(crate) fn tick_pending_starts(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut PendingStart, &mut CharacterController)>,
) {
    let now = time.elapsed_secs();
    for (entity, mut pending, mut controller) in &mut query {
        pending.tick(time.delta());
        if !pending.is_due() {
            continue;
        }

        commands.entity(entity).remove::<PendingStart>();
        if let Some(sequencer) = controller.sequencer_mut() {
            info!(
                "Starting scheduled sequence ({} commands, looping={})",
                sequencer.commands().len(),
                sequencer.is_looping()
            );
            sequencer.start(now);
        }
    }
}

pub(crate) fn advance_scripts(
    time: Res<Time>,
    mut landed_events: MessageReader<CharacterLanded>,
    mut query: Query<(Entity, &mut CharacterController)>,
) {
    let now = time.elapsed_secs();
    let landed: Vec<Entity> = landed_events.read().map(|e| e.entity).collect();

    for (entity, mut controller) in &mut query {
        controller.advance_script(now, landed.contains(&entity));
    }
}

/// Apply script requests between fixed steps, on the fixed clock.
pub(crate) fn handle_run_script(
    mut commands: Commands,
    fixed_time: Res<Time<Fixed>>,
    library: Res<ModuleLibrary>,
    mut requests: MessageReader<RunScript>,
    mut query: Query<&mut CharacterController>,
) {
    let now = fixed_time.elapsed_secs();

    for request in requests.read() {
        let Ok(mut controller) = query.get_mut(request.entity) else {
            warn!("Script request for unknown character {}", request.entity);
            continue;
        };
        let Some(sequencer) = controller.sequencer_mut() else {
            warn!("Character {} has no sequencer", request.entity);
            continue;
        };

        // A direct request supersedes any scheduled start.
        commands.entity(request.entity).remove::<PendingStart>();

        match &request.script {
            Script::Module(name) => match library.find_by_name(name) {
                Some(module) => library.execute_module(module, sequencer, now),
                None => warn!("Unknown module '{}'", name),
            },
            Script::Sequence {
                names,
                jump_to_dash_delay,
            } => library.execute_sequence(names, *jump_to_dash_delay, sequencer, now),
            Script::Dynamic { name, names } => {
                let module = library.create_dynamic_module(name, names);
                if module.steps.is_empty() {
                    warn!("Dynamic module '{}' resolved no steps", name);
                } else {
                    library.execute_module(&module, sequencer, now);
                }
            }
            Script::Stop => sequencer.stop(),
            Script::Clear => sequencer.clear(),
        }
    }
}
