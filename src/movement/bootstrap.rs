//! Movement domain: player bootstrap from the loaded configuration.

use avian2d::prelude::*;
use bevy::ecs::error::BevyError;
use bevy::prelude::*;

use crate::content::ScriptConfig;
use crate::movement::{CharacterController, GameLayer, InputMode, LocomotionTuning, Player};
use crate::scripting::{ModuleLibrary, PendingStart, Sequencer};

pub const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 48.0);

/// Build the sequencer described by the script config. The sequence is
/// loaded but not started; starting is scheduled separately.
pub fn sequencer_from_config(config: &ScriptConfig, library: &ModuleLibrary) -> Sequencer {
    let mut sequencer = Sequencer::new();
    sequencer.set_looping(config.looping);
    sequencer.set_start_delay(config.start_delay);
    for command in library.expand_sequence(&config.modules, config.jump_to_dash_delay) {
        sequencer.push(command);
    }
    sequencer
}

pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<LocomotionTuning>,
    config: Res<ScriptConfig>,
    library: Res<ModuleLibrary>,
    existing_player: Query<Entity, With<Player>>,
) -> Result<(), BevyError> {
    // Don't spawn if player already exists
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return Ok(());
    }

    let sequencer = sequencer_from_config(&config, &library);
    let scheduled = config.auto_execute && !sequencer.commands().is_empty();
    let start_delay = sequencer.start_delay();

    let controller = CharacterController::new(&tuning, config.input_mode, Some(sequencer))?;

    info!(
        "Spawning player: mode={:?}, script={:?}, auto_execute={}, delay={}s",
        config.input_mode, config.modules, config.auto_execute, start_delay
    );

    let mut player = commands.spawn((
        Player,
        controller,
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 100.0, 0.0),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(tuning.nominal_gravity_scale),
            Friction::new(0.0),
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Default, GameLayer::Ground, GameLayer::Wall],
            ),
        ),
    ));

    if scheduled {
        player.insert(PendingStart::new(start_delay));
    } else if config.input_mode == InputMode::Scripted {
        warn!("Scripted player has nothing to run until a script is requested");
    }

    Ok(())
}
