//! Scripting domain: keyboard module tester for the dev build.
//!
//! Digits 1-0 run the built-in modules in table order, `Q` runs a
//! walk/jump/dash sequence, `E` a composite jump-into-updash and `Escape`
//! stops the script. `T`, `R` and `C` drive the controller directly.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::content::ScriptConfig;
use crate::movement::{CharacterController, LocomotionTuning, MovementInput, Player};
use crate::scripting::{ModuleKey, RunScript, Script};

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
    KeyCode::Digit0,
];

fn names(keys: &[ModuleKey]) -> Vec<String> {
    keys.iter().map(|k| k.name().to_string()).collect()
}

pub(crate) fn module_tester(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<ScriptConfig>,
    player: Query<Entity, With<Player>>,
    mut requests: MessageWriter<RunScript>,
) {
    let Ok(entity) = player.single() else {
        return;
    };

    let mut script = None;
    for (key, module) in DIGITS.iter().zip(ModuleKey::ALL) {
        if keyboard.just_pressed(*key) {
            script = Some(Script::Module(module.name().to_string()));
        }
    }

    if keyboard.just_pressed(KeyCode::KeyQ) {
        script = Some(Script::Sequence {
            names: names(&[ModuleKey::WalkRight, ModuleKey::JumpRight, ModuleKey::DashRight]),
            jump_to_dash_delay: config.jump_to_dash_delay,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        script = Some(Script::Dynamic {
            name: "jump_updash".to_string(),
            names: names(&[ModuleKey::StandJump, ModuleKey::DashUp]),
        });
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        script = Some(Script::Stop);
    }

    if let Some(script) = script {
        info!("Module tester: {:?}", script);
        requests.write(RunScript { entity, script });
    }
}

/// Calls on the controller that bypass input: `T` dashes, `R` resets to
/// idle and `C` toggles the crouch override.
pub(crate) fn direct_control_tester(
    keyboard: Res<ButtonInput<KeyCode>>,
    input: Res<MovementInput>,
    tuning: Res<LocomotionTuning>,
    mut player: Query<&mut CharacterController, With<Player>>,
) {
    let Ok(mut controller) = player.single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyT) {
        let fired = controller.trigger_dash(&tuning, input.axis);
        let outcome = if fired { "fired" } else { "rejected" };
        info!("Direct dash toward {:?}: {}", input.axis, outcome);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        controller.reset_to_idle(&tuning);
        info!("Controller reset to idle");
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        let crouch = !controller.locomotion().is_crouching();
        controller.set_crouching(crouch);
        info!(
            "Crouch override {}: crouching={}",
            crouch,
            controller.locomotion().is_crouching()
        );
    }
}
