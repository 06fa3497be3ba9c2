use bevy::prelude::*;

/// Locomotion runs on a 50 Hz fixed step; dash durations are counted in
/// these ticks.
pub const FIXED_STEP_HZ: f64 = 50.0;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_STEP_HZ))
            .add_systems(Startup, setup_camera);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
