//! Content domain: RON configuration for locomotion tuning and scripts.

mod data;
mod loader;

pub use data::ScriptConfig;
pub use loader::{load_all_content, parse_single};

use bevy::prelude::*;
use std::path::Path;

use crate::movement::LocomotionTuning;

pub const CONTENT_PATH: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScriptConfig>()
            .add_systems(PreStartup, load_content);
    }
}

pub fn load_content(mut tuning: ResMut<LocomotionTuning>, mut config: ResMut<ScriptConfig>) {
    let (loaded_tuning, loaded_config) = load_all_content(Path::new(CONTENT_PATH));
    *tuning = loaded_tuning;
    *config = loaded_config;
}
