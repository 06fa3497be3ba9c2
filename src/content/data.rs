//! Content domain: serde definitions for configuration files.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::InputMode;
use crate::scripting::DEFAULT_JUMP_TO_DASH_DELAY;

/// How the player's sequencer is set up at spawn. Loaded from
/// `assets/data/script.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub input_mode: InputMode,
    /// Start `modules` automatically after `start_delay`
    pub auto_execute: bool,
    pub looping: bool,
    pub start_delay: f32,
    pub jump_to_dash_delay: f32,
    pub straight_jump_scale: f32,
    pub directional_jump_scale: f32,
    /// Module names, expanded like any other sequence
    pub modules: Vec<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Live,
            auto_execute: false,
            looping: false,
            start_delay: 0.0,
            jump_to_dash_delay: DEFAULT_JUMP_TO_DASH_DELAY,
            straight_jump_scale: 0.8,
            directional_jump_scale: 1.2,
            modules: Vec::new(),
        }
    }
}
