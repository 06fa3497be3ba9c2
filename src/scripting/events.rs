//! Scripting domain: requests to run scripts on a character.

use bevy::ecs::message::Message;
use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    /// A built-in module by name
    Module(String),
    /// Module names expanded with jump-to-dash waits
    Sequence {
        names: Vec<String>,
        jump_to_dash_delay: f32,
    },
    /// Ad hoc composite of module names
    Dynamic { name: String, names: Vec<String> },
    Stop,
    Clear,
}

/// Ask a character's sequencer to run (or stop) a script.
#[derive(Debug, Clone)]
pub struct RunScript {
    pub entity: Entity,
    pub script: Script,
}

impl Message for RunScript {}
