//! Movement domain: messages produced by the locomotion step.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Sent once per landing transition (airborne last step, grounded and not
/// dashing this step).
#[derive(Debug, Clone, Copy)]
pub struct CharacterLanded {
    pub entity: Entity,
}

impl Message for CharacterLanded {}
