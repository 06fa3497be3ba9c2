//! Movement domain: fail-fast checks on newly spawned characters.

use avian2d::prelude::*;
use bevy::ecs::error::BevyError;
use bevy::prelude::*;

use crate::movement::{CharacterController, ControllerError};

type PhysicsParts<'a> = (
    Option<&'a Collider>,
    Option<&'a LinearVelocity>,
    Option<&'a GravityScale>,
);

/// A character without its physics collaborators must never be stepped.
pub(crate) fn validate_characters(
    query: Query<(Entity, PhysicsParts<'_>), Added<CharacterController>>,
) -> Result<(), BevyError> {
    for (entity, (collider, velocity, gravity)) in &query {
        let missing = if collider.is_none() {
            Some("Collider")
        } else if velocity.is_none() {
            Some("LinearVelocity")
        } else if gravity.is_none() {
            Some("GravityScale")
        } else {
            None
        };

        if let Some(component) = missing {
            error!("Character {} is missing {}", entity, component);
            return Err(ControllerError::MissingPhysics { entity, component }.into());
        }
        debug!("Character {} validated", entity);
    }
    Ok(())
}
