//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces, the only geometry that stops a dash
    Wall,
    /// Player character
    Player,
    /// Trigger volumes - never count as ground
    Sensor,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Unit vector pointing the way the character faces.
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Right => Vec2::X,
            Facing::Left => Vec2::NEG_X,
        }
    }
}
