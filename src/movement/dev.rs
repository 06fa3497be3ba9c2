//! Movement domain: debug-only test room.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GameLayer, Ground, Wall};

fn spawn_block(
    commands: &mut Commands,
    color: Color,
    size: Vec2,
    position: Vec2,
    layers: CollisionLayers,
) -> Entity {
    commands
        .spawn((
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            layers,
        ))
        .id()
}

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    // Floor
    let floor = spawn_block(
        &mut commands,
        ground_color,
        Vec2::new(800.0, 40.0),
        Vec2::new(0.0, -200.0),
        ground_layers,
    );
    commands.entity(floor).insert(Ground);

    // Side walls stop dashes
    for x in [-420.0, 420.0] {
        let wall = spawn_block(
            &mut commands,
            wall_color,
            Vec2::new(40.0, 500.0),
            Vec2::new(x, 50.0),
            wall_layers,
        );
        commands.entity(wall).insert(Wall);
    }

    // Platforms to land on
    for (size, position) in [
        (Vec2::new(150.0, 20.0), Vec2::new(-250.0, -50.0)),
        (Vec2::new(150.0, 20.0), Vec2::new(250.0, 50.0)),
        (Vec2::new(120.0, 20.0), Vec2::new(0.0, 150.0)),
    ] {
        let platform = spawn_block(&mut commands, platform_color, size, position, ground_layers);
        commands.entity(platform).insert(Ground);
    }

    // A trigger volume resting on the floor; standing in it must not count
    // as being grounded.
    commands.spawn((
        Sprite {
            color: Color::srgba(0.8, 0.8, 0.2, 0.25),
            custom_size: Some(Vec2::new(120.0, 60.0)),
            ..default()
        },
        Transform::from_xyz(150.0, -150.0, -1.0),
        RigidBody::Static,
        Collider::rectangle(120.0, 60.0),
        Sensor,
        CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]),
    ));
}
