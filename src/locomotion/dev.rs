//! Locomotion domain: debug-only test room.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::locomotion::{Breakable, GameLayer, Ground, Wall};

fn spawn_block(
    commands: &mut Commands,
    kind: impl Bundle,
    layers: CollisionLayers,
    color: Color,
    size: Vec2,
    at: Vec2,
) {
    commands.spawn((
        kind,
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(at.x, at.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        layers,
    ));
}

/// Long runway for charging the booster, pillars for wall jumps, a low
/// tunnel that keeps a slide going until the ceiling clears and a block to
/// boost through.
pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    // Runway
    spawn_block(
        &mut commands,
        Ground,
        ground_layers,
        ground_color,
        Vec2::new(2400.0, 40.0),
        Vec2::new(0.0, -200.0),
    );

    // Outer walls
    for x in [-1220.0, 1220.0] {
        spawn_block(
            &mut commands,
            Wall,
            wall_layers,
            wall_color,
            Vec2::new(40.0, 800.0),
            Vec2::new(x, 200.0),
        );
    }

    // Platforms
    spawn_block(
        &mut commands,
        Ground,
        ground_layers,
        platform_color,
        Vec2::new(150.0, 20.0),
        Vec2::new(-250.0, -50.0),
    );
    spawn_block(
        &mut commands,
        Ground,
        ground_layers,
        platform_color,
        Vec2::new(200.0, 20.0),
        Vec2::new(300.0, 250.0),
    );

    // Pillar for wall jumping practice
    spawn_block(
        &mut commands,
        Wall,
        wall_layers,
        wall_color,
        Vec2::new(30.0, 200.0),
        Vec2::new(-600.0, -80.0),
    );

    // Slide tunnel: 30 units of headroom over the runway
    spawn_block(
        &mut commands,
        Ground,
        ground_layers,
        platform_color,
        Vec2::new(260.0, 20.0),
        Vec2::new(700.0, -140.0),
    );

    // Breakable block near the far wall, standing on the runway
    let block = Vec2::new(40.0, 120.0);
    spawn_block(
        &mut commands,
        (Wall, Breakable::new(block)),
        wall_layers,
        Color::srgb(0.6, 0.35, 0.35),
        block,
        Vec2::new(1000.0, -120.0),
    );
}
