//! Locomotion domain: player bootstrap.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::abilities::AbilityController;
use crate::locomotion::{GameLayer, LocomotionController, LocomotionTuning, Player, SpawnPoint};

pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<LocomotionTuning>,
    spawn: Res<SpawnPoint>,
    existing_player: Query<Entity, With<Player>>,
) {
    // Don't spawn if player already exists
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    let size = tuning.standing_size();
    info!(
        "Spawning player at ({:.0}, {:.0}): base_speed={}, jump_height={}",
        spawn.position.x, spawn.position.y, tuning.base_speed, tuning.jump_height
    );

    commands.spawn((
        // Identity & controllers
        (
            Player,
            LocomotionController::new(&tuning),
            AbilityController::default(),
        ),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(spawn.position.x, spawn.position.y, 0.0),
        // Physics
        (
            RigidBody::Kinematic,
            Collider::rectangle(size.x, size.y),
            LockedAxes::ROTATION_LOCKED,
            CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::Wall]),
        ),
    ));
}
