//! Locomotion domain: per-frame controller ticking and the kill plane.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::{ControlEvent, RespawnRequested};
use crate::locomotion::systems::motor::AvianMotor;
use crate::locomotion::{Breakable, LocomotionController, LocomotionTuning, Player, SpawnPoint};
use crate::presentation::PresentationEvent;

pub(crate) fn drive_locomotion(
    time: Res<Time>,
    tuning: Res<LocomotionTuning>,
    spatial_query: SpatialQuery,
    mut controls: MessageReader<ControlEvent>,
    mut presentation: MessageWriter<PresentationEvent>,
    mut query: Query<(Entity, &mut LocomotionController, &mut Transform), With<Player>>,
    blocks: Query<(Entity, &Breakable)>,
) {
    let dt = time.delta_secs();
    let controls: Vec<ControlEvent> = controls.read().copied().collect();
    let open_blocks: Vec<Entity> = blocks
        .iter()
        .filter(|(_, block)| block.is_open())
        .map(|(entity, _)| entity)
        .collect();

    for (entity, mut controller, mut transform) in &mut query {
        for control in &controls {
            match *control {
                ControlEvent::MoveAxisChanged(axis) => controller.set_move_axis(axis),
                ControlEvent::JumpPressed => controller.request_jump(),
                ControlEvent::SlidePressed => controller.request_slide(),
                _ => {}
            }
        }

        let footprint = controller.footprint();
        let mut motor = AvianMotor::new(
            &spatial_query,
            &mut transform,
            entity,
            &open_blocks,
            footprint,
        );
        let mut cues = Vec::new();
        controller.tick(&tuning, &mut motor, dt, &mut cues);
        presentation.write_batch(cues);
    }
}

/// Write the controller's footprint back to the collider when it changes.
pub(crate) fn sync_collider_footprint(
    mut query: Query<(&LocomotionController, &mut Collider), With<Player>>,
    mut last: Local<Option<Vec2>>,
) {
    for (controller, mut collider) in &mut query {
        let footprint = controller.footprint();
        if *last == Some(footprint) {
            continue;
        }
        *last = Some(footprint);
        *collider = Collider::rectangle(footprint.x, footprint.y);
        debug!("Collider footprint now {:?}", footprint);
    }
}

pub(crate) fn respawn_on_kill_plane(
    spawn: Res<SpawnPoint>,
    query: Query<&Transform, With<Player>>,
    mut respawns: MessageWriter<RespawnRequested>,
) {
    for transform in &query {
        if transform.translation.y < spawn.kill_height {
            info!("Player fell below {:.0}, respawning", spawn.kill_height);
            respawns.write(RespawnRequested);
        }
    }
}
