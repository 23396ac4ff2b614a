//! Abilities domain: per-frame booster ticking, interrupts and respawn.

use bevy::prelude::*;

use crate::abilities::{AbilityController, AbilityTuning};
use crate::core::{ControlEvent, InterruptRequested, RespawnRequested};
use crate::locomotion::{LocomotionController, LocomotionTuning, Player, SpawnPoint};
use crate::presentation::PresentationEvent;

pub(crate) fn drive_abilities(
    time: Res<Time>,
    tuning: Res<AbilityTuning>,
    loco_tuning: Res<LocomotionTuning>,
    mut controls: MessageReader<ControlEvent>,
    mut presentation: MessageWriter<PresentationEvent>,
    mut query: Query<(&mut AbilityController, &mut LocomotionController), With<Player>>,
) {
    let dt = time.delta_secs();
    let controls: Vec<ControlEvent> = controls.read().copied().collect();

    for (mut abilities, mut locomotion) in &mut query {
        let mut cues = Vec::new();
        abilities.tick(&tuning, &loco_tuning, &mut locomotion, &controls, dt, &mut cues);
        presentation.write_batch(cues);
    }
}

pub(crate) fn handle_interrupts(
    mut interrupts: MessageReader<InterruptRequested>,
    mut presentation: MessageWriter<PresentationEvent>,
    mut query: Query<(&mut AbilityController, &mut LocomotionController), With<Player>>,
) {
    for interrupt in interrupts.read() {
        for (mut abilities, mut locomotion) in &mut query {
            let mut cues = Vec::new();
            abilities.stop_all(interrupt.shake, &mut locomotion, &mut cues);
            presentation.write_batch(cues);
        }
    }
}

/// Respawn resets position, locomotion and the booster in one place.
pub(crate) fn handle_respawn(
    mut respawns: MessageReader<RespawnRequested>,
    spawn: Res<SpawnPoint>,
    loco_tuning: Res<LocomotionTuning>,
    mut query: Query<
        (&mut AbilityController, &mut LocomotionController, &mut Transform),
        With<Player>,
    >,
) {
    if respawns.read().count() == 0 {
        return;
    }

    for (mut abilities, mut locomotion, mut transform) in &mut query {
        info!("Respawning at {:?}", spawn.position);
        abilities.respawn(&mut locomotion, &loco_tuning);
        transform.translation.x = spawn.position.x;
        transform.translation.y = spawn.position.y;
    }
}
