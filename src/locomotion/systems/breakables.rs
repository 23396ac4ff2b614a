//! Locomotion domain: shattering and restoring breakable blocks.

use bevy::prelude::*;

use crate::locomotion::breakable::{shatters_blocks, within_reach};
use crate::locomotion::{Breakable, LocomotionController, LocomotionTuning, Player};
use crate::presentation::PresentationEvent;

/// Runs before the locomotion tick so a block opened this frame is already
/// ignored by sensing and the sweep.
pub(crate) fn shatter_breakables(
    time: Res<Time>,
    tuning: Res<LocomotionTuning>,
    players: Query<(&LocomotionController, &Transform), With<Player>>,
    mut blocks: Query<(&mut Breakable, &Transform, &mut Sprite)>,
    mut presentation: MessageWriter<PresentationEvent>,
) {
    let dt = time.delta_secs();

    for (controller, player) in &players {
        if !shatters_blocks(controller) {
            continue;
        }
        // Cover this frame's travel at the fastest breaking speed
        let reach = tuning.shatter_reach + tuning.shinespark_speed() * dt;
        let center = player.translation.truncate();

        for (mut block, transform, mut sprite) in &mut blocks {
            let at = transform.translation.truncate();
            if !within_reach(center, controller.footprint(), at, block.size(), reach) {
                continue;
            }
            let mut cues = Vec::new();
            if block.shatter(&tuning, &mut cues) {
                debug!("Shattered block at ({:.0}, {:.0})", at.x, at.y);
                sprite.color.set_alpha(0.0);
                presentation.write_batch(cues);
            }
        }
    }
}

pub(crate) fn restore_breakables(
    time: Res<Time>,
    tuning: Res<LocomotionTuning>,
    players: Query<(&LocomotionController, &Transform), With<Player>>,
    mut blocks: Query<(&mut Breakable, &Transform, &mut Sprite)>,
) {
    let dt = time.delta_secs();

    for (mut block, transform, mut sprite) in &mut blocks {
        let at = transform.translation.truncate();
        let player_clear = players.iter().all(|(controller, player)| {
            !within_reach(
                player.translation.truncate(),
                controller.footprint(),
                at,
                block.size(),
                0.0,
            )
        });

        if block.tick(dt, player_clear) {
            debug!("Restored block at ({:.0}, {:.0})", at.x, at.y);
        }
        if block.is_open() || sprite.color.alpha() < 1.0 {
            sprite.color.set_alpha(block.opacity(tuning.block_fade_in));
        }
    }
}
