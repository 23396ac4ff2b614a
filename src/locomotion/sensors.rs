//! Locomotion domain: contact sensing against the physics collaborator.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use crate::locomotion::physics::CharacterPhysics;
use crate::locomotion::{ContactFlags, Facing, GameLayer, LocomotionTuning};

fn ground_mask() -> LayerMask {
    GameLayer::Ground.into()
}

fn solid_mask() -> LayerMask {
    [GameLayer::Ground, GameLayer::Wall].into()
}

fn wall_mask() -> LayerMask {
    GameLayer::Wall.into()
}

/// Probe origins for a footprint centered at `center`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProbeFrame {
    pub feet: Vec2,
    pub chest: Vec2,
}

impl ProbeFrame {
    pub fn new(center: Vec2, footprint: Vec2) -> Self {
        Self {
            feet: center - Vec2::new(0.0, footprint.y * 0.5),
            chest: center + Vec2::new(0.0, footprint.y * 0.25),
        }
    }
}

/// Raw sensor sweep. The caller applies the post-jump ground suppression.
pub(crate) fn probe(
    physics: &impl CharacterPhysics,
    tuning: &LocomotionTuning,
    footprint: Vec2,
    facing: Facing,
) -> ContactFlags {
    let frame = ProbeFrame::new(physics.position(), footprint);
    let half_width = footprint.x * 0.5;

    // Short ray down from just above the feet
    let ground_origin = frame.feet + Vec2::new(0.0, tuning.ground_probe_lift);
    let grounded = physics
        .raycast(
            ground_origin,
            Dir2::NEG_Y,
            tuning.ground_probe_lift + tuning.ground_probe_depth,
            ground_mask(),
        )
        .is_some();

    // Reach up to where a standing head would be
    let ceiling_reach =
        (frame.feet.y + tuning.standing_height + tuning.ceiling_margin - frame.chest.y).max(0.0);
    let ceiling = physics
        .raycast(frame.chest, Dir2::Y, ceiling_reach, solid_mask())
        .is_some();

    let forward = physics
        .raycast(
            frame.chest,
            facing.dir(),
            half_width + tuning.forward_probe,
            solid_mask(),
        )
        .is_some();

    let wall = physics
        .sphere_cast(
            frame.chest,
            tuning.wall_probe_radius,
            facing.dir(),
            half_width + tuning.wall_probe_distance,
            wall_mask(),
        )
        .is_some();

    ContactFlags {
        grounded,
        ceiling,
        forward,
        wall,
    }
}
