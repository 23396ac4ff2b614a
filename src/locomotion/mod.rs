//! Locomotion domain: character controller plugin wiring and public exports.

mod bootstrap;
pub mod breakable;
mod components;
mod controller;
#[cfg(feature = "dev-tools")]
mod dev;
pub mod physics;
mod resources;
mod sensors;
pub(crate) mod systems;

#[cfg(test)]
pub(crate) mod testing;

pub use components::{
    CommitCause, CommitEvent, ContactFlags, DashSource, Facing, GameLayer, Ground,
    LocomotionSignal, MoveBranch, Player, SharedMotion, SpeedBreak, Stance, Wall,
};
pub use breakable::Breakable;
pub use controller::{LocomotionCondition, LocomotionController, LocomotionTask};
pub use resources::{LocomotionTuning, SpawnPoint};
pub(crate) use systems::drive_locomotion;

use bevy::prelude::*;

use crate::locomotion::bootstrap::spawn_player;
use crate::locomotion::systems::{
    read_input, respawn_on_kill_plane, restore_breakables, shatter_breakables,
    sync_collider_footprint,
};

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocomotionTuning>()
            .init_resource::<SpawnPoint>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    read_input,
                    shatter_breakables,
                    drive_locomotion,
                    restore_breakables,
                    sync_collider_footprint,
                    respawn_on_kill_plane,
                )
                    .chain(),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_test_room);
    }
}
