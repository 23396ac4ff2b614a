//! Abilities domain: speed-booster plugin wiring and public exports.

mod components;
mod controller;
pub mod discretize;
mod resources;
mod systems;

#[cfg(test)]
mod tests;

pub use components::{AbilityCondition, AbilityTask, BoosterPhase};
pub use controller::AbilityController;
pub use discretize::dash_direction;
pub use resources::AbilityTuning;
pub(crate) use systems::drive_abilities;

use bevy::prelude::*;

use crate::abilities::systems::{handle_interrupts, handle_respawn};
use crate::locomotion::drive_locomotion;

pub struct AbilitiesPlugin;

impl Plugin for AbilitiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AbilityTuning>().add_systems(
            Update,
            (drive_abilities, handle_interrupts, handle_respawn)
                .chain()
                .after(drive_locomotion),
        );
    }
}
