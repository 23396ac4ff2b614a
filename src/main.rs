mod abilities;
mod content;
mod core;
mod locomotion;
mod presentation;

use avian2d::prelude::*;
use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(core::primary_window()),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((
            core::CorePlugin,
            content::ContentPlugin,
            locomotion::LocomotionPlugin,
            abilities::AbilitiesPlugin,
            presentation::PresentationPlugin,
        ))
        .run();
}
