//! Core domain: tick utilities, shared events, window and camera setup.

mod events;
mod systems;
pub mod tasks;

pub use events::{ControlEvent, InterruptRequested, RespawnRequested};
pub use systems::primary_window;
pub use tasks::{CancelToken, TaskQueue, Wait};

use bevy::prelude::*;

use crate::core::systems::setup_camera;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ControlEvent>()
            .add_message::<InterruptRequested>()
            .add_message::<RespawnRequested>()
            .add_systems(Startup, setup_camera);

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, systems::send_debug_interrupt);
    }
}
