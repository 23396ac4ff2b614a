//! Core domain: window, camera setup and debug interrupts.

use bevy::prelude::*;

/// 1280x720 logical pixels, resizable.
pub fn primary_window() -> Window {
    Window {
        title: "Shinespark".to_string(),
        resolution: (1280, 720).into(),
        resizable: true,
        ..default()
    }
}

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Backspace simulates taking a hit so the booster interrupt path can be
/// exercised without an enemy in the room.
#[cfg(feature = "dev-tools")]
pub(crate) fn send_debug_interrupt(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut interrupts: bevy::ecs::message::MessageWriter<crate::core::InterruptRequested>,
) {
    if keyboard.just_pressed(KeyCode::Backspace) {
        debug!("Debug interrupt requested");
        interrupts.write(crate::core::InterruptRequested { shake: true });
    }
}
