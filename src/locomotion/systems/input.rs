//! Locomotion domain: keyboard sampling into control events.

use bevy::prelude::*;

use crate::core::ControlEvent;

pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut last_axis: Local<Vec2>,
    mut controls: MessageWriter<ControlEvent>,
) {
    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    // Vertical axis aims the shinespark
    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }

    let axis = Vec2::new(x, y);
    if axis != *last_axis {
        *last_axis = axis;
        controls.write(ControlEvent::MoveAxisChanged(axis));
    }

    if keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyK) {
        controls.write(ControlEvent::JumpPressed);
    }
    if keyboard.just_pressed(KeyCode::KeyC) || keyboard.just_pressed(KeyCode::KeyL) {
        controls.write(ControlEvent::SlidePressed);
    }
    if keyboard.just_pressed(KeyCode::ShiftLeft) || keyboard.just_pressed(KeyCode::KeyJ) {
        controls.write(ControlEvent::DashPressed);
    }
    if keyboard.just_pressed(KeyCode::KeyB) || keyboard.just_pressed(KeyCode::KeyU) {
        controls.write(ControlEvent::BoostPressed);
    }
    if keyboard.just_pressed(KeyCode::KeyS) || keyboard.just_pressed(KeyCode::ArrowDown) {
        controls.write(ControlEvent::DownPressed);
    }
}
