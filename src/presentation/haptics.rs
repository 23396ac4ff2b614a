//! Presentation domain: rumble cues forwarded to connected gamepads.

use std::time::Duration;

use bevy::input::gamepad::{GamepadRumbleIntensity, GamepadRumbleRequest};
use bevy::prelude::*;

use crate::presentation::{PresentationEvent, Rumble};

/// Stop whatever is playing, then start the new pattern.
pub(crate) fn rumble_requests(gamepad: Entity, rumble: Rumble) -> [GamepadRumbleRequest; 2] {
    [
        GamepadRumbleRequest::Stop { gamepad },
        GamepadRumbleRequest::Add {
            gamepad,
            duration: Duration::from_secs_f32(rumble.duration.max(0.0)),
            intensity: GamepadRumbleIntensity {
                strong_motor: rumble.low.clamp(0.0, 1.0),
                weak_motor: rumble.high.clamp(0.0, 1.0),
            },
        },
    ]
}

pub(crate) fn forward_haptics(
    mut cues: MessageReader<PresentationEvent>,
    gamepads: Query<Entity, With<Gamepad>>,
    mut requests: MessageWriter<GamepadRumbleRequest>,
) {
    for cue in cues.read() {
        let PresentationEvent::Haptics(rumble) = cue else {
            continue;
        };
        for gamepad in &gamepads {
            requests.write_batch(rumble_requests(gamepad, *rumble));
        }
    }
}
