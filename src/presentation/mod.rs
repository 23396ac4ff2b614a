//! Presentation domain: cue messages and the systems that render them.

mod events;
mod haptics;
mod systems;


pub use events::{
    AnimationBool, AnimationFloat, AnimationTrigger, Effect, FresnelParams, ImpulseSource,
    MaterialPreset, PresentationEvent, Rumble, Tween, TweenChannel, ACTIVE_COLOR, CHARGE_COLOR,
};

use bevy::prelude::*;

use crate::abilities::drive_abilities;
use crate::presentation::haptics::forward_haptics;
use crate::presentation::systems::{log_cues, sync_sprite_footprint, tint_player};

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PresentationEvent>().add_systems(
            Update,
            (log_cues, tint_player, forward_haptics, sync_sprite_footprint)
                .after(drive_abilities),
        );
    }
}
