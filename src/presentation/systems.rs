//! Presentation domain: logging and sprite feedback for simulation cues.

use bevy::prelude::*;

use crate::locomotion::{LocomotionController, Player};
use crate::presentation::{MaterialPreset, PresentationEvent};

pub(crate) const REST_TINT: Color = Color::srgb(0.9, 0.9, 0.9);

/// Sprite color standing in for a character material preset.
pub(crate) fn preset_tint(preset: MaterialPreset) -> Color {
    match preset {
        MaterialPreset::Rest => REST_TINT,
        other => {
            let params = other.params();
            // Brighter fresnel reads as a brighter tint
            REST_TINT.mix(&params.color, (params.amount * 5.0).min(1.0))
        }
    }
}

pub(crate) fn log_cues(mut cues: MessageReader<PresentationEvent>) {
    for cue in cues.read() {
        match cue {
            // Every tick while moving; too noisy for debug
            PresentationEvent::SetFloat(..) => trace!("Cue: {:?}", cue),
            _ => debug!("Cue: {:?}", cue),
        }
    }
}

pub(crate) fn tint_player(
    mut cues: MessageReader<PresentationEvent>,
    mut query: Query<&mut Sprite, With<Player>>,
) {
    let Some(preset) = cues
        .read()
        .filter_map(|cue| match cue {
            PresentationEvent::Material(preset) => Some(*preset),
            _ => None,
        })
        .last()
    else {
        return;
    };

    for mut sprite in &mut query {
        sprite.color = preset_tint(preset);
    }
}

pub(crate) fn sync_sprite_footprint(
    mut query: Query<(&LocomotionController, &mut Sprite), With<Player>>,
) {
    for (controller, mut sprite) in &mut query {
        let footprint = controller.footprint();
        if sprite.custom_size != Some(footprint) {
            sprite.custom_size = Some(footprint);
        }
    }
}
