//! Data definitions for the character tuning file.
//!
//! Mirrors assets/data/character.ron. Every section and field is optional;
//! anything left out keeps its built-in default.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityTuning;
use crate::locomotion::LocomotionTuning;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CharacterTuning {
    pub schema_version: u32,
    pub locomotion: LocomotionTuning,
    pub abilities: AbilityTuning,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            locomotion: LocomotionTuning::default(),
            abilities: AbilityTuning::default(),
        }
    }
}
