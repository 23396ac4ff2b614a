//! Content domain: data-driven character tuning loaded at startup.

mod data;
mod loader;
mod validation;


pub use data::{CharacterTuning, SCHEMA_VERSION};
pub use loader::{ContentLoadError, load_character_tuning, parse_character_tuning};
pub use validation::{ValidationError, validate_tuning};

use std::path::Path;

use bevy::prelude::*;

pub const CHARACTER_TUNING_PATH: &str = "assets/data/character.ron";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_tuning);
    }
}

fn load_tuning(mut commands: Commands) {
    let path = Path::new(CHARACTER_TUNING_PATH);
    let tuning = match load_character_tuning(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}; using built-in tuning", e);
            return;
        }
    };

    let errors = validate_tuning(&tuning);
    if !errors.is_empty() {
        for error in &errors {
            warn!("Invalid tuning in {}: {}", CHARACTER_TUNING_PATH, error);
        }
        warn!(
            "{} tuning error(s) in {}; using built-in tuning",
            errors.len(),
            CHARACTER_TUNING_PATH
        );
        return;
    }

    info!(
        "Loaded character tuning from {} (schema v{})",
        CHARACTER_TUNING_PATH, tuning.schema_version
    );
    commands.insert_resource(tuning.locomotion);
    commands.insert_resource(tuning.abilities);
}
