//! Validation for loaded tuning values.

use super::data::{CharacterTuning, SCHEMA_VERSION};

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f32,
    pub reason: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' = {} {}", self.field, self.value, self.reason)
    }
}

/// Helper macro for checking a value is strictly positive
macro_rules! check_positive {
    ($errors:expr, $section:ident . $field:ident) => {
        if !($section.$field > 0.0) {
            $errors.push(ValidationError {
                field: concat!(stringify!($section), ".", stringify!($field)),
                value: $section.$field,
                reason: "must be positive",
            });
        }
    };
}

/// Helper macro for checking a value lies in an inclusive range
macro_rules! check_range {
    ($errors:expr, $section:ident . $field:ident, $min:expr, $max:expr) => {
        if !($min..=$max).contains(&$section.$field) {
            $errors.push(ValidationError {
                field: concat!(stringify!($section), ".", stringify!($field)),
                value: $section.$field,
                reason: concat!("must be within ", stringify!($min), "..=", stringify!($max)),
            });
        }
    };
}

/// Validate every duration, speed and multiplier.
/// Returns a list of validation errors, empty if the tuning is usable.
pub fn validate_tuning(tuning: &CharacterTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if tuning.schema_version != SCHEMA_VERSION {
        errors.push(ValidationError {
            field: "schema_version",
            value: tuning.schema_version as f32,
            reason: "is not a supported schema version",
        });
    }

    let locomotion = &tuning.locomotion;
    check_positive!(errors, locomotion.base_speed);
    check_positive!(errors, locomotion.jump_height);
    check_positive!(errors, locomotion.quick_dash_speed);
    check_positive!(errors, locomotion.quick_dash_time);
    check_positive!(errors, locomotion.quick_dash_cooldown);
    check_positive!(errors, locomotion.jump_grace);
    check_positive!(errors, locomotion.wall_jump_window);
    check_positive!(errors, locomotion.slide_hold);
    check_positive!(errors, locomotion.slide_settle);
    check_positive!(errors, locomotion.speed_break_duration);
    check_positive!(errors, locomotion.standing_width);
    check_positive!(errors, locomotion.standing_height);
    check_positive!(errors, locomotion.sliding_height);
    check_positive!(errors, locomotion.ground_probe_lift);
    check_positive!(errors, locomotion.ground_probe_depth);
    check_positive!(errors, locomotion.ceiling_margin);
    check_positive!(errors, locomotion.forward_probe);
    check_positive!(errors, locomotion.wall_probe_radius);
    check_positive!(errors, locomotion.wall_probe_distance);
    check_positive!(errors, locomotion.shatter_reach);
    check_positive!(errors, locomotion.block_restore_delay);
    check_positive!(errors, locomotion.block_fade_in);
    check_range!(errors, locomotion.dash_multiplier, 1.0, 10.0);
    check_range!(errors, locomotion.wall_jump_height_scale, 0.0, 2.0);
    check_range!(errors, locomotion.input_dead_zone, 0.0, 1.0);
    check_range!(errors, locomotion.animation_acceleration, 0.0, 10.0);
    if !(locomotion.gravity < 0.0) {
        errors.push(ValidationError {
            field: "locomotion.gravity",
            value: locomotion.gravity,
            reason: "must point downwards",
        });
    }
    if !(locomotion.grounded_bias <= 0.0) {
        errors.push(ValidationError {
            field: "locomotion.grounded_bias",
            value: locomotion.grounded_bias,
            reason: "must not point upwards",
        });
    }
    if locomotion.sliding_height > locomotion.standing_height {
        errors.push(ValidationError {
            field: "locomotion.sliding_height",
            value: locomotion.sliding_height,
            reason: "must not exceed standing_height",
        });
    }

    let abilities = &tuning.abilities;
    check_positive!(errors, abilities.charge_time);
    check_positive!(errors, abilities.crouch_time);
    check_positive!(errors, abilities.stored_energy_cooldown);
    check_positive!(errors, abilities.shinespark_charge_time);
    check_positive!(errors, abilities.impact_cooldown);
    check_range!(errors, abilities.dash_break_grace, 0.0, 5.0);
    check_range!(errors, abilities.boost_multiplier, 1.0, 10.0);
    check_range!(errors, abilities.floor_angle, 0.0, 90.0);

    errors
}
