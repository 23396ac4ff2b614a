//! Abilities domain: eight-way shinespark aiming.

use std::f32::consts::FRAC_1_SQRT_2;

use bevy::prelude::*;

const MIN_AIM: f32 = 1e-6;

/// Snap an input vector to the nearest of eight unit directions.
///
/// The angle is measured clockwise from up (`atan2(x, y)`) and rounded to a
/// multiple of 45 degrees. Zero-length or non-finite input aims straight up.
pub fn dash_direction(input: Vec2) -> Vec2 {
    if !input.is_finite() || input.length_squared() < MIN_AIM {
        return Vec2::Y;
    }

    let angle = input.x.atan2(input.y).to_degrees();
    let bucket = (angle / 45.0).round() as i32;

    match bucket {
        0 => Vec2::Y,
        1 => Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        2 => Vec2::X,
        3 => Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        4 | -4 => Vec2::NEG_Y,
        -3 => Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        -2 => Vec2::NEG_X,
        -1 => Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        _ => Vec2::Y,
    }
}
