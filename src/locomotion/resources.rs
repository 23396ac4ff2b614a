//! Locomotion domain: tuning and spawn resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionTuning {
    pub base_speed: f32,
    /// Negative: world units per second squared, downwards.
    pub gravity: f32,
    pub jump_height: f32,
    /// Vertical velocity held while grounded so the body stays pressed down
    pub grounded_bias: f32,
    pub dash_multiplier: f32,
    pub quick_dash_speed: f32,
    pub quick_dash_time: f32,
    pub quick_dash_cooldown: f32,
    pub ground_only_quick_dash: bool,
    /// Ground sensing is suppressed this long after a jump, and wall-jump
    /// conversion is evaluated when it ends.
    pub jump_grace: f32,
    pub wall_jump_window: f32,
    pub wall_jump_height_scale: f32,
    pub slide_hold: f32,
    pub slide_settle: f32,
    pub speed_break_duration: f32,
    pub input_dead_zone: f32,
    pub animation_acceleration: f32,
    pub standing_width: f32,
    pub standing_height: f32,
    pub sliding_height: f32,
    pub ground_probe_lift: f32,
    pub ground_probe_depth: f32,
    pub ceiling_margin: f32,
    pub forward_probe: f32,
    pub wall_probe_radius: f32,
    pub wall_probe_distance: f32,
    /// How far past the footprint a boosted body shatters breakable blocks.
    pub shatter_reach: f32,
    /// A shattered block stays open at least this long, then waits for the
    /// player to clear its footprint.
    pub block_restore_delay: f32,
    pub block_fade_in: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            base_speed: 320.0,
            gravity: -1800.0,
            jump_height: 120.0,
            grounded_bias: -20.0,
            dash_multiplier: 3.0,
            quick_dash_speed: 900.0,
            quick_dash_time: 0.16,
            quick_dash_cooldown: 0.35,
            ground_only_quick_dash: true,
            jump_grace: 0.05,
            wall_jump_window: 1.0,
            wall_jump_height_scale: 0.5,
            slide_hold: 0.5,
            slide_settle: 0.1,
            speed_break_duration: 0.35,
            input_dead_zone: 0.1,
            animation_acceleration: 1.0,
            standing_width: 24.0,
            standing_height: 48.0,
            sliding_height: 20.0,
            ground_probe_lift: 2.0,
            ground_probe_depth: 4.0,
            ceiling_margin: 2.0,
            forward_probe: 4.0,
            wall_probe_radius: 6.0,
            wall_probe_distance: 10.0,
            shatter_reach: 24.0,
            block_restore_delay: 2.0,
            block_fade_in: 0.3,
        }
    }
}

impl LocomotionTuning {
    /// Launch velocity reaching `height` under this gravity.
    pub fn launch_velocity(&self, height: f32) -> f32 {
        (height * -2.0 * self.gravity).max(0.0).sqrt()
    }

    pub fn standing_size(&self) -> Vec2 {
        Vec2::new(self.standing_width, self.standing_height)
    }

    pub fn sliding_size(&self) -> Vec2 {
        Vec2::new(self.standing_width, self.sliding_height)
    }

    pub fn shinespark_speed(&self) -> f32 {
        self.base_speed * self.dash_multiplier
    }
}

/// Where the character appears on spawn and respawn
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnPoint {
    pub position: Vec2,
    /// Falling below this height triggers a respawn
    pub kill_height: f32,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            position: Vec2::new(-300.0, -120.0),
            kill_height: -600.0,
        }
    }
}
