//! Abilities domain: booster tuning.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbilityTuning {
    pub charge_time: f32,
    /// Movement stays locked this long after storing energy
    pub crouch_time: f32,
    pub stored_energy_cooldown: f32,
    pub shinespark_charge_time: f32,
    /// Impacts right after launch are ignored
    pub dash_break_grace: f32,
    pub impact_cooldown: f32,
    pub boost_multiplier: f32,
    /// Impact normals within this many degrees of vertical end the dash
    pub floor_angle: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            charge_time: 1.5,
            crouch_time: 0.8,
            stored_energy_cooldown: 3.0,
            shinespark_charge_time: 1.0,
            dash_break_grace: 0.2,
            impact_cooldown: 1.0,
            boost_multiplier: 2.0,
            floor_angle: 45.0,
        }
    }
}

impl AbilityTuning {
    pub fn is_floor_like(&self, normal: Vec2) -> bool {
        let normal = normal.normalize_or_zero();
        if normal == Vec2::ZERO {
            return true;
        }
        normal.y.abs() >= self.floor_angle.to_radians().cos() - 1e-4
    }
}
