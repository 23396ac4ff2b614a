//! Locomotion domain: the physics collaborator seen by the controller.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub distance: f32,
    pub normal: Vec2,
}

/// Queries and the move primitive the locomotion controller needs.
///
/// Implemented over avian's spatial queries in the game and over a few
/// analytic planes in tests.
pub trait CharacterPhysics {
    /// Center of the character's current footprint.
    fn position(&self) -> Vec2;

    fn raycast(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    fn sphere_cast(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    /// Move by `displacement`, resolving collisions. `on_hit` is called
    /// synchronously with the surface normal of every contact made along the
    /// way. Returns the resolved velocity.
    fn move_and_collide(
        &mut self,
        displacement: Vec2,
        dt: f32,
        on_hit: &mut dyn FnMut(Vec2),
    ) -> Vec2;

    /// Resize the collision footprint, keeping the feet where they are.
    fn set_footprint(&mut self, size: Vec2);
}
