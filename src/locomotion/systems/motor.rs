//! Locomotion domain: the avian-backed physics collaborator.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::locomotion::GameLayer;
use crate::locomotion::physics::{CharacterPhysics, SurfaceHit};

/// Gap kept between the character and whatever it touches
const SKIN: f32 = 0.5;
/// Remaining motion is projected along each surface this many times at most
const MAX_SLIDES: usize = 3;
const MIN_MOVE: f32 = 1e-4;

/// Moves a kinematic character by sweeping its box through the spatial query
/// pipeline. Collider resizing is written back by a later system.
pub(crate) struct AvianMotor<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    transform: &'a mut Transform,
    entity: Entity,
    /// Shattered blocks, ignored by every query
    ignored: &'a [Entity],
    shape: Collider,
    footprint: Vec2,
}

impl<'a, 'w, 's> AvianMotor<'a, 'w, 's> {
    pub fn new(
        spatial_query: &'a SpatialQuery<'w, 's>,
        transform: &'a mut Transform,
        entity: Entity,
        ignored: &'a [Entity],
        footprint: Vec2,
    ) -> Self {
        Self {
            spatial_query,
            transform,
            entity,
            ignored,
            shape: Collider::rectangle(footprint.x, footprint.y),
            footprint,
        }
    }

    fn filter(&self, mask: LayerMask) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(mask).with_excluded_entities(
            std::iter::once(self.entity).chain(self.ignored.iter().copied()),
        )
    }
}

impl CharacterPhysics for AvianMotor<'_, '_, '_> {
    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.spatial_query
            .cast_ray(origin, direction, max_distance, true, &self.filter(mask))
            .map(|hit| SurfaceHit {
                distance: hit.distance,
                normal: hit.normal,
            })
    }

    fn sphere_cast(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.spatial_query
            .cast_shape(
                &Collider::circle(radius),
                origin,
                0.0,
                direction,
                &ShapeCastConfig::from_max_distance(max_distance),
                &self.filter(mask),
            )
            .map(|hit| SurfaceHit {
                distance: hit.distance,
                normal: hit.normal1,
            })
    }

    fn move_and_collide(
        &mut self,
        displacement: Vec2,
        dt: f32,
        on_hit: &mut dyn FnMut(Vec2),
    ) -> Vec2 {
        let filter = self.filter([GameLayer::Ground, GameLayer::Wall].into());
        let start = self.transform.translation.truncate();
        let mut position = start;
        let mut remaining = displacement;

        for _ in 0..MAX_SLIDES {
            let length = remaining.length();
            if length <= MIN_MOVE {
                break;
            }
            let Ok(direction) = Dir2::new(remaining) else {
                break;
            };

            let hit = self.spatial_query.cast_shape(
                &self.shape,
                position,
                0.0,
                direction,
                &ShapeCastConfig::from_max_distance(length + SKIN),
                &filter,
            );

            let Some(hit) = hit else {
                position += remaining;
                break;
            };

            let travel = (hit.distance - SKIN).clamp(0.0, length);
            position += *direction * travel;
            on_hit(hit.normal1);

            // Slide the leftover along the surface
            let leftover = remaining - *direction * travel;
            let into_surface = leftover.dot(hit.normal1);
            remaining = if into_surface < 0.0 {
                leftover - hit.normal1 * into_surface
            } else {
                leftover
            };
        }

        self.transform.translation.x = position.x;
        self.transform.translation.y = position.y;

        if dt > 0.0 {
            (position - start) / dt
        } else {
            Vec2::ZERO
        }
    }

    fn set_footprint(&mut self, size: Vec2) {
        // Keep the feet planted
        let shift = (size.y - self.footprint.y) * 0.5;
        self.transform.translation.y += shift;
        self.footprint = size;
        self.shape = Collider::rectangle(size.x, size.y);
    }
}
