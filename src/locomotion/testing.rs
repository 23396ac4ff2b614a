//! Analytic physics world for driving the controllers in unit tests.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use crate::locomotion::physics::{CharacterPhysics, SurfaceHit};
use crate::locomotion::{GameLayer, LocomotionController, LocomotionTuning};
use crate::presentation::PresentationEvent;

const PENETRATION_SLOP: f32 = 1e-3;

/// Infinite axis-aligned plane. Everything behind `normal` is solid.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Surface {
    pub normal: Vec2,
    pub offset: f32,
    pub layer: GameLayer,
}

impl Surface {
    pub fn floor(y: f32) -> Self {
        Self {
            normal: Vec2::Y,
            offset: y,
            layer: GameLayer::Ground,
        }
    }

    pub fn ceiling(y: f32) -> Self {
        Self {
            normal: Vec2::NEG_Y,
            offset: -y,
            layer: GameLayer::Ground,
        }
    }

    /// Wall whose solid side is to the right of `x`.
    pub fn wall_right_of(x: f32) -> Self {
        Self {
            normal: Vec2::NEG_X,
            offset: -x,
            layer: GameLayer::Wall,
        }
    }

    fn distance(&self, point: Vec2) -> f32 {
        point.dot(self.normal) - self.offset
    }

    fn in_mask(&self, mask: LayerMask) -> bool {
        mask.0 & LayerMask::from(self.layer).0 != 0
    }

    fn cast(&self, origin: Vec2, direction: Vec2, radius: f32, max: f32) -> Option<f32> {
        let approach = direction.dot(self.normal);
        if approach >= 0.0 {
            return None;
        }
        let gap = self.distance(origin) - radius;
        if gap < -PENETRATION_SLOP {
            return None;
        }
        let t = (gap / -approach).max(0.0);
        (t <= max).then_some(t)
    }
}

pub(crate) struct TestWorld {
    pub position: Vec2,
    pub footprint: Vec2,
    pub surfaces: Vec<Surface>,
    /// Normals reported by the next move, on top of real contacts
    pub forced_hits: Vec<Vec2>,
    pub moves: Vec<Vec2>,
}

impl TestWorld {
    pub fn new(tuning: &LocomotionTuning) -> Self {
        Self {
            position: Vec2::ZERO,
            footprint: tuning.standing_size(),
            surfaces: Vec::new(),
            forced_hits: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// Standing on a floor at y = 0.
    pub fn with_floor(tuning: &LocomotionTuning) -> Self {
        let mut world = Self::new(tuning);
        world.surfaces.push(Surface::floor(0.0));
        world.position = Vec2::new(0.0, world.footprint.y * 0.5);
        world
    }

    /// High above the origin with nothing underneath.
    pub fn airborne(tuning: &LocomotionTuning) -> Self {
        let mut world = Self::new(tuning);
        world.position = Vec2::new(0.0, 500.0);
        world
    }

    pub fn feet(&self) -> f32 {
        self.position.y - self.footprint.y * 0.5
    }

    fn half_extent(&self, normal: Vec2) -> f32 {
        normal.x.abs() * self.footprint.x * 0.5 + normal.y.abs() * self.footprint.y * 0.5
    }

    fn nearest(&self, origin: Vec2, direction: Dir2, radius: f32, max: f32, mask: LayerMask) -> Option<SurfaceHit> {
        self.surfaces
            .iter()
            .filter(|surface| surface.in_mask(mask))
            .filter_map(|surface| {
                surface
                    .cast(origin, *direction, radius, max)
                    .map(|distance| SurfaceHit {
                        distance,
                        normal: surface.normal,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl CharacterPhysics for TestWorld {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn raycast(&self, origin: Vec2, direction: Dir2, max_distance: f32, mask: LayerMask) -> Option<SurfaceHit> {
        self.nearest(origin, direction, 0.0, max_distance, mask)
    }

    fn sphere_cast(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.nearest(origin, direction, radius, max_distance, mask)
    }

    fn move_and_collide(&mut self, displacement: Vec2, dt: f32, on_hit: &mut dyn FnMut(Vec2)) -> Vec2 {
        self.moves.push(displacement);
        for normal in self.forced_hits.drain(..) {
            on_hit(normal);
        }

        let start = self.position;
        let mut remaining = displacement;
        for _ in 0..3 {
            let Ok(direction) = Dir2::new(remaining) else {
                break;
            };
            let length = remaining.length();
            let hit = self
                .surfaces
                .iter()
                .filter_map(|surface| {
                    let radius = self.half_extent(surface.normal);
                    surface
                        .cast(self.position, *direction, radius, length)
                        .map(|t| (t, surface.normal))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0));

            let Some((travel, normal)) = hit else {
                self.position += remaining;
                break;
            };
            self.position += *direction * travel;
            on_hit(normal);
            let leftover = remaining - *direction * travel;
            remaining = leftover - normal * leftover.dot(normal).min(0.0);
        }

        if dt > 0.0 {
            (self.position - start) / dt
        } else {
            Vec2::ZERO
        }
    }

    fn set_footprint(&mut self, size: Vec2) {
        self.position.y += (size.y - self.footprint.y) * 0.5;
        self.footprint = size;
    }
}

/// Controller plus world, ticked at a fixed step.
pub(crate) struct LocomotionRig {
    pub tuning: LocomotionTuning,
    pub world: TestWorld,
    pub controller: LocomotionController,
    pub cues: Vec<PresentationEvent>,
}

impl LocomotionRig {
    pub const DT: f32 = 0.02;

    pub fn new(world: TestWorld) -> Self {
        let tuning = LocomotionTuning::default();
        let controller = LocomotionController::new(&tuning);
        Self {
            tuning,
            world,
            controller,
            cues: Vec::new(),
        }
    }

    pub fn on_floor() -> Self {
        Self::new(TestWorld::with_floor(&LocomotionTuning::default()))
    }

    pub fn in_air() -> Self {
        Self::new(TestWorld::airborne(&LocomotionTuning::default()))
    }

    pub fn tick(&mut self) {
        self.controller
            .tick(&self.tuning, &mut self.world, Self::DT, &mut self.cues);
    }

    /// Tick until at least `seconds` have passed.
    pub fn run_for(&mut self, seconds: f32) {
        let ticks = (seconds / Self::DT).ceil() as usize + 1;
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn cue_count(&self, cue: PresentationEvent) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}
