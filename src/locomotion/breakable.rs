//! Locomotion domain: blocks a boosted body runs straight through.
//!
//! A shattered block stops blocking at once and fades out. It comes back no
//! sooner than the restore delay, and only once the player has left its
//! footprint, then fades back in.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::{TaskQueue, Wait};
use crate::locomotion::{DashSource, LocomotionController, LocomotionTuning};
use crate::presentation::{Effect, ImpulseSource, PresentationEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTask {
    Restore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCondition {
    PlayerClear,
}

#[derive(Component, Debug, Clone)]
pub struct Breakable {
    size: Vec2,
    open: bool,
    /// Seconds since the last restore; `None` until the first shatter.
    since_restore: Option<f32>,
    tasks: TaskQueue<BlockTask, BlockCondition>,
}

impl Breakable {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            open: false,
            since_restore: None,
            tasks: TaskQueue::default(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Shattered and not yet restored: sensing and sweeps ignore it.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn opacity(&self, fade_in: f32) -> f32 {
        if self.open {
            return 0.0;
        }
        match self.since_restore {
            Some(elapsed) if fade_in > 0.0 => (elapsed / fade_in).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Returns false when the block is already open.
    pub fn shatter(
        &mut self,
        tuning: &LocomotionTuning,
        out: &mut Vec<PresentationEvent>,
    ) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.tasks.schedule(
            BlockTask::Restore,
            Wait::delay_then_until(tuning.block_restore_delay, BlockCondition::PlayerClear),
        );
        out.push(PresentationEvent::PlayEffect(Effect::Shatter));
        out.push(PresentationEvent::EmitImpulse(ImpulseSource::Block));
        true
    }

    /// Advance the restore wait. Returns true on the tick the block closes.
    pub fn tick(&mut self, dt: f32, player_clear: bool) -> bool {
        if let Some(elapsed) = self.since_restore.as_mut() {
            *elapsed += dt;
        }

        let fired = self
            .tasks
            .poll(Duration::from_secs_f32(dt.max(0.0)), |condition| match condition {
                BlockCondition::PlayerClear => player_clear,
            });

        let mut restored = false;
        for token in fired {
            if self.tasks.is_live(&token) && token.slot() == BlockTask::Restore {
                self.open = false;
                self.since_restore = Some(0.0);
                restored = true;
            }
        }
        restored
    }
}

/// A running boost or a shinespark breaks blocks. A quick dash does not.
pub fn shatters_blocks(controller: &LocomotionController) -> bool {
    controller.is_boosted() || controller.dash_source() == Some(DashSource::Shinespark)
}

/// Whether two boxes come within `reach` of each other on both axes.
pub fn within_reach(
    center: Vec2,
    size: Vec2,
    other_center: Vec2,
    other_size: Vec2,
    reach: f32,
) -> bool {
    let gap = (center - other_center).abs() - (size + other_size) * 0.5;
    gap.x < reach && gap.y < reach
}
