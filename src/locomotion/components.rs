//! Locomotion domain: components, physics layers and per-tick state types.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms, ceilings)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn from_sign(value: f32) -> Self {
        if value < 0.0 { Facing::Left } else { Facing::Right }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    pub fn dir(self) -> Dir2 {
        match self {
            Facing::Right => Dir2::X,
            Facing::Left => Dir2::NEG_X,
        }
    }
}

/// Sensor results, re-derived every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactFlags {
    pub grounded: bool,
    pub ceiling: bool,
    pub forward: bool,
    pub wall: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashSource {
    /// Short horizontal dash owned by locomotion
    Quick,
    /// Directional dash launched by the booster
    Shinespark,
}

/// Eased deceleration along the direction the character was running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBreak {
    pub direction: Facing,
    pub peak: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl SpeedBreak {
    /// Out-quadratic ease from `peak` to zero.
    pub fn speed(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let remaining = 1.0 - (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.peak * remaining * remaining
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Movement mode. Being an enum, sliding, dashing and speed-breaking can
/// never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stance {
    #[default]
    Standing,
    Sliding,
    Dashing(DashSource),
    SpeedBreaking(SpeedBreak),
}

impl Stance {
    pub fn is_sliding(&self) -> bool {
        matches!(self, Stance::Sliding)
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self, Stance::Dashing(_))
    }

    pub fn is_speed_breaking(&self) -> bool {
        matches!(self, Stance::SpeedBreaking(_))
    }
}

/// Movement branch for one tick, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MoveBranch {
    Dashing,
    SpeedBreaking,
    Locked,
    Normal,
}

/// Why the stored direction was flushed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitCause {
    Reversal,
    Neutral,
    Collapsed,
    ForwardContact,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitEvent {
    pub cause: CommitCause,
    /// Direction committed before this flush.
    pub previous: Facing,
    /// Horizontal speed going into the commit.
    pub speed: f32,
    /// Grounded, outside the wall-jump window and clear of walls.
    pub break_eligible: bool,
}

/// What locomotion reports to the ability layer each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionSignal {
    Commit(CommitEvent),
}

/// State written across the locomotion/ability seam.
///
/// The ability layer writes the movement lock, run lock, multiplier, dash
/// vector and facing; locomotion writes the dash-break flag from its
/// collision callback. Access goes through `LocomotionController` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedMotion {
    pub(crate) can_move: bool,
    pub(crate) run_locked: bool,
    pub(crate) speed_multiplier: f32,
    pub(crate) dash_vector: Vec2,
    pub(crate) dash_break: bool,
    pub(crate) dash_break_pending: bool,
    pub(crate) impact_normal: Option<Vec2>,
    pub(crate) facing: Facing,
}

impl Default for SharedMotion {
    fn default() -> Self {
        Self {
            can_move: true,
            run_locked: false,
            speed_multiplier: 1.0,
            dash_vector: Vec2::ZERO,
            dash_break: false,
            dash_break_pending: false,
            impact_normal: None,
            facing: Facing::Right,
        }
    }
}

impl SharedMotion {
    pub(crate) fn clear_dash_break(&mut self) {
        self.dash_break = false;
        self.dash_break_pending = false;
        self.impact_normal = None;
    }
}
