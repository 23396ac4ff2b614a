//! Locomotion domain: the per-tick character controller.
//!
//! One tick senses contacts, resumes due continuations, consumes latched
//! jump/slide requests, picks a single movement branch, moves through the
//! physics collaborator and finally looks for a direction commit. The
//! ability layer runs after this and talks to the controller only through
//! the methods in the "ability contract" section.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::{TaskQueue, Wait};
use crate::locomotion::physics::CharacterPhysics;
use crate::locomotion::sensors;
use crate::locomotion::{
    CommitCause, CommitEvent, ContactFlags, DashSource, Facing, LocomotionSignal,
    LocomotionTuning, MoveBranch, SharedMotion, SpeedBreak, Stance,
};
use crate::presentation::{AnimationBool, AnimationFloat, AnimationTrigger, PresentationEvent};

const INPUT_EPSILON: f32 = 1e-3;
const SPEED_EPSILON: f32 = 1e-2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionTask {
    JumpGrace,
    WallJumpWindow,
    SlideHold,
    SlideSettle,
    QuickDash,
    QuickDashCooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionCondition {
    CeilingClear,
}

/// Context captured when a jump is requested, checked when the grace ends.
#[derive(Debug, Clone, Copy, PartialEq)]
struct JumpAttempt {
    was_grounded: bool,
    speed: f32,
}

#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    axis: Vec2,
    previous_axis_x: f32,
    desired_jump: bool,
    desired_slide: bool,
    contacts: ContactFlags,
    forward_began: bool,
    stance: Stance,
    vertical_velocity: f32,
    horizontal_velocity: f32,
    previous_speed: f32,
    stored_direction: Facing,
    wall_jump_active: bool,
    trying_jump: bool,
    jump_attempt: Option<JumpAttempt>,
    footprint: Vec2,
    shared: SharedMotion,
    tasks: TaskQueue<LocomotionTask, LocomotionCondition>,
    signals: Vec<LocomotionSignal>,
    reported_sliding: bool,
    reported_dashing: bool,
}

impl LocomotionController {
    pub fn new(tuning: &LocomotionTuning) -> Self {
        Self {
            axis: Vec2::ZERO,
            previous_axis_x: 0.0,
            desired_jump: false,
            desired_slide: false,
            contacts: ContactFlags::default(),
            forward_began: false,
            stance: Stance::Standing,
            vertical_velocity: 0.0,
            horizontal_velocity: 0.0,
            previous_speed: 0.0,
            stored_direction: Facing::Right,
            wall_jump_active: false,
            trying_jump: false,
            jump_attempt: None,
            footprint: tuning.standing_size(),
            shared: SharedMotion::default(),
            tasks: TaskQueue::default(),
            signals: Vec::new(),
            reported_sliding: false,
            reported_dashing: false,
        }
    }

    /// Back to spawn defaults: standing, airborne, unlocked, facing right.
    pub fn reset(&mut self, tuning: &LocomotionTuning) {
        *self = Self::new(tuning);
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn set_move_axis(&mut self, axis: Vec2) {
        self.axis = if axis.is_finite() { axis } else { Vec2::ZERO };
    }

    /// Latch a jump for the next tick. A second request before then
    /// overwrites the first.
    pub fn request_jump(&mut self) {
        self.desired_jump = true;
    }

    pub fn request_slide(&mut self) {
        self.desired_slide = true;
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    pub fn tick(
        &mut self,
        tuning: &LocomotionTuning,
        physics: &mut impl CharacterPhysics,
        dt: f32,
        out: &mut Vec<PresentationEvent>,
    ) {
        self.signals.clear();
        self.promote_dash_break();

        self.sense(tuning, physics, out);
        self.advance_tasks(tuning, physics, dt, out);
        self.consume_requests(tuning, physics, out);

        let branch = self.branch();
        let displacement = self.integrate(branch, tuning, dt);

        let dashing = self.stance.is_dashing();
        let mut impact = None;
        let mut blocked_sideways = false;
        let resolved = physics.move_and_collide(displacement, dt, &mut |normal: Vec2| {
            if normal.x.abs() > normal.y.abs() {
                blocked_sideways = true;
            }
            if dashing {
                impact = Some(normal);
            }
        });
        if let Some(normal) = impact {
            // Visible to everyone from the start of the next tick.
            self.shared.dash_break_pending = true;
            self.shared.impact_normal = Some(normal);
        }

        // Pressing into a wall keeps the intended speed so a wall jump can
        // mirror it.
        if !self.contacts.forward {
            self.horizontal_velocity = if blocked_sideways && dt > 0.0 {
                displacement.x / dt
            } else {
                resolved.x
            };
        }

        self.detect_commit();
        self.emit_animation(tuning, out);
    }

    fn promote_dash_break(&mut self) {
        if self.shared.dash_break_pending {
            self.shared.dash_break_pending = false;
            self.shared.dash_break = true;
        }
        if self.shared.dash_break && self.stance == Stance::Dashing(DashSource::Quick) {
            debug!("Quick dash stopped by impact");
            self.finish_quick_dash();
        }
    }

    fn sense(
        &mut self,
        tuning: &LocomotionTuning,
        physics: &impl CharacterPhysics,
        out: &mut Vec<PresentationEvent>,
    ) {
        let probe = sensors::probe(physics, tuning, self.footprint, self.shared.facing);
        let grounded = probe.grounded && !self.trying_jump;

        self.forward_began = probe.forward && !self.contacts.forward;
        if grounded != self.contacts.grounded {
            self.report_grounded(grounded, out);
        }
        self.contacts = ContactFlags { grounded, ..probe };
    }

    fn report_grounded(&mut self, grounded: bool, out: &mut Vec<PresentationEvent>) {
        if grounded {
            debug!("Landed: vertical_velocity={:.1}", self.vertical_velocity);
        } else {
            debug!("Left ground: vertical_velocity={:.1}", self.vertical_velocity);
        }
        out.push(PresentationEvent::SetBool(AnimationBool::Grounded, grounded));
    }

    fn advance_tasks(
        &mut self,
        tuning: &LocomotionTuning,
        physics: &mut impl CharacterPhysics,
        dt: f32,
        out: &mut Vec<PresentationEvent>,
    ) {
        let contacts = self.contacts;
        let fired = self
            .tasks
            .poll(Duration::from_secs_f32(dt.max(0.0)), |condition| match condition {
                LocomotionCondition::CeilingClear => !contacts.ceiling,
            });

        for token in fired {
            if !self.tasks.is_live(&token) {
                debug!("Dropping stale locomotion continuation {:?}", token.slot());
                continue;
            }
            self.resume(token.slot(), tuning, physics, out);
        }
    }

    fn resume(
        &mut self,
        task: LocomotionTask,
        tuning: &LocomotionTuning,
        physics: &mut impl CharacterPhysics,
        out: &mut Vec<PresentationEvent>,
    ) {
        match task {
            LocomotionTask::JumpGrace => {
                self.trying_jump = false;
                if let Some(attempt) = self.jump_attempt.take() {
                    if self.can_wall_jump(&attempt) {
                        self.wall_jump(attempt, tuning, out);
                    }
                }
            }
            LocomotionTask::WallJumpWindow => {
                self.wall_jump_active = false;
            }
            LocomotionTask::SlideHold => {
                self.tasks
                    .schedule(LocomotionTask::SlideSettle, Wait::delay(tuning.slide_settle));
            }
            LocomotionTask::SlideSettle => self.stand_up(tuning, physics),
            LocomotionTask::QuickDash => self.finish_quick_dash(),
            LocomotionTask::QuickDashCooldown => {}
        }
    }

    fn consume_requests(
        &mut self,
        tuning: &LocomotionTuning,
        physics: &mut impl CharacterPhysics,
        out: &mut Vec<PresentationEvent>,
    ) {
        if std::mem::take(&mut self.desired_jump) {
            self.try_jump(tuning, out);
        }
        if std::mem::take(&mut self.desired_slide) {
            self.try_slide(tuning, physics, out);
        }
    }

    // -------------------------------------------------------------------------
    // Jumping
    // -------------------------------------------------------------------------

    fn try_jump(&mut self, tuning: &LocomotionTuning, out: &mut Vec<PresentationEvent>) {
        if self.stance.is_dashing() || !self.shared.can_move {
            debug!("Jump dropped: dashing={}, can_move={}", self.stance.is_dashing(), self.shared.can_move);
            return;
        }

        let attempt = JumpAttempt {
            was_grounded: self.contacts.grounded,
            speed: self.horizontal_velocity,
        };

        if attempt.was_grounded {
            let velocity = tuning.launch_velocity(tuning.jump_height);
            self.contacts.grounded = false;
            self.report_grounded(false, out);
            self.vertical_velocity = velocity;
            out.push(PresentationEvent::Trigger(AnimationTrigger::Jump));
            debug!("Jump: launch_velocity={:.1}", velocity);
        }

        // Airborne presses only open the grace window; it may still become
        // a wall jump when the window closes.
        self.trying_jump = true;
        self.jump_attempt = Some(attempt);
        self.tasks
            .schedule(LocomotionTask::JumpGrace, Wait::delay(tuning.jump_grace));
    }

    fn can_wall_jump(&self, attempt: &JumpAttempt) -> bool {
        !attempt.was_grounded
            && !self.contacts.grounded
            && self.contacts.forward
            && attempt.speed.abs() > SPEED_EPSILON
            && !self.wall_jump_active
            && !self.stance.is_dashing()
            && self.shared.can_move
    }

    fn wall_jump(
        &mut self,
        attempt: JumpAttempt,
        tuning: &LocomotionTuning,
        out: &mut Vec<PresentationEvent>,
    ) {
        let velocity = tuning.launch_velocity(tuning.jump_height * tuning.wall_jump_height_scale);

        self.shared.facing = self.shared.facing.flipped();
        self.horizontal_velocity = -attempt.speed;
        self.vertical_velocity = velocity;
        self.wall_jump_active = true;
        self.tasks.schedule(
            LocomotionTask::WallJumpWindow,
            Wait::delay(tuning.wall_jump_window),
        );
        out.push(PresentationEvent::Trigger(AnimationTrigger::WallJump));
        debug!(
            "Wall jump: facing={:?}, launch_velocity={:.1}",
            self.shared.facing, velocity
        );
    }

    // -------------------------------------------------------------------------
    // Sliding
    // -------------------------------------------------------------------------

    fn try_slide(
        &mut self,
        tuning: &LocomotionTuning,
        physics: &mut impl CharacterPhysics,
        out: &mut Vec<PresentationEvent>,
    ) {
        let eligible = self.contacts.grounded
            && self.has_horizontal_input()
            && self.stance == Stance::Standing
            && self.shared.can_move
            && !self.tasks.is_pending(LocomotionTask::SlideSettle);
        if !eligible {
            debug!("Slide dropped: grounded={}, stance={:?}", self.contacts.grounded, self.stance);
            return;
        }

        self.stance = Stance::Sliding;
        self.footprint = tuning.sliding_size();
        physics.set_footprint(self.footprint);
        self.tasks.schedule(
            LocomotionTask::SlideHold,
            Wait::delay_then_until(tuning.slide_hold, LocomotionCondition::CeilingClear),
        );
        out.push(PresentationEvent::Trigger(AnimationTrigger::Slide));
        debug!("Slide started facing {:?}", self.shared.facing);
    }

    fn stand_up(&mut self, tuning: &LocomotionTuning, physics: &mut impl CharacterPhysics) {
        self.footprint = tuning.standing_size();
        physics.set_footprint(self.footprint);
        if self.stance.is_sliding() {
            self.stance = Stance::Standing;
        }
        debug!("Slide finished");
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    pub fn branch(&self) -> MoveBranch {
        match self.stance {
            Stance::Dashing(_) => MoveBranch::Dashing,
            Stance::SpeedBreaking(_) => MoveBranch::SpeedBreaking,
            _ if !self.shared.can_move => MoveBranch::Locked,
            _ => MoveBranch::Normal,
        }
    }

    fn integrate(&mut self, branch: MoveBranch, tuning: &LocomotionTuning, dt: f32) -> Vec2 {
        match branch {
            MoveBranch::Dashing => {
                let speed = match self.stance {
                    Stance::Dashing(DashSource::Quick) => tuning.quick_dash_speed,
                    _ => tuning.shinespark_speed(),
                };
                self.shared.dash_vector * speed * dt
            }
            MoveBranch::SpeedBreaking => {
                let mut x = 0.0;
                if let Stance::SpeedBreaking(mut speed_break) = self.stance {
                    speed_break.elapsed += dt;
                    x = speed_break.direction.sign() * speed_break.speed();
                    self.stance = if speed_break.is_finished() {
                        debug!("Speed break finished");
                        Stance::Standing
                    } else {
                        Stance::SpeedBreaking(speed_break)
                    };
                }
                Vec2::new(x, self.integrate_vertical(tuning, dt)) * dt
            }
            MoveBranch::Locked => Vec2::new(0.0, self.integrate_vertical(tuning, dt)) * dt,
            MoveBranch::Normal => {
                let sliding = self.stance.is_sliding();
                if self.has_horizontal_input() && !sliding && !self.wall_jump_active {
                    self.shared.facing = Facing::from_sign(self.axis.x);
                }

                let run_speed = tuning.base_speed * self.shared.speed_multiplier;
                let speed = if sliding {
                    run_speed
                } else if !self.has_horizontal_input() || self.shared.run_locked {
                    0.0
                } else {
                    run_speed
                };

                Vec2::new(
                    self.shared.facing.sign() * speed,
                    self.integrate_vertical(tuning, dt),
                ) * dt
            }
        }
    }

    fn integrate_vertical(&mut self, tuning: &LocomotionTuning, dt: f32) -> f32 {
        if self.contacts.grounded {
            if self.vertical_velocity <= 0.0 {
                self.vertical_velocity = tuning.grounded_bias;
            }
        } else {
            self.vertical_velocity += tuning.gravity * dt;
        }
        self.vertical_velocity
    }

    fn detect_commit(&mut self) {
        let facing = self.shared.facing;
        let speed = self.horizontal_velocity.abs();

        let cause = if facing != self.stored_direction {
            Some(CommitCause::Reversal)
        } else if !self.has_horizontal_input() && self.previous_axis_x.abs() > INPUT_EPSILON {
            Some(CommitCause::Neutral)
        } else if speed <= SPEED_EPSILON && self.previous_speed > SPEED_EPSILON {
            Some(CommitCause::Collapsed)
        } else if self.forward_began {
            Some(CommitCause::ForwardContact)
        } else {
            None
        };

        if let Some(cause) = cause {
            let event = CommitEvent {
                cause,
                previous: self.stored_direction,
                speed: self.previous_speed.max(speed),
                break_eligible: self.contacts.grounded
                    && !self.wall_jump_active
                    && !self.contacts.wall,
            };
            self.signals.push(LocomotionSignal::Commit(event));
            self.stored_direction = facing;
        }

        self.previous_speed = speed;
        self.previous_axis_x = self.axis.x;
    }

    fn emit_animation(&mut self, tuning: &LocomotionTuning, out: &mut Vec<PresentationEvent>) {
        let magnitude = self.axis.x * self.axis.x;
        let value = if magnitude > tuning.input_dead_zone {
            let boost = if self.is_boosted() { 1.0 } else { 0.0 };
            magnitude * tuning.animation_acceleration + boost
        } else {
            0.0
        };
        out.push(PresentationEvent::SetFloat(AnimationFloat::InputMagnitude, value));

        let sliding = self.stance.is_sliding();
        if sliding != self.reported_sliding {
            self.reported_sliding = sliding;
            out.push(PresentationEvent::SetBool(AnimationBool::Sliding, sliding));
        }
        let dashing = self.stance.is_dashing();
        if dashing != self.reported_dashing {
            self.reported_dashing = dashing;
            out.push(PresentationEvent::SetBool(AnimationBool::Dashing, dashing));
        }
    }

    fn has_horizontal_input(&self) -> bool {
        self.axis.x.abs() > INPUT_EPSILON
    }

    // -------------------------------------------------------------------------
    // Ability contract
    // -------------------------------------------------------------------------

    pub fn can_move(&self) -> bool {
        self.shared.can_move
    }

    pub fn lock_movement(&mut self) {
        self.shared.can_move = false;
    }

    pub fn unlock_movement(&mut self) {
        self.shared.can_move = true;
    }

    /// Hold run speed at zero while the booster charges.
    pub fn set_run_locked(&mut self, locked: bool) {
        self.shared.run_locked = locked;
    }

    #[cfg(test)]
    pub fn is_run_locked(&self) -> bool {
        self.shared.run_locked
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.shared.speed_multiplier = multiplier;
    }

    #[cfg(test)]
    pub fn speed_multiplier(&self) -> f32 {
        self.shared.speed_multiplier
    }

    pub fn is_boosted(&self) -> bool {
        self.shared.speed_multiplier > 1.0
    }

    /// Start a shinespark along `vector`. Dashing ignores the movement lock.
    pub fn launch_dash(&mut self, vector: Vec2) {
        self.tasks.cancel(LocomotionTask::QuickDash);
        self.stance = Stance::Dashing(DashSource::Shinespark);
        self.shared.dash_vector = vector;
        self.shared.clear_dash_break();
        self.vertical_velocity = 0.0;

        if vector.x.abs() > INPUT_EPSILON {
            let facing = Facing::from_sign(vector.x);
            self.shared.facing = facing;
            self.stored_direction = facing;
        }
        debug!("Dash launched along {:?}", vector);
    }

    /// Short horizontal dash along facing. Returns whether it started.
    pub fn begin_quick_dash(&mut self, tuning: &LocomotionTuning) -> bool {
        let ready = self.stance == Stance::Standing
            && self.shared.can_move
            && !self.tasks.is_pending(LocomotionTask::QuickDashCooldown)
            && (self.contacts.grounded || !tuning.ground_only_quick_dash);
        if !ready {
            return false;
        }

        self.stance = Stance::Dashing(DashSource::Quick);
        self.shared.dash_vector = Vec2::new(self.shared.facing.sign(), 0.0);
        self.shared.clear_dash_break();
        self.vertical_velocity = 0.0;
        self.tasks
            .schedule(LocomotionTask::QuickDash, Wait::delay(tuning.quick_dash_time));
        self.tasks.schedule(
            LocomotionTask::QuickDashCooldown,
            Wait::delay(tuning.quick_dash_cooldown),
        );
        debug!("Quick dash facing {:?}", self.shared.facing);
        true
    }

    fn finish_quick_dash(&mut self) {
        self.tasks.cancel(LocomotionTask::QuickDash);
        if self.stance == Stance::Dashing(DashSource::Quick) {
            self.stance = Stance::Standing;
            self.vertical_velocity = 0.0;
        }
        self.shared.clear_dash_break();
    }

    /// Stop whichever dash is in flight and drop any pending impact.
    pub fn end_dash(&mut self) {
        self.tasks.cancel(LocomotionTask::QuickDash);
        if self.stance.is_dashing() {
            self.stance = Stance::Standing;
            self.vertical_velocity = 0.0;
        }
        self.shared.clear_dash_break();
    }

    pub fn dash_break(&self) -> bool {
        self.shared.dash_break
    }

    /// Consume a visible dash impact, returning the surface normal.
    pub fn take_dash_impact(&mut self) -> Option<Vec2> {
        if !self.shared.dash_break {
            return None;
        }
        let normal = self.shared.impact_normal.unwrap_or(Vec2::Y);
        self.shared.clear_dash_break();
        Some(normal)
    }

    /// Decelerate along `direction` from `peak`. Only from a plain stance.
    pub fn begin_speed_break(
        &mut self,
        tuning: &LocomotionTuning,
        direction: Facing,
        peak: f32,
    ) -> bool {
        if self.stance != Stance::Standing {
            return false;
        }
        self.stance = Stance::SpeedBreaking(SpeedBreak {
            direction,
            peak,
            elapsed: 0.0,
            duration: tuning.speed_break_duration,
        });
        debug!("Speed break from {:.1} along {:?}", peak, direction);
        true
    }

    pub fn drain_signals(&mut self) -> Vec<LocomotionSignal> {
        std::mem::take(&mut self.signals)
    }

    // -------------------------------------------------------------------------
    // Read-only state
    // -------------------------------------------------------------------------

    pub fn facing(&self) -> Facing {
        self.shared.facing
    }

    pub fn stored_direction(&self) -> Facing {
        self.stored_direction
    }

    pub fn contacts(&self) -> ContactFlags {
        self.contacts
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn is_sliding(&self) -> bool {
        self.stance.is_sliding()
    }

    pub fn is_dashing(&self) -> bool {
        self.stance.is_dashing()
    }

    pub fn is_speed_breaking(&self) -> bool {
        self.stance.is_speed_breaking()
    }

    pub fn dash_source(&self) -> Option<DashSource> {
        match self.stance {
            Stance::Dashing(source) => Some(source),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn dash_vector(&self) -> Vec2 {
        self.shared.dash_vector
    }

    pub fn input_axis(&self) -> Vec2 {
        self.axis
    }

    pub fn horizontal_velocity(&self) -> f32 {
        self.horizontal_velocity
    }

    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity.abs()
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    #[cfg(test)]
    pub fn wall_jump_active(&self) -> bool {
        self.wall_jump_active
    }

    pub fn footprint(&self) -> Vec2 {
        self.footprint
    }
}
