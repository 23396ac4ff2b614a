//! Abilities domain: the speed-booster state machine.
//!
//! Runs after the locomotion tick. Reads locomotion's commit signals and
//! contact state, drives its own continuations and answers boost, dash and
//! down presses. Everything it changes on the character goes through the
//! locomotion controller's ability contract.

use std::time::Duration;

use bevy::prelude::*;

use crate::abilities::discretize::dash_direction;
use crate::abilities::{AbilityCondition, AbilityTask, AbilityTuning, BoosterPhase};
use crate::core::{ControlEvent, TaskQueue, Wait};
use crate::locomotion::{
    CommitCause, CommitEvent, LocomotionController, LocomotionSignal, LocomotionTuning,
};
use crate::presentation::{
    AnimationTrigger, Effect, ImpulseSource, MaterialPreset, PresentationEvent, Rumble, Tween,
    TweenChannel,
};

const INPUT_EPSILON: f32 = 1e-3;
const SPEED_EPSILON: f32 = 1e-2;

#[derive(Component, Debug, Clone, Default)]
pub struct AbilityController {
    phase: BoosterPhase,
    stored_energy: bool,
    tasks: TaskQueue<AbilityTask, AbilityCondition>,
}

impl AbilityController {
    pub fn phase(&self) -> BoosterPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn stored_energy(&self) -> bool {
        self.stored_energy
    }

    #[cfg(test)]
    pub fn is_boost_active(&self) -> bool {
        self.phase == BoosterPhase::ActiveBoost
    }

    /// Time left on a continuation slot, for overlays and tests.
    pub fn remaining(&self, task: AbilityTask) -> Option<Duration> {
        self.tasks.remaining(task)
    }

    fn is_breaking(&self) -> bool {
        self.tasks.is_pending(AbilityTask::BreakWindow)
    }

    fn enter(&mut self, phase: BoosterPhase, cause: &str) {
        if self.phase != phase {
            debug!("Booster {:?} -> {:?} ({})", self.phase, phase, cause);
        }
        self.phase = phase;
    }

    /// Back to spawn defaults, together with the locomotion it drives.
    ///
    /// Both halves reset in one call so a continuation fired later in the
    /// frame finds no live token and no booster phase to resume.
    pub fn respawn(&mut self, loco: &mut LocomotionController, loco_tuning: &LocomotionTuning) {
        if self.tasks.cancel_all() {
            debug!("Respawn dropped pending booster continuations");
        }
        self.phase = BoosterPhase::Idle;
        self.stored_energy = false;
        loco.reset(loco_tuning);
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    pub fn tick(
        &mut self,
        tuning: &AbilityTuning,
        loco_tuning: &LocomotionTuning,
        loco: &mut LocomotionController,
        controls: &[ControlEvent],
        dt: f32,
        out: &mut Vec<PresentationEvent>,
    ) {
        for LocomotionSignal::Commit(event) in loco.drain_signals() {
            self.on_commit(event, loco_tuning, loco, out);
        }

        self.check_active_boost(loco, out);
        self.advance_tasks(tuning, loco, dt, out);

        for control in controls {
            match control {
                ControlEvent::BoostPressed => self.on_boost_pressed(tuning, loco, out),
                ControlEvent::DownPressed => self.on_down_pressed(tuning, loco, out),
                ControlEvent::DashPressed => self.on_dash_pressed(tuning, loco_tuning, loco, out),
                _ => {}
            }
        }
    }

    fn on_commit(
        &mut self,
        event: CommitEvent,
        loco_tuning: &LocomotionTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        match self.phase {
            BoosterPhase::ChargingBoost => {
                if matches!(event.cause, CommitCause::Reversal | CommitCause::Neutral) {
                    self.cancel_boost(false, loco, out);
                    self.enter(BoosterPhase::Idle, "charge interrupted");
                }
            }
            BoosterPhase::ActiveBoost if !self.is_breaking() => match event.cause {
                CommitCause::Reversal | CommitCause::Neutral if event.break_eligible => {
                    self.start_speed_break(event, loco_tuning, loco, out);
                }
                CommitCause::ForwardContact | CommitCause::Collapsed => {
                    self.cancel_boost(false, loco, out);
                    self.enter(BoosterPhase::Idle, "run stopped");
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn start_speed_break(
        &mut self,
        event: CommitEvent,
        loco_tuning: &LocomotionTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        if !loco.begin_speed_break(loco_tuning, event.previous, event.speed) {
            return;
        }
        self.cancel_boost(true, loco, out);
        self.tasks.schedule(
            AbilityTask::BreakWindow,
            Wait::until(AbilityCondition::SpeedBreakFinished),
        );
        debug!("Booster speed break from {:.1}", event.speed);
    }

    /// Quiet stop when the run loses its speed or runs into something.
    fn check_active_boost(&mut self, loco: &mut LocomotionController, out: &mut Vec<PresentationEvent>) {
        if self.phase != BoosterPhase::ActiveBoost || self.is_breaking() || loco.is_dashing() {
            return;
        }
        if loco.horizontal_speed() <= SPEED_EPSILON || loco.contacts().forward {
            self.cancel_boost(false, loco, out);
            self.enter(BoosterPhase::Idle, "run stopped");
        }
    }

    fn advance_tasks(
        &mut self,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        dt: f32,
        out: &mut Vec<PresentationEvent>,
    ) {
        let dash_break = loco.dash_break();
        let breaking = loco.is_speed_breaking();
        let fired = self
            .tasks
            .poll(Duration::from_secs_f32(dt.max(0.0)), |condition| match condition {
                AbilityCondition::DashBreak => dash_break,
                AbilityCondition::SpeedBreakFinished => !breaking,
            });

        for token in fired {
            if !self.tasks.is_live(&token) {
                debug!("Dropping stale booster continuation {:?}", token.slot());
                continue;
            }
            self.resume(token.slot(), tuning, loco, out);
        }
    }

    fn resume(
        &mut self,
        task: AbilityTask,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        match task {
            AbilityTask::Charge => self.activate_boost(tuning, loco, out, "charged"),
            AbilityTask::Crouch => loco.unlock_movement(),
            AbilityTask::StoredEnergyCooldown => {
                self.stored_energy = false;
                out.push(PresentationEvent::Tween(Tween::new(
                    TweenChannel::FresnelAmount,
                    0.125,
                    0.0,
                    0.2,
                )));
                if self.phase == BoosterPhase::StoringEnergy {
                    self.enter(BoosterPhase::Idle, "stored energy faded");
                }
            }
            AbilityTask::ShinesparkCharge => self.launch_shinespark(tuning, loco, out),
            AbilityTask::DashImpact => self.on_dash_impact(tuning, loco, out),
            AbilityTask::ImpactCooldown => {
                loco.unlock_movement();
                self.enter(BoosterPhase::Idle, "impact cooldown over");
            }
            AbilityTask::BreakWindow => {
                self.enter(BoosterPhase::Idle, "speed break finished");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Boost run
    // -------------------------------------------------------------------------

    fn on_boost_pressed(
        &mut self,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        let eligible = matches!(self.phase, BoosterPhase::Idle | BoosterPhase::StoringEnergy)
            && loco.input_axis().x.abs() > INPUT_EPSILON
            && !loco.is_sliding()
            && !loco.is_dashing()
            && loco.can_move();
        if !eligible {
            debug!("Boost press ignored in {:?}", self.phase);
            return;
        }

        if self.stored_energy {
            // Charging again throws the banked energy away
            self.tasks.cancel(AbilityTask::StoredEnergyCooldown);
            self.stored_energy = false;
        }

        loco.set_run_locked(true);
        self.tasks
            .schedule(AbilityTask::Charge, Wait::delay(tuning.charge_time));
        out.push(PresentationEvent::Material(MaterialPreset::Charging));
        out.push(PresentationEvent::PlayEffect(Effect::ChestGlow));
        out.push(PresentationEvent::PlayEffect(Effect::ChargeRing));
        self.enter(BoosterPhase::ChargingBoost, "boost pressed");
    }

    fn activate_boost(
        &mut self,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
        cause: &str,
    ) {
        loco.set_run_locked(false);
        loco.set_speed_multiplier(tuning.boost_multiplier);

        out.push(PresentationEvent::Tween(Tween::new(
            TweenChannel::Distortion,
            0.0,
            1.0,
            0.1,
        )));
        out.push(PresentationEvent::PlayEffect(Effect::FeetTrail));
        out.push(PresentationEvent::PlayEffect(Effect::Flash));
        out.push(PresentationEvent::Material(MaterialPreset::Boosted));
        out.push(PresentationEvent::EmitImpulse(ImpulseSource::Flash));
        out.push(PresentationEvent::Haptics(Rumble::PULSE));
        self.enter(BoosterPhase::ActiveBoost, cause);
    }

    /// Undo a charge or a run. Shakes only when a run was actually going.
    fn cancel_boost(
        &mut self,
        shake: bool,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        let was_running = self.phase == BoosterPhase::ActiveBoost;
        self.tasks.cancel(AbilityTask::Charge);
        loco.set_run_locked(false);
        loco.set_speed_multiplier(1.0);

        if was_running {
            out.push(PresentationEvent::Tween(Tween::new(
                TweenChannel::Distortion,
                1.0,
                0.0,
                0.1,
            )));
            out.push(PresentationEvent::StopEffect(Effect::FeetTrail));
        }
        out.push(PresentationEvent::Material(MaterialPreset::Rest));
        out.push(PresentationEvent::StopEffect(Effect::ChestGlow));
        out.push(PresentationEvent::StopEffect(Effect::ChargeRing));

        if shake && was_running {
            out.push(PresentationEvent::EmitImpulse(ImpulseSource::Body));
            out.push(PresentationEvent::Haptics(Rumble::PULSE));
        }
    }

    // -------------------------------------------------------------------------
    // Stored energy
    // -------------------------------------------------------------------------

    fn on_down_pressed(
        &mut self,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        let eligible = self.phase == BoosterPhase::ActiveBoost
            && !self.is_breaking()
            && loco.contacts().grounded
            && !loco.is_sliding();
        if !eligible {
            return;
        }

        self.cancel_boost(false, loco, out);
        self.stored_energy = true;

        out.push(PresentationEvent::Tween(Tween::new(
            TweenChannel::ExtraShine,
            0.0,
            1.0,
            0.1,
        )));
        out.push(PresentationEvent::Tween(
            Tween::new(TweenChannel::ExtraShine, 1.0, 0.0, 0.3).after(0.1),
        ));
        out.push(PresentationEvent::Material(MaterialPreset::Stored));
        out.push(PresentationEvent::EmitImpulse(ImpulseSource::Body));
        out.push(PresentationEvent::Haptics(Rumble::PULSE));
        out.push(PresentationEvent::Trigger(AnimationTrigger::StoreEnergy));
        out.push(PresentationEvent::PlayEffect(Effect::Store));
        out.push(PresentationEvent::EmitImpulse(ImpulseSource::Store));

        loco.lock_movement();
        self.tasks
            .schedule(AbilityTask::Crouch, Wait::delay(tuning.crouch_time));
        self.tasks.schedule(
            AbilityTask::StoredEnergyCooldown,
            Wait::delay(tuning.stored_energy_cooldown),
        );
        self.enter(BoosterPhase::StoringEnergy, "down pressed");
    }

    // -------------------------------------------------------------------------
    // Dashing
    // -------------------------------------------------------------------------

    fn on_dash_pressed(
        &mut self,
        tuning: &AbilityTuning,
        loco_tuning: &LocomotionTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        if !self.stored_energy {
            let quick_dash_phase = self.phase == BoosterPhase::Idle
                || (self.phase == BoosterPhase::ActiveBoost && !self.is_breaking());
            if quick_dash_phase && !loco.is_sliding() && loco.begin_quick_dash(loco_tuning) {
                debug!("Quick dash from {:?}", self.phase);
            }
            return;
        }

        let eligible = matches!(self.phase, BoosterPhase::Idle | BoosterPhase::StoringEnergy)
            && loco.can_move();
        if !eligible {
            debug!("Dash press ignored: can_move={}", loco.can_move());
            return;
        }

        loco.lock_movement();
        self.tasks.cancel(AbilityTask::StoredEnergyCooldown);
        self.stored_energy = false;

        out.push(PresentationEvent::ResetTrigger(AnimationTrigger::UseShinespark));
        out.push(PresentationEvent::Trigger(AnimationTrigger::ChargeShinespark));
        out.push(PresentationEvent::PlayEffect(Effect::ShinesparkCharge));
        out.push(PresentationEvent::EmitImpulse(ImpulseSource::ShinesparkCharge));
        out.push(PresentationEvent::Tween(Tween::new(
            TweenChannel::ExtraShine,
            0.0,
            0.08,
            1.0,
        )));
        out.push(PresentationEvent::Haptics(Rumble::SHINESPARK_CHARGE));

        self.tasks.schedule(
            AbilityTask::ShinesparkCharge,
            Wait::delay(tuning.shinespark_charge_time),
        );
        self.enter(BoosterPhase::ChargingShinespark, "dash pressed");
    }

    fn launch_shinespark(
        &mut self,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        let vector = dash_direction(loco.input_axis());

        out.push(PresentationEvent::Trigger(AnimationTrigger::UseShinespark));
        out.push(PresentationEvent::StopEffect(Effect::ShinesparkCharge));

        loco.unlock_movement();
        loco.launch_dash(vector);
        self.tasks.schedule(
            AbilityTask::DashImpact,
            Wait::delay_then_until(tuning.dash_break_grace, AbilityCondition::DashBreak),
        );
        self.enter(BoosterPhase::ActiveShinespark, "shinespark charged");
    }

    fn on_dash_impact(
        &mut self,
        tuning: &AbilityTuning,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        let normal = loco.take_dash_impact().unwrap_or(Vec2::Y);
        loco.end_dash();

        out.push(PresentationEvent::PlayEffect(Effect::Impact));
        out.push(PresentationEvent::EmitImpulse(ImpulseSource::Store));
        debug!("Shinespark impact, normal {:?}", normal);

        if tuning.is_floor_like(normal) {
            loco.lock_movement();
            self.tasks.schedule(
                AbilityTask::ImpactCooldown,
                Wait::delay(tuning.impact_cooldown),
            );
            self.enter(BoosterPhase::ImpactCooldown, "floor impact");
        } else {
            self.activate_boost(tuning, loco, out, "continue run");
        }
    }

    // -------------------------------------------------------------------------
    // Interrupts
    // -------------------------------------------------------------------------

    /// External interrupt (damage, cutscenes). Stops a boost charge or run,
    /// shaking only for a running boost without banked energy, and aborts any
    /// shinespark in progress. Stored energy is kept. Safe to call again.
    pub fn stop_all(
        &mut self,
        shake: bool,
        loco: &mut LocomotionController,
        out: &mut Vec<PresentationEvent>,
    ) {
        match self.phase {
            BoosterPhase::ChargingBoost | BoosterPhase::ActiveBoost if !self.stored_energy => {
                // A speed break already stopped the run and shook once
                if !self.tasks.cancel(AbilityTask::BreakWindow) {
                    self.cancel_boost(shake, loco, out);
                }
                self.enter(BoosterPhase::Idle, "stop all");
            }
            BoosterPhase::ChargingShinespark
            | BoosterPhase::ActiveShinespark
            | BoosterPhase::ImpactCooldown => {
                self.tasks.cancel(AbilityTask::ShinesparkCharge);
                self.tasks.cancel(AbilityTask::DashImpact);
                self.tasks.cancel(AbilityTask::ImpactCooldown);
                if self.phase == BoosterPhase::ChargingShinespark {
                    out.push(PresentationEvent::StopEffect(Effect::ShinesparkCharge));
                }
                loco.end_dash();
                loco.unlock_movement();
                self.enter(BoosterPhase::Idle, "stop all");
            }
            _ => {}
        }
    }
}
