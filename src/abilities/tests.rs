use std::f32::consts::FRAC_1_SQRT_2;

use bevy::prelude::*;

use crate::abilities::*;
use crate::core::ControlEvent;
use crate::locomotion::testing::{LocomotionRig, Surface};
use crate::presentation::{
    AnimationTrigger, Effect, ImpulseSource, MaterialPreset, PresentationEvent, Rumble,
    TweenChannel,
};

/// Both controllers over the analytic world, ticked in game order.
struct BoosterRig {
    loco: LocomotionRig,
    abilities: AbilityController,
    tuning: AbilityTuning,
}

impl BoosterRig {
    fn on_floor() -> Self {
        Self {
            loco: LocomotionRig::on_floor(),
            abilities: AbilityController::default(),
            tuning: AbilityTuning::default(),
        }
    }

    /// Grounded and holding right.
    fn running() -> Self {
        let mut rig = Self::on_floor();
        rig.step(&[ControlEvent::MoveAxisChanged(Vec2::X)]);
        rig
    }

    /// Running with the boost already charged.
    fn boosted() -> Self {
        let mut rig = Self::running();
        rig.step(&[ControlEvent::BoostPressed]);
        rig.run_for(rig.tuning.charge_time + 0.05);
        assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
        rig
    }

    /// Energy banked and the crouch lock already over.
    fn stored() -> Self {
        let mut rig = Self::boosted();
        rig.step(&[ControlEvent::DownPressed]);
        rig.run_for(rig.tuning.crouch_time + 0.05);
        rig
    }

    fn step(&mut self, controls: &[ControlEvent]) {
        for control in controls {
            match *control {
                ControlEvent::MoveAxisChanged(axis) => self.loco.controller.set_move_axis(axis),
                ControlEvent::JumpPressed => self.loco.controller.request_jump(),
                ControlEvent::SlidePressed => self.loco.controller.request_slide(),
                _ => {}
            }
        }

        self.loco.tick();

        // Lock honoring: a locked, non-dashing tick never moves sideways
        let controller = &self.loco.controller;
        if !controller.can_move() && !controller.is_dashing() {
            let moved = self.loco.world.moves.last().map(|m| m.x).unwrap_or(0.0);
            assert_eq!(moved, 0.0, "locked tick moved horizontally");
        }

        self.abilities.tick(
            &self.tuning,
            &self.loco.tuning,
            &mut self.loco.controller,
            controls,
            LocomotionRig::DT,
            &mut self.loco.cues,
        );

        // Stored energy never coexists with a boost
        if self.abilities.stored_energy() {
            assert!(matches!(
                self.phase(),
                BoosterPhase::Idle | BoosterPhase::StoringEnergy
            ));
        }
    }

    fn run_for(&mut self, seconds: f32) {
        let ticks = (seconds / LocomotionRig::DT).ceil() as usize + 1;
        for _ in 0..ticks {
            self.step(&[]);
        }
    }

    fn stop_all(&mut self, shake: bool) {
        self.abilities
            .stop_all(shake, &mut self.loco.controller, &mut self.loco.cues);
    }

    fn phase(&self) -> BoosterPhase {
        self.abilities.phase()
    }

    fn cue_count(&self, cue: PresentationEvent) -> usize {
        self.loco.cue_count(cue)
    }
}

// ---------------------------------------------------------------------------
// Discretization
// ---------------------------------------------------------------------------

fn aim(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.sin(), radians.cos())
}

fn assert_close(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).length() < 1e-5,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_dash_direction_cardinals() {
    assert_close(dash_direction(aim(0.0)), Vec2::Y);
    assert_close(dash_direction(aim(90.0)), Vec2::X);
    assert_close(dash_direction(aim(180.0)), Vec2::NEG_Y);
    assert_close(dash_direction(aim(-90.0)), Vec2::NEG_X);
}

#[test]
fn test_dash_direction_minus_135_is_down_left() {
    let d = FRAC_1_SQRT_2;
    let direction = dash_direction(aim(-135.0));

    assert_close(direction, Vec2::new(-d, -d));
    assert_ne!(direction, Vec2::NEG_Y);
    assert_close(dash_direction(Vec2::new(-1.0, -1.0)), Vec2::new(-d, -d));
}

#[test]
fn test_dash_direction_all_buckets_stable_under_jitter() {
    let d = FRAC_1_SQRT_2;
    let buckets = [
        (0.0, Vec2::Y),
        (45.0, Vec2::new(d, d)),
        (90.0, Vec2::X),
        (135.0, Vec2::new(d, -d)),
        (180.0, Vec2::NEG_Y),
        (-135.0, Vec2::new(-d, -d)),
        (-90.0, Vec2::NEG_X),
        (-45.0, Vec2::new(-d, d)),
    ];

    for (angle, expected) in buckets {
        for jitter in [-5.0, 0.0, 5.0] {
            assert_close(dash_direction(aim(angle + jitter)), expected);
        }
    }
}

#[test]
fn test_dash_direction_results_are_unit_length() {
    for step in 0..72 {
        let direction = dash_direction(aim(step as f32 * 5.0));
        assert!((direction.length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_dash_direction_degenerate_input_aims_up() {
    assert_eq!(dash_direction(Vec2::ZERO), Vec2::Y);
    assert_eq!(dash_direction(Vec2::new(f32::NAN, 1.0)), Vec2::Y);
    assert_eq!(dash_direction(Vec2::new(f32::INFINITY, 0.0)), Vec2::Y);
}

#[test]
fn test_dash_direction_ignores_magnitude() {
    assert_close(dash_direction(Vec2::new(0.3, 0.0)), Vec2::X);
    assert_close(dash_direction(Vec2::new(-5.0, -5.0)), Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2));
}

// ---------------------------------------------------------------------------
// Boost charge and run
// ---------------------------------------------------------------------------

#[test]
fn test_charge_and_boost() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::BoostPressed]);
    assert_eq!(rig.phase(), BoosterPhase::ChargingBoost);
    assert!(rig.loco.controller.is_run_locked());

    rig.run_for(1.0);
    assert_eq!(rig.phase(), BoosterPhase::ChargingBoost);

    rig.run_for(0.55);
    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
    assert_eq!(rig.loco.controller.speed_multiplier(), 2.0);
    assert!(!rig.loco.controller.is_run_locked());
    assert_eq!(rig.cue_count(PresentationEvent::Material(MaterialPreset::Boosted)), 1);
    assert_eq!(rig.cue_count(PresentationEvent::PlayEffect(Effect::FeetTrail)), 1);

    // The run keeps going at double speed
    rig.run_for(0.2);
    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
    let expected = rig.loco.tuning.base_speed * 2.0;
    assert!((rig.loco.controller.horizontal_speed() - expected).abs() < 0.5);
}

#[test]
fn test_boost_requires_horizontal_input() {
    let mut rig = BoosterRig::on_floor();
    rig.step(&[]);
    rig.step(&[ControlEvent::BoostPressed]);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
}

#[test]
fn test_boost_ignored_while_sliding() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::SlidePressed]);
    assert!(rig.loco.controller.is_sliding());

    rig.step(&[ControlEvent::BoostPressed]);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
}

#[test]
fn test_interrupted_charge() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::BoostPressed]);
    rig.run_for(0.5);
    assert_eq!(rig.phase(), BoosterPhase::ChargingBoost);

    rig.stop_all(true);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_run_locked());

    rig.run_for(1.5);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert_eq!(rig.cue_count(PresentationEvent::Material(MaterialPreset::Boosted)), 0);
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Flash)), 0);
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 0);
    assert_eq!(rig.cue_count(PresentationEvent::Haptics(Rumble::PULSE)), 0);
}

#[test]
fn test_recharge_after_interrupt_uses_fresh_timer() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::BoostPressed]);
    rig.run_for(1.0);
    rig.stop_all(false);

    rig.step(&[ControlEvent::BoostPressed]);
    rig.run_for(1.0);
    // The cancelled charge would have finished by now
    assert_eq!(rig.phase(), BoosterPhase::ChargingBoost);

    rig.run_for(0.55);
    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
}

#[test]
fn test_reversal_cancels_charge_quietly() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::BoostPressed]);
    rig.run_for(0.3);

    rig.step(&[ControlEvent::MoveAxisChanged(Vec2::NEG_X)]);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_speed_breaking());
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 0);
}

#[test]
fn test_reversal_out_of_boost_speed_breaks_once() {
    let mut rig = BoosterRig::boosted();
    rig.step(&[ControlEvent::MoveAxisChanged(Vec2::NEG_X)]);

    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
    assert!(rig.loco.controller.is_speed_breaking());
    assert_eq!(rig.loco.controller.speed_multiplier(), 1.0);
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 1);

    rig.run_for(rig.loco.tuning.speed_break_duration + 0.05);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_speed_breaking());
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 1);
}

#[test]
fn test_release_out_of_boost_speed_breaks() {
    let mut rig = BoosterRig::boosted();
    rig.step(&[ControlEvent::MoveAxisChanged(Vec2::ZERO)]);

    assert!(rig.loco.controller.is_speed_breaking());
    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
}

#[test]
fn test_forward_contact_ends_run_quietly() {
    let mut rig = BoosterRig::boosted();
    let wall_x = rig.loco.world.position.x + rig.loco.world.footprint.x * 0.5 + 40.0;
    rig.loco.world.surfaces.push(Surface::wall_right_of(wall_x));

    rig.run_for(0.2);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert_eq!(rig.loco.controller.speed_multiplier(), 1.0);
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 0);
    assert_eq!(rig.cue_count(PresentationEvent::StopEffect(Effect::FeetTrail)), 1);
}

// ---------------------------------------------------------------------------
// Stored energy and shinespark
// ---------------------------------------------------------------------------

#[test]
fn test_down_while_boosted_stores_energy() {
    let mut rig = BoosterRig::boosted();
    rig.step(&[ControlEvent::DownPressed]);

    assert_eq!(rig.phase(), BoosterPhase::StoringEnergy);
    assert!(rig.abilities.stored_energy());
    assert!(!rig.loco.controller.can_move());
    assert_eq!(rig.loco.controller.speed_multiplier(), 1.0);
    assert_eq!(rig.cue_count(PresentationEvent::Material(MaterialPreset::Stored)), 1);

    rig.run_for(rig.tuning.crouch_time + 0.05);
    assert!(rig.loco.controller.can_move());
    assert_eq!(rig.phase(), BoosterPhase::StoringEnergy);
}

#[test]
fn test_down_without_boost_does_nothing() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::DownPressed]);

    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.abilities.stored_energy());
    assert!(rig.loco.controller.can_move());
}

#[test]
fn test_stored_energy_fades_after_cooldown() {
    let mut rig = BoosterRig::stored();
    rig.run_for(rig.tuning.stored_energy_cooldown);

    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.abilities.stored_energy());
    let fades = rig
        .loco
        .cues
        .iter()
        .filter(|cue| {
            matches!(cue, PresentationEvent::Tween(t) if t.channel == TweenChannel::FresnelAmount)
        })
        .count();
    assert_eq!(fades, 1);
}

#[test]
fn test_boost_press_discards_stored_energy() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::BoostPressed]);

    assert_eq!(rig.phase(), BoosterPhase::ChargingBoost);
    assert!(!rig.abilities.stored_energy());
    assert!(rig.abilities.remaining(AbilityTask::StoredEnergyCooldown).is_none());
}

#[test]
fn test_store_then_dash_then_floor_impact() {
    let mut rig = BoosterRig::boosted();
    rig.step(&[ControlEvent::DownPressed]);
    assert_eq!(rig.phase(), BoosterPhase::StoringEnergy);
    assert!(rig.abilities.stored_energy());

    rig.run_for(rig.tuning.crouch_time + 0.05);
    rig.step(&[ControlEvent::DashPressed]);
    assert_eq!(rig.phase(), BoosterPhase::ChargingShinespark);
    assert!(!rig.abilities.stored_energy());
    assert!(!rig.loco.controller.can_move());

    rig.run_for(rig.tuning.shinespark_charge_time + 0.02);
    assert_eq!(rig.phase(), BoosterPhase::ActiveShinespark);
    assert!(rig.loco.controller.is_dashing());
    assert!(rig.loco.controller.can_move());
    assert_close(rig.loco.controller.dash_vector(), Vec2::X);

    rig.run_for(rig.tuning.dash_break_grace + 0.05);
    assert_eq!(rig.phase(), BoosterPhase::ActiveShinespark);

    rig.loco.world.forced_hits.push(Vec2::Y);
    rig.step(&[]);
    rig.step(&[]);
    assert_eq!(rig.phase(), BoosterPhase::ImpactCooldown);
    assert!(!rig.loco.controller.is_dashing());
    assert!(!rig.loco.controller.can_move());
    assert_eq!(rig.cue_count(PresentationEvent::PlayEffect(Effect::Impact)), 1);

    rig.run_for(rig.tuning.impact_cooldown + 0.02);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(rig.loco.controller.can_move());
}

#[test]
fn test_ceiling_impact_also_cools_down() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(rig.tuning.shinespark_charge_time + rig.tuning.dash_break_grace + 0.1);

    rig.loco.world.forced_hits.push(Vec2::NEG_Y);
    rig.step(&[]);
    rig.step(&[]);
    assert_eq!(rig.phase(), BoosterPhase::ImpactCooldown);
}

#[test]
fn test_wall_impact_continues_run() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(rig.tuning.shinespark_charge_time + rig.tuning.dash_break_grace + 0.1);
    assert_eq!(rig.phase(), BoosterPhase::ActiveShinespark);

    rig.loco.world.forced_hits.push(Vec2::NEG_X);
    rig.step(&[]);
    rig.step(&[]);

    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
    assert!(!rig.loco.controller.is_dashing());
    assert!(rig.loco.controller.can_move());
    assert_eq!(rig.loco.controller.speed_multiplier(), 2.0);
}

#[test]
fn test_impact_during_grace_waits_for_grace() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(rig.tuning.shinespark_charge_time + 0.02);
    assert_eq!(rig.phase(), BoosterPhase::ActiveShinespark);

    rig.loco.world.forced_hits.push(Vec2::Y);
    rig.step(&[]);
    rig.step(&[]);
    assert_eq!(rig.phase(), BoosterPhase::ActiveShinespark);
    assert!(rig.loco.controller.dash_break());

    rig.run_for(rig.tuning.dash_break_grace);
    assert_eq!(rig.phase(), BoosterPhase::ImpactCooldown);
}

#[test]
fn test_shinespark_aims_with_input() {
    let mut rig = BoosterRig::stored();
    rig.step(&[
        ControlEvent::MoveAxisChanged(Vec2::new(-1.0, 1.0)),
        ControlEvent::DashPressed,
    ]);
    rig.run_for(rig.tuning.shinespark_charge_time + 0.02);

    assert_close(
        rig.loco.controller.dash_vector(),
        Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    );
    assert_eq!(rig.loco.controller.facing(), crate::locomotion::Facing::Left);
}

// ---------------------------------------------------------------------------
// Energy gating and quick dash
// ---------------------------------------------------------------------------

#[test]
fn test_dash_without_energy_never_leaves_idle() {
    let mut rig = BoosterRig::running();
    rig.step(&[ControlEvent::DashPressed]);

    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert_eq!(
        rig.loco.controller.dash_source(),
        Some(crate::locomotion::DashSource::Quick)
    );
}

#[test]
fn test_dash_without_energy_keeps_boost_running() {
    let mut rig = BoosterRig::boosted();
    rig.step(&[ControlEvent::DashPressed]);
    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);

    rig.run_for(rig.loco.tuning.quick_dash_time + 0.05);
    assert_eq!(rig.phase(), BoosterPhase::ActiveBoost);
}

#[test]
fn test_dash_with_energy_ignored_during_crouch() {
    let mut rig = BoosterRig::boosted();
    rig.step(&[ControlEvent::DownPressed]);
    rig.step(&[ControlEvent::DashPressed]);

    assert_eq!(rig.phase(), BoosterPhase::StoringEnergy);
    assert!(rig.abilities.stored_energy());
}

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

#[test]
fn test_stop_all_during_run_shakes_once() {
    let mut rig = BoosterRig::boosted();
    rig.stop_all(true);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert_eq!(rig.loco.controller.speed_multiplier(), 1.0);
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 1);

    let cues_before = rig.loco.cues.len();
    rig.stop_all(true);
    assert_eq!(rig.loco.cues.len(), cues_before);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
}

#[test]
fn test_stop_all_without_shake_is_silent() {
    let mut rig = BoosterRig::boosted();
    rig.stop_all(false);
    assert_eq!(rig.cue_count(PresentationEvent::EmitImpulse(ImpulseSource::Body)), 0);
}

#[test]
fn test_stop_all_preserves_stored_energy() {
    let mut rig = BoosterRig::stored();
    rig.stop_all(true);

    assert_eq!(rig.phase(), BoosterPhase::StoringEnergy);
    assert!(rig.abilities.stored_energy());
}

#[test]
fn test_stop_all_aborts_shinespark_charge() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(0.5);

    rig.stop_all(true);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(rig.loco.controller.can_move());

    rig.run_for(rig.tuning.shinespark_charge_time);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_dashing());
}

#[test]
fn test_stop_all_aborts_active_shinespark() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(rig.tuning.shinespark_charge_time + 0.02);
    assert!(rig.loco.controller.is_dashing());

    rig.stop_all(false);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_dashing());

    // A late impact has nothing left to end
    rig.loco.world.forced_hits.push(Vec2::Y);
    rig.run_for(0.5);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
}

// ---------------------------------------------------------------------------
// Respawn
// ---------------------------------------------------------------------------

#[test]
fn test_respawn_returns_to_idle() {
    let mut rig = BoosterRig::stored();
    rig.abilities
        .respawn(&mut rig.loco.controller, &rig.loco.tuning);

    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.abilities.stored_energy());
    assert!(rig.abilities.remaining(AbilityTask::StoredEnergyCooldown).is_none());
    assert!(rig.loco.controller.can_move());
}

#[test]
fn test_respawn_between_ticks_drops_due_shinespark_launch() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(rig.tuning.shinespark_charge_time - 0.1);
    assert_eq!(rig.phase(), BoosterPhase::ChargingShinespark);

    // Locomotion ticks, the respawn lands, then the booster ticks far past
    // the charge time in the same frame
    rig.loco.tick();
    rig.abilities
        .respawn(&mut rig.loco.controller, &rig.loco.tuning);
    rig.abilities.tick(
        &rig.tuning,
        &rig.loco.tuning,
        &mut rig.loco.controller,
        &[],
        1.0,
        &mut rig.loco.cues,
    );

    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_dashing());

    rig.run_for(3.0);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_dashing());
    assert_eq!(
        rig.cue_count(PresentationEvent::Trigger(AnimationTrigger::UseShinespark)),
        0
    );
}

#[test]
fn test_respawn_during_active_shinespark_ends_dash() {
    let mut rig = BoosterRig::stored();
    rig.step(&[ControlEvent::DashPressed]);
    rig.run_for(rig.tuning.shinespark_charge_time + 0.02);
    assert_eq!(rig.phase(), BoosterPhase::ActiveShinespark);
    assert!(rig.loco.controller.is_dashing());

    rig.abilities
        .respawn(&mut rig.loco.controller, &rig.loco.tuning);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.loco.controller.is_dashing());
    assert!(rig.abilities.remaining(AbilityTask::DashImpact).is_none());

    // No impact continuation survives to restart a run
    rig.loco.world.forced_hits.push(Vec2::X);
    rig.run_for(1.0);
    assert_eq!(rig.phase(), BoosterPhase::Idle);
    assert!(!rig.abilities.is_boost_active());
}
