//! Presentation domain: the closed set of cues the simulation can emit.
//!
//! Cues are fire-and-forget. The simulation never reads anything back from
//! whoever renders, plays or rumbles them.

use bevy::ecs::message::Message;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTrigger {
    Jump,
    WallJump,
    Slide,
    StoreEnergy,
    ChargeShinespark,
    UseShinespark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationFloat {
    InputMagnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationBool {
    Grounded,
    Sliding,
    Dashing,
}

/// Particle rigs attached to the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ChestGlow,
    ChargeRing,
    FeetTrail,
    Flash,
    Store,
    ShinesparkCharge,
    Impact,
    /// Debris from a breakable block, spawned at the block.
    Shatter,
}

/// Camera-shake sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseSource {
    Body,
    Flash,
    Store,
    ShinesparkCharge,
    Block,
}

/// Fresnel parameters applied to every character material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelParams {
    pub amount: f32,
    pub edge: f32,
    pub blink: bool,
    pub extra_blink: bool,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialPreset {
    /// Booster charging
    Charging,
    /// Booster running
    Boosted,
    /// No booster activity
    Rest,
    /// Energy banked
    Stored,
}

pub const CHARGE_COLOR: Color = Color::srgb(0.35, 0.85, 1.0);
pub const ACTIVE_COLOR: Color = Color::srgb(1.0, 0.75, 0.3);

impl MaterialPreset {
    pub fn params(self) -> FresnelParams {
        match self {
            MaterialPreset::Charging => FresnelParams {
                amount: 0.13,
                edge: 2.1,
                blink: true,
                extra_blink: false,
                color: CHARGE_COLOR,
            },
            MaterialPreset::Boosted => FresnelParams {
                amount: 0.16,
                edge: 2.1,
                blink: true,
                extra_blink: true,
                color: CHARGE_COLOR,
            },
            MaterialPreset::Rest => FresnelParams {
                amount: 0.0,
                edge: 1.25,
                blink: false,
                extra_blink: false,
                color: ACTIVE_COLOR,
            },
            MaterialPreset::Stored => FresnelParams {
                amount: 0.125,
                edge: 1.25,
                blink: false,
                extra_blink: false,
                color: ACTIVE_COLOR,
            },
        }
    }
}

/// Scalar shader channels driven by tweens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenChannel {
    Distortion,
    FresnelAmount,
    ExtraShine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub channel: TweenChannel,
    pub from: f32,
    pub to: f32,
    pub seconds: f32,
    /// Start after this many seconds.
    pub delay: f32,
}

impl Tween {
    pub fn new(channel: TweenChannel, from: f32, to: f32, seconds: f32) -> Self {
        Self {
            channel,
            from,
            to,
            seconds,
            delay: 0.0,
        }
    }

    pub fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Controller rumble pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rumble {
    pub duration: f32,
    pub low: f32,
    pub high: f32,
}

impl Rumble {
    pub const PULSE: Rumble = Rumble {
        duration: 0.2,
        low: 0.25,
        high: 0.75,
    };
    pub const SHINESPARK_CHARGE: Rumble = Rumble {
        duration: 1.0,
        low: 0.10,
        high: 0.10,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationEvent {
    Trigger(AnimationTrigger),
    ResetTrigger(AnimationTrigger),
    SetFloat(AnimationFloat, f32),
    SetBool(AnimationBool, bool),
    PlayEffect(Effect),
    StopEffect(Effect),
    EmitImpulse(ImpulseSource),
    Material(MaterialPreset),
    Tween(Tween),
    Haptics(Rumble),
}

impl Message for PresentationEvent {}
