//! Core domain: decoded control input and character lifecycle events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Logical input, already decoded from whatever device produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    MoveAxisChanged(Vec2),
    JumpPressed,
    SlidePressed,
    DashPressed,
    BoostPressed,
    DownPressed,
}

impl Message for ControlEvent {}

/// External interrupt (damage, cutscene start) routed to the booster's
/// `stop_all`. Safe to send repeatedly.
#[derive(Debug, Clone, Copy)]
pub struct InterruptRequested {
    pub shake: bool,
}

impl Message for InterruptRequested {}

/// Put the character back at its spawn point with fresh controller state
#[derive(Debug, Clone, Copy)]
pub struct RespawnRequested;

impl Message for RespawnRequested {}
