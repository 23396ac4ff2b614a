//! Locomotion domain: system modules for input, the physics motor, ticking
//! and breakable blocks.

pub(crate) mod breakables;
pub(crate) mod input;
pub(crate) mod motor;
pub(crate) mod movement;

pub(crate) use breakables::{restore_breakables, shatter_breakables};
pub(crate) use input::read_input;
pub(crate) use movement::{drive_locomotion, respawn_on_kill_plane, sync_collider_footprint};
