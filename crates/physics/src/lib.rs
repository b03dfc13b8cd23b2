//! Physics Adapter: the rigid-body world the frame loop steps.
//!
//! # Invariants
//! - The physics world owns every body; callers hold opaque handles.
//! - Poses cross the seam as glam types; rapier types stay private.
//! - Stepping only advances by the `dt` it is given.

mod backend;
mod rapier;

pub use backend::{
    BodyDesc, BodyHandle, BodyKind, ColliderShape, DebugLine, PhysicsBackend, PhysicsError, Pose,
};
pub use rapier::RapierWorld;

/// Simulated seconds advanced per frame.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

pub fn crate_info() -> &'static str {
    "tandem-physics v0.1.0"
}
