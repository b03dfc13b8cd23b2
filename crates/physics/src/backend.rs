use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tandem_common::Transform;
use tandem_config::SurfaceMaterial;

/// Opaque reference to a body owned by a physics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("unknown body {0}")]
    UnknownBody(BodyHandle),
}

/// Position and orientation of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl From<Transform> for Pose {
    fn from(t: Transform) -> Self {
        Self {
            position: t.position,
            rotation: t.rotation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    #[default]
    Dynamic,
    Fixed,
    Kinematic,
}

/// Everything needed to create a body and its collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: ColliderShape,
    pub pose: Pose,
    /// Collider mass; backend density defaults apply when `None`.
    pub mass: Option<f32>,
    pub linear_velocity: Vec3,
    /// Overrides the world's default contact material.
    pub material: Option<SurfaceMaterial>,
}

impl BodyDesc {
    pub fn dynamic(shape: ColliderShape) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            pose: Pose::default(),
            mass: None,
            linear_velocity: Vec3::ZERO,
            material: None,
        }
    }

    pub fn fixed(shape: ColliderShape) -> Self {
        Self {
            kind: BodyKind::Fixed,
            ..Self::dynamic(shape)
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }
}

/// A wireframe segment in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub from: Vec3,
    pub to: Vec3,
}

/// The seam between the frame loop and a rigid-body engine.
pub trait PhysicsBackend {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Remove a body and its colliders. Returns false for unknown handles.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    fn pose(&self, handle: BodyHandle) -> Option<Pose>;

    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> Result<(), PhysicsError>;

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Total simulated seconds.
    fn elapsed(&self) -> f64;

    fn body_count(&self) -> usize;

    fn gravity(&self) -> Vec3;

    /// Collider outlines for the debug overlay.
    fn debug_lines(&self) -> Vec<DebugLine>;
}
