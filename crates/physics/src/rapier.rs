use std::num::NonZeroUsize;

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;
use tandem_config::{PhysicsSettings, SurfaceMaterial};

use crate::backend::{
    BodyDesc, BodyHandle, BodyKind, ColliderShape, DebugLine, PhysicsBackend, PhysicsError, Pose,
};

/// Rigid-body world backed by rapier3d.
pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    query_pipeline: QueryPipeline,
    surface: SurfaceMaterial,
    elapsed: f64,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self::with_settings(gravity, &PhysicsSettings::default())
    }

    /// Build a world from the physics section of the settings.
    ///
    /// Solver iterations map onto rapier's iteration count. Contact stiffness,
    /// regularization time, solver tolerance and quaternion normalization are
    /// tuned by rapier itself and are only logged.
    pub fn with_settings(gravity: Vec3, settings: &PhysicsSettings) -> Self {
        let mut params = IntegrationParameters::default();
        params.num_solver_iterations =
            NonZeroUsize::new(settings.solver.iterations as usize).unwrap_or(NonZeroUsize::MIN);

        tracing::info!(
            gravity = ?gravity,
            iterations = settings.solver.iterations,
            "physics world created"
        );
        tracing::debug!(
            tolerance = settings.solver.tolerance,
            stiffness = settings.def_material.contact_equation_stiffness,
            regularization = settings.def_material.contact_equation_regularization_time,
            quat_normalize_skip = settings.quat_normalize_skip,
            quat_normalize_fast = settings.quat_normalize_fast,
            "solver tuning left to rapier"
        );

        Self {
            gravity: to_na(gravity),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            surface: settings.contact_material,
            elapsed: 0.0,
        }
    }

    pub fn solver_iterations(&self) -> usize {
        self.params.num_solver_iterations.get()
    }

    fn rapier_handle(handle: BodyHandle) -> RigidBodyHandle {
        let (index, generation) = handle.into_raw_parts();
        RigidBodyHandle::from_raw_parts(index, generation)
    }
}

impl std::fmt::Debug for RapierWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapierWorld")
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl PhysicsBackend for RapierWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .position(to_isometry(desc.pose))
            .linvel(to_na(desc.linear_velocity))
            .build();
        let handle = self.bodies.insert(body);

        let surface = desc.material.unwrap_or(self.surface);
        let mut collider = match desc.shape {
            ColliderShape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
        }
        .friction(surface.friction)
        .restitution(surface.restitution);
        if let Some(mass) = desc.mass {
            collider = collider.mass(mass);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        let (index, generation) = handle.into_raw_parts();
        let handle = BodyHandle::from_raw_parts(index, generation);
        tracing::debug!(%handle, kind = ?desc.kind, "body added");
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let removed = self.bodies.remove(
            Self::rapier_handle(handle),
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_some() {
            tracing::debug!(%handle, "body removed");
        }
        removed.is_some()
    }

    fn pose(&self, handle: BodyHandle) -> Option<Pose> {
        self.bodies.get(Self::rapier_handle(handle)).map(|body| {
            let t = body.translation();
            let q = body.rotation().coords;
            Pose {
                position: Vec3::new(t.x, t.y, t.z),
                rotation: Quat::from_xyzw(q.x, q.y, q.z, q.w),
            }
        })
    }

    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(Self::rapier_handle(handle))
            .ok_or(PhysicsError::UnknownBody(handle))?;
        body.set_position(to_isometry(pose), true);
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.elapsed += dt as f64;
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }

    fn debug_lines(&self) -> Vec<DebugLine> {
        let mut lines = Vec::with_capacity(self.colliders.len() * 12);
        for (_, collider) in self.colliders.iter() {
            let aabb = collider.compute_aabb();
            let lo = Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z);
            let hi = Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z);
            lines.extend(box_edges(lo, hi));
        }
        lines
    }
}

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_isometry(pose: Pose) -> Isometry<Real> {
    let r = pose.rotation.normalize();
    Isometry::from_parts(
        Translation3::from(to_na(pose.position)),
        UnitQuaternion::from_quaternion(Quaternion::new(r.w, r.x, r.y, r.z)),
    )
}

fn box_edges(lo: Vec3, hi: Vec3) -> [DebugLine; 12] {
    let c = |x: bool, y: bool, z: bool| {
        Vec3::new(
            if x { hi.x } else { lo.x },
            if y { hi.y } else { lo.y },
            if z { hi.z } else { lo.z },
        )
    };
    let e = |a: Vec3, b: Vec3| DebugLine { from: a, to: b };
    [
        e(c(false, false, false), c(true, false, false)),
        e(c(false, true, false), c(true, true, false)),
        e(c(false, false, true), c(true, false, true)),
        e(c(false, true, true), c(true, true, true)),
        e(c(false, false, false), c(false, true, false)),
        e(c(true, false, false), c(true, true, false)),
        e(c(false, false, true), c(false, true, true)),
        e(c(true, false, true), c(true, true, true)),
        e(c(false, false, false), c(false, false, true)),
        e(c(true, false, false), c(true, false, true)),
        e(c(false, true, false), c(false, true, true)),
        e(c(true, true, false), c(true, true, true)),
    ]
}
