use tandem_physics::{DebugLine, PhysicsBackend};

/// Wireframe view of the physics world, refreshed once per tick.
#[derive(Debug, Default)]
pub struct PhysicsDebugOverlay {
    lines: Vec<DebugLine>,
    updates: u64,
}

impl PhysicsDebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, physics: &dyn PhysicsBackend) {
        self.lines = physics.debug_lines();
        self.updates += 1;
        tracing::trace!(lines = self.lines.len(), "physics debug overlay refreshed");
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tandem_physics::{BodyDesc, ColliderShape, RapierWorld};

    #[test]
    fn overlay_tracks_world_colliders() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let mut overlay = PhysicsDebugOverlay::new();
        overlay.update(&world);
        assert!(overlay.lines().is_empty());

        let h = world.add_body(&BodyDesc::fixed(ColliderShape::Cuboid {
            half_extents: Vec3::ONE,
        }));
        overlay.update(&world);
        assert_eq!(overlay.lines().len(), 12);
        assert!(overlay
            .lines()
            .iter()
            .all(|l| l.from.abs().max_element() <= 1.0 + 1e-4));

        world.remove_body(h);
        overlay.update(&world);
        assert!(overlay.lines().is_empty());
        assert_eq!(overlay.updates(), 3);
    }
}
