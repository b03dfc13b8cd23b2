use glam::Vec3;
use tandem_scene::PerspectiveCamera;

use crate::action::Action;

/// Camera controls attached to an app and advanced once per tick.
pub trait CameraControls: std::fmt::Debug {
    fn handle(&mut self, action: Action);

    /// Advance by `dt` seconds of wall-clock time.
    fn update(&mut self, camera: &mut PerspectiveCamera, dt: f32);
}

/// Fly camera controls: yaw/pitch look plus held-direction movement.
#[derive(Debug, Clone)]
pub struct FlyControls {
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second.
    pub speed: f32,
    /// Radians per pixel of pointer motion.
    pub sensitivity: f32,
    pub boost_factor: f32,
    held: Vec3,
    boost: bool,
    pending_look: (f32, f32),
}

impl Default for FlyControls {
    fn default() -> Self {
        Self {
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            speed: 10.0,
            sensitivity: 0.003,
            boost_factor: 3.0,
            held: Vec3::ZERO,
            boost: false,
            pending_look: (0.0, 0.0),
        }
    }
}

impl FlyControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whose initial look direction matches `camera`.
    pub fn looking_along(camera: &PerspectiveCamera) -> Self {
        let fwd = camera.forward();
        Self {
            yaw: fwd.z.atan2(fwd.x),
            pitch: fwd.y.clamp(-1.0, 1.0).asin(),
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }
}

impl CameraControls for FlyControls {
    fn handle(&mut self, action: Action) {
        match action {
            Action::Move(dir) => self.held = dir,
            Action::Look { dx, dy } => {
                self.pending_look.0 += dx;
                self.pending_look.1 += dy;
            }
            Action::Boost(on) => self.boost = on,
            Action::Noop => {}
        }
    }

    fn update(&mut self, camera: &mut PerspectiveCamera, dt: f32) {
        let (dx, dy) = std::mem::take(&mut self.pending_look);
        if dx != 0.0 || dy != 0.0 {
            self.rotate(dx, dy);
        }

        let forward = self.forward();
        let speed = if self.boost {
            self.speed * self.boost_factor
        } else {
            self.speed
        };
        let motion = self.right() * self.held.x + Vec3::Y * self.held.y + forward * self.held.z;
        if motion != Vec3::ZERO {
            camera.position += motion.normalize() * speed * dt;
        }
        camera.target = camera.position + forward;
        tracing::trace!(position = ?camera.position, "fly controls updated");
    }
}
