use glam::Vec3;
use tandem_scene::{PerspectiveCamera, Scene};

use crate::renderer::Renderer;

/// One frame per eye.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoFrame<T> {
    pub left: T,
    pub right: T,
}

/// Stereoscopic render path: renders the scene twice from eye positions
/// offset along the camera's right axis.
#[derive(Debug, Clone)]
pub struct Anaglyph {
    /// Distance between the eyes in world units.
    pub eye_separation: f32,
    width: u32,
    height: u32,
}

impl Default for Anaglyph {
    fn default() -> Self {
        Self {
            eye_separation: 0.064,
            width: 1,
            height: 1,
        }
    }
}

impl Anaglyph {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Left and right eye cameras for `camera`.
    pub fn eye_cameras(&self, camera: &PerspectiveCamera) -> (PerspectiveCamera, PerspectiveCamera) {
        let offset: Vec3 = camera.right() * (self.eye_separation * 0.5);
        let mut left = *camera;
        left.position -= offset;
        left.target -= offset;
        let mut right = *camera;
        right.position += offset;
        right.target += offset;
        (left, right)
    }

    pub fn render<R: Renderer>(
        &mut self,
        renderer: &mut R,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> StereoFrame<R::Output> {
        let (left_cam, right_cam) = self.eye_cameras(camera);
        renderer.set_size(self.width, self.height);
        StereoFrame {
            left: renderer.render(scene, &left_cam),
            right: renderer.render(scene, &right_cam),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DebugTextRenderer;

    #[test]
    fn eyes_are_separated_along_right_axis() {
        let anaglyph = Anaglyph {
            eye_separation: 2.0,
            ..Anaglyph::default()
        };
        let mut camera = PerspectiveCamera::default();
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        camera.target = Vec3::ZERO;
        let (l, r) = anaglyph.eye_cameras(&camera);
        assert!((l.position - Vec3::new(-1.0, 0.0, 10.0)).length() < 1e-5);
        assert!((r.position - Vec3::new(1.0, 0.0, 10.0)).length() < 1e-5);
        assert_eq!(l.forward(), camera.forward());
    }

    #[test]
    fn renders_both_eyes() {
        let mut anaglyph = Anaglyph::new(320, 240);
        let mut renderer = DebugTextRenderer::new();
        let frame = anaglyph.render(&mut renderer, &Scene::new(), &PerspectiveCamera::default());
        assert_eq!(renderer.frames(), 2);
        assert!(frame.left.contains("Frame 1"));
        assert!(frame.right.contains("Frame 2"));
        assert!(frame.right.contains("320x240"));
    }
}
