use std::fmt::Write;

use tandem_common::Color;
use tandem_scene::{NodeContent, PerspectiveCamera, Scene};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and a camera and produces one frame of output.
/// It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;

    /// Set the render resolution.
    fn set_size(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    fn set_clear_color(&mut self, _color: Color) {}

    fn set_shadows(&mut self, _enabled: bool) {}
}

/// Text renderer, the headless stand-in for a GPU backend.
///
/// Produces a human-readable description of the visible scene.
#[derive(Debug)]
pub struct DebugTextRenderer {
    width: u32,
    height: u32,
    clear_color: Color,
    shadows: bool,
    frames: u64,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            clear_color: Color::BLACK,
            shadows: false,
            frames: 0,
        }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.frames += 1;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}, clear={}, shadows={}) ===",
            self.frames, self.width, self.height, self.clear_color, self.shadows
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.2}",
            camera.position.x, camera.position.y, camera.position.z, camera.fov, camera.aspect
        );
        let _ = writeln!(
            out,
            "Nodes: {} Triangles: {}",
            scene.len(),
            scene.triangle_count()
        );

        for node in scene.nodes().filter(|n| n.visible) {
            let p = node.transform.position;
            let kind = match &node.content {
                NodeContent::Mesh(m) => m.geometry.type_name(),
                NodeContent::Light(_) => "light",
                NodeContent::Empty => "empty",
            };
            let _ = writeln!(
                out,
                "  [{}] {} {} pos=({:.2}, {:.2}, {:.2})",
                node.id.short(),
                kind,
                node.name,
                p.x,
                p.y,
                p.z
            );
        }

        out
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn set_shadows(&mut self, enabled: bool) {
        self.shadows = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tandem_scene::{BoxParams, Geometry, MaterialDesc, MeshNode, Node};

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &PerspectiveCamera::default());

        assert!(output.contains("Frame 1"));
        assert!(output.contains("Nodes: 0"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_lists_visible_nodes() {
        let mut scene = Scene::new();
        let mut node = Node::mesh(
            "crate",
            MeshNode::new(Geometry::Box(BoxParams::default()), MaterialDesc::default()),
        );
        node.transform.position = Vec3::new(1.0, 2.0, 3.0);
        scene.add(node);
        let mut hidden = Node::empty("ghost");
        hidden.visible = false;
        scene.add(hidden);

        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("Nodes: 2"));
        assert!(output.contains("box crate pos=(1.00, 2.00, 3.00)"));
        assert!(!output.contains("ghost"));
    }

    #[test]
    fn size_and_clear_colour() {
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(640, 480);
        renderer.set_clear_color(Color(0x112233));
        assert_eq!(renderer.size(), (640, 480));
        let output = renderer.render(&Scene::new(), &PerspectiveCamera::default());
        assert!(output.contains("640x480"));
        assert!(output.contains("#112233"));
    }
}
