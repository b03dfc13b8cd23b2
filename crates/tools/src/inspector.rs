use tandem_common::ObjectId;
use tandem_physics::PhysicsBackend;
use tandem_scene::{NodeContent, Scene};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene and physics world for debugging and
/// CLI output.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene, physics: Option<&dyn PhysicsBackend>) -> SceneSummary {
        SceneSummary {
            node_count: scene.len(),
            triangle_count: scene.triangle_count(),
            body_count: physics.map(|p| p.body_count()).unwrap_or(0),
            simulated_seconds: physics.map(|p| p.elapsed()).unwrap_or(0.0),
        }
    }

    pub fn inspect_node(scene: &Scene, id: ObjectId) -> Option<NodeInfo> {
        scene.get(id).map(|node| {
            let p = node.transform.position;
            let r = node.transform.rotation;
            NodeInfo {
                id,
                name: node.name.clone(),
                kind: match &node.content {
                    NodeContent::Mesh(m) => m.geometry.type_name(),
                    NodeContent::Light(_) => "light",
                    NodeContent::Empty => "empty",
                },
                position: [p.x, p.y, p.z],
                rotation: [r.x, r.y, r.z, r.w],
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub node_count: usize,
    pub triangle_count: usize,
    pub body_count: usize,
    pub simulated_seconds: f64,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} triangles={} bodies={} simulated={:.3}s",
            self.node_count, self.triangle_count, self.body_count, self.simulated_seconds
        )
    }
}

#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: ObjectId,
    pub name: String,
    pub kind: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] {} ({}) pos=({:.2}, {:.2}, {:.2})",
            self.id.short(),
            self.name,
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tandem_physics::{BodyDesc, ColliderShape, RapierWorld};
    use tandem_scene::{BoxParams, Geometry, MaterialDesc, MeshNode, Node};

    #[test]
    fn summary_without_physics() {
        let scene = Scene::new();
        let summary = SceneInspector::summary(&scene, None);
        assert_eq!(summary.node_count, 0);
        assert_eq!(summary.body_count, 0);
        assert!(summary.to_string().contains("nodes=0"));
    }

    #[test]
    fn summary_counts_bodies() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        world.add_body(&BodyDesc::dynamic(ColliderShape::Ball { radius: 0.5 }));
        let summary = SceneInspector::summary(&Scene::new(), Some(&world));
        assert_eq!(summary.body_count, 1);
    }

    #[test]
    fn inspect_node_found_and_missing() {
        let mut scene = Scene::new();
        let mut node = Node::mesh(
            "crate",
            MeshNode::new(Geometry::Box(BoxParams::default()), MaterialDesc::default()),
        );
        node.transform.position = Vec3::new(1.0, 2.0, 3.0);
        let id = scene.add(node);

        let info = SceneInspector::inspect_node(&scene, id).unwrap();
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert_eq!(info.kind, "box");
        assert!(SceneInspector::inspect_node(&scene, ObjectId::new()).is_none());
    }
}
