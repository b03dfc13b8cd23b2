use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tandem_common::Transform;
use tandem_physics::BodyDesc;
use tandem_scene::{Geometry, GeometryError, MaterialDesc, MeshNode, Node};

#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("{0} shape used before it was built")]
    NotBuilt(ShapeKind),
}

/// Type tag of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Ring,
    Cuboid,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Cuboid => "cuboid",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declarative parameter set a shape is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    pub geometry: Geometry,
    #[serde(default)]
    pub material: MaterialDesc,
}

/// How a shape participates in physics synchronization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WrapMode {
    /// Rendered only; never synced from a body.
    OnlyVisual,
    /// Backed by a rigid body created when the shape joins an app.
    Physics(BodyDesc),
}

/// Lifecycle wrapper around a mesh built from [`ShapeParams`].
#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    params: ShapeParams,
    native: Option<MeshNode>,
    pub name: String,
    pub transform: Transform,
    wrap: WrapMode,
}

impl Shape {
    /// An unbuilt shape. Call [`Shape::build`] before adding it to a scene.
    pub fn new(params: ShapeParams, kind: ShapeKind) -> Self {
        Self {
            kind,
            params,
            native: None,
            name: kind.as_str().to_string(),
            transform: Transform::default(),
            wrap: WrapMode::OnlyVisual,
        }
    }

    /// Construct the native mesh from the parameter set.
    ///
    /// Construction completes synchronously; the future resolves on first poll.
    pub async fn build(&mut self) -> Result<(), ShapeError> {
        self.params.geometry.validate()?;
        let mesh = MeshNode::new(self.params.geometry, self.params.material.clone());
        tracing::debug!(
            kind = %self.kind,
            vertices = mesh.mesh.vertex_count(),
            triangles = mesh.mesh.triangle_count(),
            "shape built"
        );
        self.native = Some(mesh);
        Ok(())
    }

    pub fn wrap(&mut self, mode: WrapMode) -> &mut Self {
        self.wrap = mode;
        self
    }

    /// Copy runtime state (transform, name, material, wrap mode) from `source`.
    pub fn copy(&mut self, source: &Shape) -> &mut Self {
        self.transform = source.transform;
        self.name = source.name.clone();
        self.wrap = source.wrap;
        self.params.material = source.params.material.clone();
        if let Some(native) = &mut self.native {
            native.material = source.params.material.clone();
        }
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    pub fn native(&self) -> Option<&MeshNode> {
        self.native.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.native.is_some()
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    pub fn only_visual(&self) -> bool {
        matches!(self.wrap, WrapMode::OnlyVisual)
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.transform.position = position;
        self
    }

    pub fn set_rotation(&mut self, rotation: Quat) -> &mut Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.transform.scale = scale;
        self
    }

    /// Hand the built mesh over as a scene node, plus the body it asks for.
    ///
    /// The body pose is taken from the shape's transform.
    pub fn into_node(self) -> Result<(Node, Option<BodyDesc>), ShapeError> {
        let native = self.native.ok_or(ShapeError::NotBuilt(self.kind))?;
        let mut node = Node::mesh(self.name, native);
        node.transform = self.transform;
        let body = match self.wrap {
            WrapMode::OnlyVisual => None,
            WrapMode::Physics(desc) => Some(desc.with_pose(self.transform.into())),
        };
        Ok((node, body))
    }
}

impl Clone for Shape {
    /// Rebuild from the same parameter set, then copy runtime state.
    fn clone(&self) -> Self {
        let mut shape = Shape::new(self.params.clone(), self.kind);
        if self.is_built() {
            if let Err(e) = pollster::block_on(shape.build()) {
                tracing::warn!(kind = %self.kind, "clone rebuild failed: {e}");
            }
        }
        shape.copy(self);
        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_common::Color;
    use tandem_physics::ColliderShape;
    use tandem_scene::{BoxParams, RingParams};

    fn params() -> ShapeParams {
        ShapeParams {
            geometry: Geometry::Box(BoxParams::default()),
            material: MaterialDesc::default(),
        }
    }

    #[test]
    fn unbuilt_shape_cannot_become_a_node() {
        let shape = Shape::new(params(), ShapeKind::Cuboid);
        assert!(!shape.is_built());
        assert!(matches!(shape.into_node(), Err(ShapeError::NotBuilt(ShapeKind::Cuboid))));
    }

    #[test]
    fn build_rejects_invalid_geometry() {
        let mut shape = Shape::new(
            ShapeParams {
                geometry: Geometry::Ring(RingParams {
                    outer_radius: f32::INFINITY,
                    ..RingParams::default()
                }),
                material: MaterialDesc::default(),
            },
            ShapeKind::Ring,
        );
        let err = pollster::block_on(shape.build()).unwrap_err();
        assert!(matches!(err, ShapeError::Geometry(_)));
        assert!(!shape.is_built());
    }

    #[test]
    fn copy_takes_runtime_state() {
        let mut source = Shape::new(params(), ShapeKind::Cuboid);
        pollster::block_on(source.build()).unwrap();
        source.set_position(Vec3::new(1.0, 2.0, 3.0));
        source.params.material.color = Color(0xff0000);

        let mut target = Shape::new(params(), ShapeKind::Cuboid);
        pollster::block_on(target.build()).unwrap();
        target.copy(&source);
        assert_eq!(target.transform, source.transform);
        assert_eq!(target.native().unwrap().material.color, Color(0xff0000));
    }

    #[test]
    fn physics_wrap_takes_pose_from_transform() {
        let mut shape = Shape::new(params(), ShapeKind::Cuboid);
        pollster::block_on(shape.build()).unwrap();
        shape.wrap(WrapMode::Physics(BodyDesc::dynamic(ColliderShape::Ball { radius: 1.0 })));
        shape.set_position(Vec3::new(0.0, 4.0, 0.0));
        assert!(!shape.only_visual());

        let (node, body) = shape.into_node().unwrap();
        assert_eq!(node.transform.position, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(body.unwrap().pose.position, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn clone_of_unbuilt_shape_stays_unbuilt() {
        let shape = Shape::new(params(), ShapeKind::Cuboid);
        let copy = shape.clone();
        assert!(!copy.is_built());
        assert_eq!(copy.params(), shape.params());
    }
}
