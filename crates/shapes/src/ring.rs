use serde::{Deserialize, Serialize};
use tandem_scene::{Geometry, MaterialDesc, RingParams};

use crate::shape::{Shape, ShapeError, ShapeKind, ShapeParams, WrapMode};

/// `{geometry, material}` descriptor for a ring. Missing geometry fields take
/// the ring defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingDesc {
    pub geometry: RingParams,
    pub material: MaterialDesc,
}

/// Flat ring mesh factory. Rings are always only-visual.
pub struct Ring;

impl Ring {
    pub async fn create(desc: RingDesc) -> Result<Shape, ShapeError> {
        let mut shape = Shape::new(
            ShapeParams {
                geometry: Geometry::Ring(desc.geometry),
                material: desc.material,
            },
            ShapeKind::Ring,
        );
        shape.build().await?;
        shape.wrap(WrapMode::OnlyVisual);
        Ok(shape)
    }

    /// Blocking form of [`Ring::create`].
    pub fn new(desc: RingDesc) -> Result<Shape, ShapeError> {
        pollster::block_on(Self::create(desc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn ring_is_built_and_only_visual() {
        let ring = Ring::new(RingDesc::default()).unwrap();
        assert!(ring.is_built());
        assert!(ring.only_visual());
        assert_eq!(ring.kind(), ShapeKind::Ring);
        let mesh = &ring.native().unwrap().mesh;
        assert_eq!(mesh.vertex_count(), 9 * 9);
    }

    #[test]
    fn descriptor_fills_defaults() {
        let desc: RingDesc =
            serde_json::from_str(r#"{"geometry": {"innerRadius": 5, "thetaSegments": 32}}"#)
                .unwrap();
        assert_eq!(desc.geometry.inner_radius, 5.0);
        assert_eq!(desc.geometry.theta_segments, 32);
        assert_eq!(desc.geometry.outer_radius, 50.0);
        assert_eq!(desc.geometry.phi_segments, 8);
    }

    #[test]
    fn clone_matches_params_and_transform() {
        let mut ring = Ring::new(RingDesc {
            geometry: RingParams {
                inner_radius: 2.0,
                outer_radius: 4.0,
                ..RingParams::default()
            },
            ..RingDesc::default()
        })
        .unwrap();
        ring.set_position(Vec3::new(1.0, 2.0, 3.0))
            .set_rotation(Quat::from_rotation_x(0.5));

        let copy = ring.clone();
        assert_eq!(copy.params(), ring.params());
        assert_eq!(copy.transform, ring.transform);
        assert!(copy.is_built());
        assert!(copy.only_visual());
        assert_eq!(copy.native().unwrap().mesh, ring.native().unwrap().mesh);
    }

    #[test]
    fn clone_is_independent() {
        let ring = Ring::new(RingDesc::default()).unwrap();
        let mut copy = ring.clone();
        copy.set_position(Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(ring.transform.position, Vec3::ZERO);
    }

    #[test]
    fn ring_never_yields_a_body() {
        let ring = Ring::new(RingDesc::default()).unwrap();
        let (_, body) = ring.into_node().unwrap();
        assert!(body.is_none());
    }
}
