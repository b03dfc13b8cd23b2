use glam::Vec3;
use serde::{Deserialize, Serialize};
use tandem_physics::{BodyDesc, ColliderShape};
use tandem_scene::{BoxParams, Geometry, MaterialDesc};

use crate::shape::{Shape, ShapeError, ShapeKind, ShapeParams, WrapMode};

/// Box descriptor. A `mass` of zero makes the body static.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CuboidDesc {
    pub geometry: BoxParams,
    pub material: MaterialDesc,
    pub mass: f32,
    pub position: Vec3,
    /// Skip the physics body entirely.
    pub only_visual: bool,
}

impl Default for CuboidDesc {
    fn default() -> Self {
        Self {
            geometry: BoxParams::default(),
            material: MaterialDesc::default(),
            mass: 1.0,
            position: Vec3::ZERO,
            only_visual: false,
        }
    }
}

/// Box mesh factory backed by a cuboid collider.
pub struct Cuboid;

impl Cuboid {
    pub async fn create(desc: CuboidDesc) -> Result<Shape, ShapeError> {
        let mut shape = Shape::new(
            ShapeParams {
                geometry: Geometry::Box(desc.geometry),
                material: desc.material,
            },
            ShapeKind::Cuboid,
        );
        shape.build().await?;
        shape.set_position(desc.position);

        if desc.only_visual {
            shape.wrap(WrapMode::OnlyVisual);
        } else {
            let collider = ColliderShape::Cuboid {
                half_extents: desc.geometry.half_extents(),
            };
            let body = if desc.mass > 0.0 {
                BodyDesc::dynamic(collider).with_mass(desc.mass)
            } else {
                BodyDesc::fixed(collider)
            };
            shape.wrap(WrapMode::Physics(body));
        }
        Ok(shape)
    }

    /// Blocking form of [`Cuboid::create`].
    pub fn new(desc: CuboidDesc) -> Result<Shape, ShapeError> {
        pollster::block_on(Self::create(desc))
    }
}
