//! Declarative geometry descriptors and their tessellation into triangle meshes.
//!
//! Tessellation clamps degenerate segment counts instead of failing, so a
//! descriptor that passes [`Geometry::validate`] always produces a mesh.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Errors from geometry validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("`{0}` must be finite")]
    NonFinite(&'static str),
    #[error("`{field}` must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Flat annulus (or disc when `inner_radius` is zero) in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingParams {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub theta_segments: u32,
    pub phi_segments: u32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            outer_radius: 50.0,
            theta_segments: 8,
            phi_segments: 8,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Axis-aligned box centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

impl BoxParams {
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth) * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Ring(RingParams),
    Box(BoxParams),
}

impl Geometry {
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Ring(p) => {
                for (field, value) in [
                    ("innerRadius", p.inner_radius),
                    ("outerRadius", p.outer_radius),
                    ("thetaStart", p.theta_start),
                    ("thetaLength", p.theta_length),
                ] {
                    if !value.is_finite() {
                        return Err(GeometryError::NonFinite(field));
                    }
                }
                non_negative("innerRadius", p.inner_radius)?;
                non_negative("outerRadius", p.outer_radius)
            }
            Self::Box(p) => {
                for (field, value) in [
                    ("width", p.width),
                    ("height", p.height),
                    ("depth", p.depth),
                ] {
                    if !value.is_finite() {
                        return Err(GeometryError::NonFinite(field));
                    }
                    non_negative(field, value)?;
                }
                Ok(())
            }
        }
    }

    pub fn tessellate(&self) -> MeshData {
        match self {
            Self::Ring(p) => tessellate_ring(p),
            Self::Box(p) => tessellate_box(p),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Ring(_) => "ring",
            Self::Box(_) => "box",
        }
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), GeometryError> {
    if value < 0.0 {
        Err(GeometryError::Negative { field, value })
    } else {
        Ok(())
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Min and max corners of the vertex positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(*self.positions.first()?);
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            let p = Vec3::from(*p);
            (lo.min(p), hi.max(p))
        }))
    }
}

fn tessellate_ring(p: &RingParams) -> MeshData {
    let theta_segments = p.theta_segments.max(3);
    let phi_segments = p.phi_segments.max(1);
    let radius_step = (p.outer_radius - p.inner_radius) / phi_segments as f32;
    let ring_len = (theta_segments + 1) as usize * (phi_segments + 1) as usize;

    let mut mesh = MeshData {
        positions: Vec::with_capacity(ring_len),
        normals: Vec::with_capacity(ring_len),
        uvs: Vec::with_capacity(ring_len),
        indices: Vec::with_capacity(6 * (theta_segments * phi_segments) as usize),
    };

    let mut radius = p.inner_radius;
    for _ in 0..=phi_segments {
        for i in 0..=theta_segments {
            let segment = p.theta_start + i as f32 / theta_segments as f32 * p.theta_length;
            let x = radius * segment.cos();
            let y = radius * segment.sin();
            mesh.positions.push([x, y, 0.0]);
            mesh.normals.push([0.0, 0.0, 1.0]);
            let (u, v) = if p.outer_radius > 0.0 {
                (
                    (x / p.outer_radius + 1.0) / 2.0,
                    (y / p.outer_radius + 1.0) / 2.0,
                )
            } else {
                (0.5, 0.5)
            };
            mesh.uvs.push([u, v]);
        }
        radius += radius_step;
    }

    for j in 0..phi_segments {
        let level = j * (theta_segments + 1);
        for i in 0..theta_segments {
            let a = i + level;
            let b = a + theta_segments + 1;
            let c = a + theta_segments + 2;
            let d = a + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

fn tessellate_box(p: &BoxParams) -> MeshData {
    let h = p.half_extents();
    // normal, then the two in-plane axes scaled to the face size
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::new(0.0, 0.0, -h.z), Vec3::new(0.0, h.y, 0.0)),
        (Vec3::NEG_X, Vec3::new(0.0, 0.0, h.z), Vec3::new(0.0, h.y, 0.0)),
        (Vec3::Y, Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, 0.0, -h.z)),
        (Vec3::NEG_Y, Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, 0.0, h.z)),
        (Vec3::Z, Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, h.y, 0.0)),
        (Vec3::NEG_Z, Vec3::new(-h.x, 0.0, 0.0), Vec3::new(0.0, h.y, 0.0)),
    ];

    let mut mesh = MeshData::default();
    for (normal, u_axis, v_axis) in faces {
        let center = normal * h;
        let base = mesh.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let pos = center + u_axis * su + v_axis * sv;
            mesh.positions.push(pos.to_array());
            mesh.normals.push(normal.to_array());
            mesh.uvs.push([(su + 1.0) / 2.0, (sv + 1.0) / 2.0]);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_defaults() {
        let p = RingParams::default();
        assert_eq!(p.inner_radius, 0.0);
        assert_eq!(p.outer_radius, 50.0);
        assert_eq!((p.theta_segments, p.phi_segments), (8, 8));
        assert_eq!(p.theta_length, TAU);
    }

    #[test]
    fn ring_counts() {
        let mesh = Geometry::Ring(RingParams {
            inner_radius: 1.0,
            outer_radius: 2.0,
            theta_segments: 16,
            phi_segments: 2,
            ..RingParams::default()
        })
        .tessellate();
        assert_eq!(mesh.vertex_count(), 17 * 3);
        assert_eq!(mesh.indices.len(), 6 * 16 * 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn ring_radii_bound_the_vertices() {
        let mesh = Geometry::Ring(RingParams {
            inner_radius: 3.0,
            outer_radius: 5.0,
            ..RingParams::default()
        })
        .tessellate();
        for p in &mesh.positions {
            let r = Vec3::from(*p).length();
            assert!(r >= 3.0 - 1e-4 && r <= 5.0 + 1e-4, "radius {r}");
            assert_eq!(p[2], 0.0);
        }
    }

    #[test]
    fn ring_clamps_degenerate_segments() {
        let mesh = Geometry::Ring(RingParams {
            theta_segments: 0,
            phi_segments: 0,
            ..RingParams::default()
        })
        .tessellate();
        // clamped to 3 x 1
        assert_eq!(mesh.vertex_count(), 4 * 2);
        assert_eq!(mesh.triangle_count(), 6);
    }

    #[test]
    fn ring_validation() {
        let bad = Geometry::Ring(RingParams {
            outer_radius: f32::NAN,
            ..RingParams::default()
        });
        assert_eq!(bad.validate(), Err(GeometryError::NonFinite("outerRadius")));

        let neg = Geometry::Ring(RingParams {
            inner_radius: -1.0,
            ..RingParams::default()
        });
        assert!(matches!(neg.validate(), Err(GeometryError::Negative { .. })));
        assert!(Geometry::Ring(RingParams::default()).validate().is_ok());
    }

    #[test]
    fn box_mesh() {
        let mesh = Geometry::Box(BoxParams {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
        })
        .tessellate();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(hi, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn partial_ring_descriptor_uses_defaults() {
        let g: Geometry =
            serde_json::from_str(r#"{"type": "ring", "innerRadius": 10}"#).unwrap();
        let Geometry::Ring(p) = g else {
            panic!("expected ring");
        };
        assert_eq!(p.inner_radius, 10.0);
        assert_eq!(p.outer_radius, 50.0);
        assert_eq!(p.theta_segments, 8);
    }
}
