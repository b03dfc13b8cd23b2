use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tandem_common::Color;

use crate::stats::StatsSetting;

/// Errors from loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported settings format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A plain `{x, y, z}` triple as it appears in settings documents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Perspective camera parameters.
///
/// The field of view is written as `aspect` in settings documents; `fov` is
/// accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    #[serde(rename = "aspect", alias = "fov")]
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 1.0,
            far: 1000.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl CameraSettings {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub iterations: u32,
    pub tolerance: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iterations: 20,
            tolerance: 0.0,
        }
    }
}

/// Contact equation tuning of the default contact material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactMaterialSettings {
    pub contact_equation_stiffness: f64,
    pub contact_equation_regularization_time: f32,
}

impl Default for ContactMaterialSettings {
    fn default() -> Self {
        Self {
            contact_equation_stiffness: 1e8,
            contact_equation_regularization_time: 3.0,
        }
    }
}

/// Surface response applied to colliders that do not set their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            friction: 0.0,
            restitution: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsSettings {
    pub quat_normalize_skip: u32,
    pub quat_normalize_fast: bool,
    pub solver: SolverSettings,
    pub def_material: ContactMaterialSettings,
    pub contact_material: SurfaceMaterial,
}

/// The merged settings snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldSettings {
    pub anaglyph: bool,
    pub helper: bool,
    pub stats: StatsSetting,
    /// Enables the post-processing compositor.
    pub wagner: bool,
    pub autoresize: bool,
    pub shadowmap: bool,
    pub gravity: Vector,
    pub camera: CameraSettings,
    /// Render resolution.
    pub r_width: u32,
    pub r_height: u32,
    /// Display size.
    pub width: u32,
    pub height: u32,
    pub physics: PhysicsSettings,
    pub background: Color,
    pub assets: PathBuf,
    /// Render the scene directly before the compositor runs.
    pub direct_render: bool,
    /// Mount point in hosts that have one. Unused by native hosts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            anaglyph: false,
            helper: false,
            stats: StatsSetting::default(),
            wagner: true,
            autoresize: false,
            shadowmap: true,
            gravity: Vector::default(),
            camera: CameraSettings::default(),
            r_width: 1280,
            r_height: 720,
            width: 1280,
            height: 720,
            physics: PhysicsSettings::default(),
            background: Color::BLACK,
            assets: PathBuf::from("./assets"),
            direct_render: false,
            container: None,
        }
    }
}

impl WorldSettings {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let settings = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&data)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&data)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Reject values the backends cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.r_width == 0 || self.r_height == 0 {
            return Err(ConfigError::Invalid {
                field: "rWidth/rHeight",
                reason: "render resolution must be non-zero".into(),
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "width/height",
                reason: "display size must be non-zero".into(),
            });
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid {
                field: "camera.near/far",
                reason: format!(
                    "expected 0 < near < far, got near={} far={}",
                    self.camera.near, self.camera.far
                ),
            });
        }
        Ok(())
    }

    /// Aspect ratio of the display area.
    pub fn display_aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatsMode;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_table() {
        let s = WorldSettings::default();
        assert!(!s.anaglyph && !s.helper && !s.autoresize);
        assert!(s.wagner && s.shadowmap);
        assert_eq!(s.gravity, Vector::new(0.0, 0.0, 0.0));
        assert_eq!(s.camera.fov, 75.0);
        assert_eq!(s.physics.solver.iterations, 20);
        assert_eq!(s.physics.def_material.contact_equation_stiffness, 1e8);
        assert_eq!(s.physics.def_material.contact_equation_regularization_time, 3.0);
        assert_eq!(s.physics.contact_material.restitution, 0.3);
        assert_eq!(s.background, Color::BLACK);
        assert!(!s.direct_render);
        assert_eq!(s.stats.resolve(), None);
    }

    #[test]
    fn partial_json_deep_merges_over_defaults() {
        let s = WorldSettings::from_json_str(
            r#"{
                "gravity": {"y": -9.8},
                "camera": {"z": 50},
                "physics": {"solver": {"iterations": 5}},
                "rWidth": 640,
                "stats": "ms"
            }"#,
        )
        .unwrap();
        assert_eq!(s.gravity, Vector::new(0.0, -9.8, 0.0));
        assert_eq!(s.camera.z, 50.0);
        assert_eq!(s.camera.far, 1000.0);
        assert_eq!(s.physics.solver.iterations, 5);
        assert_eq!(s.physics.solver.tolerance, 0.0);
        assert_eq!(s.r_width, 640);
        assert_eq!(s.r_height, 720);
        assert_eq!(s.stats.resolve(), Some(StatsMode::Ms));
    }

    #[test]
    fn camera_fov_is_read_from_aspect_key() {
        let s = WorldSettings::from_json_str(r#"{"camera": {"aspect": 45}}"#).unwrap();
        assert_eq!(s.camera.fov, 45.0);
        let s = WorldSettings::from_json_str(r#"{"camera": {"fov": 60}}"#).unwrap();
        assert_eq!(s.camera.fov, 60.0);
    }

    #[test]
    fn yaml_document() {
        let s = WorldSettings::from_yaml_str(
            "wagner: false\nhelper: true\nphysics:\n  quatNormalizeFast: true\n  defMaterial:\n    contactEquationStiffness: 1000\n",
        )
        .unwrap();
        assert!(!s.wagner);
        assert!(s.helper);
        assert!(s.physics.quat_normalize_fast);
        assert_eq!(s.physics.def_material.contact_equation_stiffness, 1000.0);
    }

    #[test]
    fn zero_resolution_rejected() {
        let err = WorldSettings::from_json_str(r#"{"rHeight": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "anaglyph: true").unwrap();
        let s = WorldSettings::load(&path).unwrap();
        assert!(s.anaglyph);

        let bad = dir.path().join("world.toml");
        std::fs::write(&bad, "anaglyph = true").unwrap();
        assert!(matches!(
            WorldSettings::load(&bad),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn container_is_accepted() {
        let s = WorldSettings::from_json_str(r#"{"container": "body"}"#).unwrap();
        assert_eq!(s.container.as_deref(), Some("body"));
    }
}
