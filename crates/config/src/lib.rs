//! World Settings: the merged configuration snapshot read by the frame loop.
//!
//! # Invariants
//! - Every field has a default; partial documents deep-merge over them.
//! - Settings are immutable once handed to the app.

mod settings;
mod stats;

pub use settings::{
    CameraSettings, ConfigError, ContactMaterialSettings, PhysicsSettings, SolverSettings,
    SurfaceMaterial, Vector, WorldSettings,
};
pub use stats::{StatsMode, StatsSetting};
