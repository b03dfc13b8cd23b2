//! Scene Graph: the visual half of the application state.
//!
//! # Invariants
//! - The scene owns its nodes; removing a node drops it.
//! - Iteration order is deterministic (BTreeMap keyed by `ObjectId`).
//! - Geometry is tessellated once, when a mesh node is built.

pub mod anim;
pub mod camera;
pub mod geometry;
pub mod material;
pub mod scene;

pub use anim::{Mixer, MorphClip, MorphKeyframe, MorphMixer};
pub use camera::PerspectiveCamera;
pub use geometry::{BoxParams, Geometry, GeometryError, MeshData, RingParams};
pub use material::{MaterialDesc, MaterialKind, Side};
pub use scene::{Light, LightKind, MeshNode, Node, NodeContent, Scene};
