//! Shared types used across the tandem crates.

mod types;

pub use types::{Color, ObjectId, Transform};
