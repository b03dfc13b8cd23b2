//! Shape Factory: builds renderable meshes from declarative parameters.
//!
//! # Invariants
//! - A shape keeps the parameter set it was created from; `clone` rebuilds
//!   from it and then copies runtime transform state.
//! - Only-visual shapes never request a physics body.

mod cuboid;
mod ring;
mod shape;

pub use cuboid::{Cuboid, CuboidDesc};
pub use ring::{Ring, RingDesc};
pub use shape::{Shape, ShapeError, ShapeKind, ShapeParams, WrapMode};

pub fn crate_info() -> &'static str {
    "tandem-shapes v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tandem-shapes"));
    }
}
