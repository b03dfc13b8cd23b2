//! Developer Tooling: performance overlay, physics debug overlay, scene inspector.
//!
//! # Invariants
//! - Tools only read application state; they never change what is simulated or drawn.

mod inspector;
mod physics_debug;
mod stats;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
pub use physics_debug::PhysicsDebugOverlay;
pub use stats::{Stats, StatsSample};

pub fn crate_info() -> &'static str {
    "tandem-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tandem-tools"));
    }
}
