//! Frame Orchestrator: application state and the per-refresh tick that keeps
//! physics and visuals in sync.
//!
//! # Invariants
//! - Every tick advances the physics world by exactly [`FIXED_TIMESTEP`].
//! - Physics-paired, non-skipped nodes take their body pose before the step.
//! - Plugins run last, in registration order.
//! - Settings are frozen after [`App::init`].
//!
//! [`FIXED_TIMESTEP`]: tandem_physics::FIXED_TIMESTEP

mod app;
mod error;
mod frame;
mod lifecycle;
mod plugins;
mod queue;

pub use app::{App, Collaborators};
pub use error::FrameError;
pub use frame::TickReport;
pub use lifecycle::{CancelToken, FixedRate, FrameLoop, FrameScheduler, LoopState, Stepped};
pub use plugins::{PluginId, PluginQueue};
pub use queue::{ModellingEntry, ModellingQueue, Pairing};

pub fn crate_info() -> &'static str {
    "tandem-app v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tandem-app"));
    }
}
