//! Input: high-level actions and the camera controls that consume them.
//!
//! # Invariants
//! - Hosts translate raw device events into [`Action`]s; controls never see
//!   window-system types.
//! - Controls advance by the wall-clock delta handed to them, never by the
//!   fixed physics step.

pub mod action;
pub mod controls;

pub use action::Action;
pub use controls::{CameraControls, FlyControls};
