use glam::Vec3;

/// A high-level action produced by a host from raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Set the held movement direction in camera space: `x` right, `y` up,
    /// `z` forward. `Vec3::ZERO` releases it.
    Move(Vec3),
    /// Pointer motion in pixels.
    Look { dx: f32, dy: f32 },
    /// Speed multiplier held or released.
    Boost(bool),
    /// Unbound input.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Noop)
    }
}
