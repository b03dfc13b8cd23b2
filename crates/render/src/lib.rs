//! Rendering Adapter: renderer-agnostic interface plus the two alternative
//! output paths the frame loop can take.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - Composer passes run in registration order on one frame at a time.
//!
//! # Workaround
//! Ships a text renderer behind the `Renderer` trait so the whole frame loop
//! runs headless. A GPU backend implements the same trait.

mod anaglyph;
mod composer;
mod renderer;

pub use anaglyph::{Anaglyph, StereoFrame};
pub use composer::{Composer, Effect};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "tandem-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tandem-render"));
    }
}
