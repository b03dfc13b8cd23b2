use tandem_scene::{PerspectiveCamera, Scene};

use crate::renderer::Renderer;

/// A post-processing pass over one rendered frame.
pub trait Effect<T> {
    fn name(&self) -> &str {
        "effect"
    }

    fn apply(&mut self, input: &T) -> T;
}

impl<T, F> Effect<T> for F
where
    F: FnMut(&T) -> T,
{
    fn apply(&mut self, input: &T) -> T {
        self(input)
    }
}

/// Post-processing compositor.
///
/// A frame goes `reset` -> `render` -> `pass`* -> `to_screen`. Effects
/// registered with [`Composer::add_effect`] run in registration order via
/// [`Composer::run_effects`].
pub struct Composer<T> {
    buffer: Option<T>,
    screen: Option<T>,
    effects: Vec<Box<dyn Effect<T>>>,
    width: u32,
    height: u32,
    passes: usize,
    pub auto_clear_color: bool,
}

impl<T> Composer<T> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: None,
            screen: None,
            effects: Vec::new(),
            width,
            height,
            passes: 0,
            auto_clear_color: true,
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn add_effect(&mut self, effect: impl Effect<T> + 'static) {
        tracing::debug!(effect = effect.name(), "effect registered");
        self.effects.push(Box::new(effect));
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Drop the working buffer and the pass count of the previous frame.
    pub fn reset(&mut self) {
        self.buffer = None;
        self.passes = 0;
        if self.auto_clear_color {
            self.screen = None;
        }
    }

    /// Render the scene into the working buffer.
    pub fn render<R>(&mut self, renderer: &mut R, scene: &Scene, camera: &PerspectiveCamera)
    where
        R: Renderer<Output = T>,
    {
        renderer.set_size(self.width, self.height);
        self.buffer = Some(renderer.render(scene, camera));
    }

    /// Apply one effect to the working buffer. A no-op before `render`.
    pub fn pass(&mut self, effect: &mut dyn Effect<T>) {
        match self.buffer.take() {
            Some(input) => {
                self.buffer = Some(effect.apply(&input));
                self.passes += 1;
            }
            None => tracing::warn!(effect = effect.name(), "pass skipped, nothing rendered"),
        }
    }

    /// Apply every registered effect in registration order.
    pub fn run_effects(&mut self) -> usize {
        let mut effects = std::mem::take(&mut self.effects);
        for effect in effects.iter_mut() {
            self.pass(&mut **effect);
        }
        self.effects = effects;
        self.passes
    }

    /// Present the working buffer.
    pub fn to_screen(&mut self) -> Option<&T> {
        if let Some(frame) = self.buffer.take() {
            self.screen = Some(frame);
        }
        self.screen.as_ref()
    }

    pub fn screen(&self) -> Option<&T> {
        self.screen.as_ref()
    }

    /// Passes applied since the last `reset`.
    pub fn passes(&self) -> usize {
        self.passes
    }
}

impl<T> std::fmt::Debug for Composer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("effects", &self.effects.len())
            .field("passes", &self.passes)
            .finish()
    }
}
