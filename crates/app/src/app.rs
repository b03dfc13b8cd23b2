use std::time::Duration;

use tandem_common::ObjectId;
use tandem_config::WorldSettings;
use tandem_input::{Action, CameraControls};
use tandem_physics::{PhysicsBackend, RapierWorld};
use tandem_render::{Anaglyph, Composer, Effect, Renderer, StereoFrame};
use tandem_scene::{Mixer, Node, PerspectiveCamera, Scene};
use tandem_shapes::Shape;
use tandem_tools::{PhysicsDebugOverlay, Stats};

use crate::error::FrameError;
use crate::lifecycle::{CancelToken, LoopState};
use crate::plugins::PluginQueue;
use crate::queue::{ModellingEntry, ModellingQueue, Pairing};

/// Backends handed to [`App::init`]. Either may be absent.
pub struct Collaborators<R, P> {
    pub renderer: Option<R>,
    pub physics: Option<P>,
}

impl<R, P> Default for Collaborators<R, P> {
    fn default() -> Self {
        Self {
            renderer: None,
            physics: None,
        }
    }
}

/// Application state: scene, physics world, modelling queue and everything the
/// tick drives.
pub struct App<R: Renderer, P: PhysicsBackend = RapierWorld> {
    pub(crate) settings: WorldSettings,
    pub(crate) scene: Scene,
    pub(crate) camera: PerspectiveCamera,
    pub(crate) renderer: Option<R>,
    pub(crate) physics: Option<P>,
    pub(crate) queue: ModellingQueue,
    pub(crate) plugins: PluginQueue,
    pub(crate) controls: Option<Box<dyn CameraControls>>,
    pub(crate) composer: Option<Composer<R::Output>>,
    pub(crate) anaglyph: Option<Anaglyph>,
    pub(crate) stats: Option<Stats>,
    pub(crate) debug_overlay: Option<PhysicsDebugOverlay>,
    pub(crate) stereo_frame: Option<StereoFrame<R::Output>>,
    pub(crate) direct_frame: Option<R::Output>,
    pub(crate) last_timestamp: Option<Duration>,
    pub(crate) state: LoopState,
    pub(crate) token: CancelToken,
    pub(crate) display_size: (u32, u32),
    pub(crate) ticks: u64,
}

impl<R: Renderer> App<R, RapierWorld> {
    /// Init with a rapier world built from the settings' gravity and physics
    /// section.
    pub fn with_rapier(settings: WorldSettings, renderer: Option<R>) -> Self {
        let physics = RapierWorld::with_settings(settings.gravity.to_vec3(), &settings.physics);
        Self::init(
            settings,
            Collaborators {
                renderer,
                physics: Some(physics),
            },
        )
    }
}

impl<R: Renderer, P: PhysicsBackend> App<R, P> {
    pub fn init(settings: WorldSettings, collaborators: Collaborators<R, P>) -> Self {
        let Collaborators {
            mut renderer,
            physics,
        } = collaborators;

        if let Err(e) = settings.validate() {
            tracing::warn!("settings rejected by validation, continuing: {e}");
        }
        if renderer.is_none() {
            tracing::warn!("no renderer provided; render steps will fail");
        }
        if physics.is_none() {
            tracing::warn!("no physics backend provided; ticks will fail");
        }
        if settings.container.is_some() {
            tracing::debug!("container setting has no effect in native hosts");
        }

        let mut camera = PerspectiveCamera::new(
            settings.camera.fov,
            settings.display_aspect(),
            settings.camera.near,
            settings.camera.far,
        );
        camera.position = settings.camera.position();
        camera.target = camera.position + glam::Vec3::NEG_Z;

        let mut scene = Scene::new();
        scene.background = settings.background;
        scene.shadows = settings.shadowmap;

        if let Some(renderer) = renderer.as_mut() {
            renderer.set_clear_color(settings.background);
            renderer.set_shadows(settings.shadowmap);
            renderer.set_size(settings.r_width, settings.r_height);
        }

        let stats = settings.stats.resolve().map(Stats::new);
        let debug_overlay = if settings.helper {
            if physics.is_none() {
                tracing::warn!("helper overlay enabled without a physics backend");
            }
            Some(PhysicsDebugOverlay::new())
        } else {
            None
        };
        let anaglyph = settings
            .anaglyph
            .then(|| Anaglyph::new(settings.r_width, settings.r_height));
        let composer = if settings.wagner {
            if renderer.is_some() {
                Some(Composer::new(settings.r_width, settings.r_height))
            } else {
                tracing::warn!("compositor enabled without a renderer; skipping it");
                None
            }
        } else {
            None
        };

        tracing::info!(
            render = ?(settings.r_width, settings.r_height),
            display = ?(settings.width, settings.height),
            anaglyph = settings.anaglyph,
            compositor = composer.is_some(),
            stats = stats.is_some(),
            helper = settings.helper,
            "app initialized"
        );

        let display_size = (settings.width, settings.height);
        Self {
            settings,
            scene,
            camera,
            renderer,
            physics,
            queue: ModellingQueue::new(),
            plugins: PluginQueue::new(),
            controls: None,
            composer,
            anaglyph,
            stats,
            debug_overlay,
            stereo_frame: None,
            direct_frame: None,
            last_timestamp: None,
            state: LoopState::Idle,
            token: CancelToken::new(),
            display_size,
            ticks: 0,
        }
    }

    /// Add a built shape to the scene, creating its body when it asks for one.
    pub fn add(&mut self, shape: Shape) -> Result<ObjectId, FrameError> {
        let kind = shape.kind();
        let (node, body) = shape.into_node()?;
        let pairing = match body {
            Some(desc) => {
                let physics = self
                    .physics
                    .as_mut()
                    .ok_or(FrameError::MissingCollaborator("physics backend"))?;
                Pairing::Physics(physics.add_body(&desc))
            }
            None => Pairing::VisualOnly,
        };
        let id = self.scene.add(node);
        tracing::debug!(id = %id.short(), kind = %kind, pairing = ?pairing, "shape added");
        self.queue.push(ModellingEntry::new(id, pairing));
        Ok(id)
    }

    /// Add a visual-only node such as a light.
    pub fn add_node(&mut self, node: Node) -> ObjectId {
        let id = self.scene.add(node);
        self.queue.push(ModellingEntry::new(id, Pairing::VisualOnly));
        id
    }

    /// Detach a node, its queue entry and its body.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let node = self.scene.remove(id);
        let entry = self.queue.remove(id);
        if let (Some(handle), Some(physics)) =
            (entry.as_ref().and_then(|e| e.body()), self.physics.as_mut())
        {
            physics.remove_body(handle);
        }
        node.is_some() || entry.is_some()
    }

    /// Suspend or resume physics sync for one object.
    pub fn set_skip(&mut self, id: ObjectId, skip: bool) -> bool {
        match self.queue.get_mut(id) {
            Some(entry) => {
                entry.skip = skip;
                true
            }
            None => false,
        }
    }

    pub fn set_mixer(&mut self, id: ObjectId, mixer: impl Mixer + 'static) -> bool {
        match self.queue.get_mut(id) {
            Some(entry) => {
                entry.mixer = Some(Box::new(mixer));
                true
            }
            None => false,
        }
    }

    pub fn attach_controls(&mut self, controls: impl CameraControls + 'static) {
        self.controls = Some(Box::new(controls));
    }

    pub fn detach_controls(&mut self) -> Option<Box<dyn CameraControls>> {
        self.controls.take()
    }

    /// Forward a host action to the attached controls.
    pub fn handle_action(&mut self, action: Action) {
        if let Some(controls) = self.controls.as_mut() {
            controls.handle(action);
        }
    }

    /// Register a compositor pass. Returns false when no compositor exists.
    pub fn add_effect(&mut self, effect: impl Effect<R::Output> + 'static) -> bool {
        match self.composer.as_mut() {
            Some(composer) => {
                composer.add_effect(effect);
                true
            }
            None => {
                tracing::warn!(effect = effect.name(), "no compositor; effect dropped");
                false
            }
        }
    }

    /// Apply a host window resize. Ignored unless `autoresize` is on.
    ///
    /// The camera aspect and the display size follow the window; the renderer
    /// and the compositor stay at the configured render resolution.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.settings.autoresize {
            tracing::trace!(width, height, "resize ignored, autoresize off");
            return false;
        }
        let (rw, rh) = (self.settings.r_width, self.settings.r_height);
        self.camera.aspect = width as f32 / height.max(1) as f32;
        self.camera.update_projection_matrix();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_size(rw, rh);
        }
        if let Some(composer) = self.composer.as_mut() {
            composer.set_size(rw, rh);
        }
        self.display_size = (width, height);
        tracing::debug!(width, height, "display resized");
        true
    }

    /// Stop the loop. Later ticks return [`FrameError::Stopped`].
    pub fn stop(&mut self) {
        self.token.cancel();
        self.state = LoopState::Stopped;
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn physics(&self) -> Option<&P> {
        self.physics.as_ref()
    }

    pub fn physics_mut(&mut self) -> Option<&mut P> {
        self.physics.as_mut()
    }

    pub fn queue(&self) -> &ModellingQueue {
        &self.queue
    }

    pub fn plugins_mut(&mut self) -> &mut PluginQueue {
        &mut self.plugins
    }

    pub fn composer(&self) -> Option<&Composer<R::Output>> {
        self.composer.as_ref()
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn stats_mut(&mut self) -> Option<&mut Stats> {
        self.stats.as_mut()
    }

    pub fn debug_overlay(&self) -> Option<&PhysicsDebugOverlay> {
        self.debug_overlay.as_ref()
    }

    /// Last compositor output.
    pub fn screen(&self) -> Option<&R::Output> {
        self.composer.as_ref().and_then(|c| c.screen())
    }

    pub fn stereo_frame(&self) -> Option<&StereoFrame<R::Output>> {
        self.stereo_frame.as_ref()
    }

    pub fn direct_frame(&self) -> Option<&R::Output> {
        self.direct_frame.as_ref()
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display_size
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<R: Renderer, P: PhysicsBackend> std::fmt::Debug for App<R, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("ticks", &self.ticks)
            .field("nodes", &self.scene.len())
            .field("queue", &self.queue.len())
            .field("renderer", &self.renderer.is_some())
            .field("physics", &self.physics.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tandem_common::Color;
    use tandem_config::StatsSetting;
    use tandem_render::DebugTextRenderer;
    use tandem_scene::{Light, LightKind};
    use tandem_shapes::{Cuboid, CuboidDesc, Ring, RingDesc};

    fn app(settings: WorldSettings) -> App<DebugTextRenderer> {
        App::with_rapier(settings, Some(DebugTextRenderer::new()))
    }

    #[test]
    fn init_applies_settings() {
        let mut settings = WorldSettings::default();
        settings.r_width = 640;
        settings.r_height = 480;
        settings.camera.z = 20.0;
        settings.stats = StatsSetting::Mode("ms".into());
        let app = app(settings);

        assert_eq!(app.renderer().unwrap().size(), (640, 480));
        assert_eq!(app.composer().unwrap().size(), (640, 480));
        assert_eq!(app.camera().position, Vec3::new(0.0, 0.0, 20.0));
        assert!((app.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert!(app.stats().is_some());
        assert!(app.debug_overlay().is_none());
        assert!(app.scene().shadows);
        assert_eq!(app.state(), LoopState::Idle);
    }

    #[test]
    fn compositor_needs_a_renderer() {
        let app: App<DebugTextRenderer> = App::with_rapier(WorldSettings::default(), None);
        assert!(app.composer().is_none());

        let mut settings = WorldSettings::default();
        settings.wagner = false;
        assert!(self::app(settings).composer().is_none());
    }

    #[test]
    fn add_pairs_bodies_and_visuals() {
        let mut app = app(WorldSettings::default());
        let cube = app.add(Cuboid::new(CuboidDesc::default()).unwrap()).unwrap();
        let ring = app.add(Ring::new(RingDesc::default()).unwrap()).unwrap();
        let light = app.add_node(Node::light(
            "sun",
            Light {
                kind: LightKind::Ambient,
                color: Color::WHITE,
                intensity: 0.5,
            },
        ));

        assert!(app.queue().get(cube).unwrap().has_body());
        assert!(app.queue().get(ring).unwrap().only_visual());
        assert!(app.queue().get(light).unwrap().only_visual());
        assert_eq!(app.physics().unwrap().body_count(), 1);
        assert_eq!(app.scene().len(), 3);
    }

    #[test]
    fn physics_shape_without_backend_is_rejected() {
        let mut app: App<DebugTextRenderer> = App::init(
            WorldSettings::default(),
            Collaborators {
                renderer: Some(DebugTextRenderer::new()),
                physics: None::<RapierWorld>,
            },
        );
        let err = app.add(Cuboid::new(CuboidDesc::default()).unwrap()).unwrap_err();
        assert!(matches!(err, FrameError::MissingCollaborator(_)));
        assert!(app.scene().is_empty());
    }

    #[test]
    fn remove_detaches_body_and_entry() {
        let mut app = app(WorldSettings::default());
        let cube = app.add(Cuboid::new(CuboidDesc::default()).unwrap()).unwrap();
        assert!(app.remove(cube));
        assert!(app.queue().is_empty());
        assert!(app.scene().is_empty());
        assert_eq!(app.physics().unwrap().body_count(), 0);
        assert!(!app.remove(cube));
    }

    #[test]
    fn resize_keeps_render_resolution_fixed() {
        let mut settings = WorldSettings::default();
        settings.autoresize = true;
        settings.r_width = 800;
        settings.r_height = 600;
        let mut app = app(settings);

        assert!(app.resize(1000, 500));
        assert_eq!(app.display_size(), (1000, 500));
        assert!((app.camera().aspect - 2.0).abs() < 1e-6);
        assert_eq!(app.renderer().unwrap().size(), (800, 600));
        assert_eq!(app.composer().unwrap().size(), (800, 600));
    }

    #[test]
    fn resize_ignored_without_autoresize() {
        let mut app = app(WorldSettings::default());
        let aspect = app.camera().aspect;
        assert!(!app.resize(100, 100));
        assert_eq!(app.display_size(), (1280, 720));
        assert_eq!(app.camera().aspect, aspect);
    }

    #[test]
    fn effects_need_a_compositor() {
        let mut settings = WorldSettings::default();
        settings.wagner = false;
        let mut app = app(settings);
        assert!(!app.add_effect(|s: &String| s.clone()));

        let mut app = self::app(WorldSettings::default());
        assert!(app.add_effect(|s: &String| s.clone()));
        assert_eq!(app.composer().unwrap().effect_count(), 1);
    }
}
