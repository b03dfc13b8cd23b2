use std::time::{Duration, Instant};

use tandem_physics::{FIXED_TIMESTEP, PhysicsBackend, PhysicsError};
use tandem_render::Renderer;
use tandem_tools::StatsSample;

use crate::app::App;
use crate::error::FrameError;
use crate::lifecycle::LoopState;

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// Wall-clock time since the previous tick; zero on the first.
    pub wall_delta: Duration,
    pub synced: usize,
    pub mixers: usize,
    /// Simulated seconds added to the physics world.
    pub stepped: f32,
    pub debug_overlay: bool,
    pub stereo: bool,
    pub direct: bool,
    pub controls: bool,
    /// Passes applied by the compositor, when one ran.
    pub composed: Option<usize>,
    pub stats: Option<StatsSample>,
    pub plugins: usize,
}

impl<R: Renderer, P: PhysicsBackend> App<R, P> {
    /// Run one frame. `timestamp` is the host's frame time since loop start.
    pub fn tick(&mut self, timestamp: Duration) -> Result<TickReport, FrameError> {
        if self.token.is_cancelled() {
            self.state = LoopState::Stopped;
        }
        if self.state == LoopState::Stopped {
            return Err(FrameError::Stopped);
        }
        let Some(physics) = self.physics.as_mut() else {
            return Err(FrameError::MissingCollaborator("physics backend"));
        };
        if self.renderer.is_none() && (self.settings.anaglyph || self.settings.direct_render) {
            return Err(FrameError::MissingCollaborator("renderer"));
        }

        // Poses are read up front so an unknown body fails the tick before
        // any node, counter or overlay has changed.
        let poses = self
            .queue
            .iter()
            .map(|entry| match entry.body() {
                Some(handle) if !entry.skip && self.scene.get(entry.object).is_some() => physics
                    .pose(handle)
                    .map(Some)
                    .ok_or(PhysicsError::UnknownBody(handle)),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.state = LoopState::Running;
        self.ticks += 1;

        let _span = tracing::info_span!("tick", n = self.ticks).entered();
        let wall_delta = self
            .last_timestamp
            .map(|last| timestamp.saturating_sub(last))
            .unwrap_or(Duration::ZERO);
        self.last_timestamp = Some(timestamp);
        let dt = wall_delta.as_secs_f32();

        let mut report = TickReport {
            tick: self.ticks,
            wall_delta,
            ..TickReport::default()
        };

        if let Some(stats) = self.stats.as_mut() {
            stats.begin(Instant::now());
        }

        if let Some(overlay) = self.debug_overlay.as_mut() {
            overlay.update(&*physics);
            report.debug_overlay = true;
        }

        for (entry, pose) in self.queue.iter_mut().zip(poses) {
            let Some(node) = self.scene.get_mut(entry.object) else {
                continue;
            };
            if let Some(pose) = pose {
                node.transform.position = pose.position;
                if node.rotatable {
                    node.transform.rotation = pose.rotation;
                }
                report.synced += 1;
            }
            if let Some(mixer) = entry.mixer.as_mut() {
                mixer.update(dt, node);
                report.mixers += 1;
            }
        }

        physics.step(FIXED_TIMESTEP);
        report.stepped = FIXED_TIMESTEP;

        if let Some(anaglyph) = self.anaglyph.as_mut() {
            if let Some(renderer) = self.renderer.as_mut() {
                self.stereo_frame = Some(anaglyph.render(renderer, &self.scene, &self.camera));
                report.stereo = true;
            }
        } else if self.settings.direct_render {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.set_size(self.settings.r_width, self.settings.r_height);
                self.direct_frame = Some(renderer.render(&self.scene, &self.camera));
                report.direct = true;
            }
        }

        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera, dt);
            report.controls = true;
        }

        if let (Some(composer), Some(renderer)) = (self.composer.as_mut(), self.renderer.as_mut()) {
            composer.reset();
            composer.render(renderer, &self.scene, &self.camera);
            let passes = composer.run_effects();
            composer.to_screen();
            report.composed = Some(passes);
        }

        if let Some(stats) = self.stats.as_mut() {
            report.stats = Some(stats.end(Instant::now()));
        }

        report.plugins = self.plugins.run(timestamp.as_secs_f64());

        tracing::trace!(
            synced = report.synced,
            mixers = report.mixers,
            plugins = report.plugins,
            "tick complete"
        );
        Ok(report)
    }
}
