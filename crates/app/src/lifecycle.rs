use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tandem_physics::PhysicsBackend;
use tandem_render::Renderer;

use crate::app::App;
use crate::error::FrameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Shared stop flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Source of frame timestamps, measured from the start of the loop.
pub trait FrameScheduler {
    /// Wait for the next frame. `None` ends the loop.
    fn next_frame(&mut self) -> Option<Duration>;
}

/// Real-time scheduler sleeping until each refresh deadline.
#[derive(Debug)]
pub struct FixedRate {
    interval: Duration,
    start: Option<Instant>,
    frame: u64,
    limit: Option<u64>,
}

impl FixedRate {
    pub fn new(hz: f64) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / hz.max(1.0)),
            start: None,
            frame: 0,
            limit: None,
        }
    }

    /// Stop after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Offset of the current frame's deadline from the loop start.
    fn deadline_offset(&self) -> Duration {
        self.interval.mul_f64(self.frame as f64)
    }
}

impl FrameScheduler for FixedRate {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.limit.is_some_and(|limit| self.frame >= limit) {
            return None;
        }
        let start = *self.start.get_or_insert_with(Instant::now);
        let deadline = start + self.deadline_offset();
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.frame += 1;
        Some(start.elapsed())
    }
}

/// Deterministic scheduler: `frames` timestamps spaced `dt` apart, no sleeping.
#[derive(Debug, Clone)]
pub struct Stepped {
    remaining: u64,
    dt: Duration,
    now: Duration,
}

impl Stepped {
    pub fn new(frames: u64, dt: Duration) -> Self {
        Self {
            remaining: frames,
            dt,
            now: Duration::ZERO,
        }
    }
}

impl FrameScheduler for Stepped {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let now = self.now;
        self.now += self.dt;
        Some(now)
    }
}

/// Drives [`App::tick`] from a scheduler.
pub struct FrameLoop;

impl FrameLoop {
    /// Tick until the scheduler runs dry or the app's token is cancelled.
    /// Returns the number of completed ticks.
    pub fn run<R, P, S>(app: &mut App<R, P>, scheduler: &mut S) -> Result<u64, FrameError>
    where
        R: Renderer,
        P: PhysicsBackend,
        S: FrameScheduler + ?Sized,
    {
        let mut ticks = 0;
        while let Some(timestamp) = scheduler.next_frame() {
            match app.tick(timestamp) {
                Ok(_) => ticks += 1,
                Err(FrameError::Stopped) => break,
                Err(e) => {
                    app.stop();
                    return Err(e);
                }
            }
        }
        tracing::info!(ticks, state = ?app.state(), "frame loop finished");
        Ok(ticks)
    }
}
