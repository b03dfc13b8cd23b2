use std::time::{Duration, Instant};

use tandem_config::StatsMode;

/// Snapshot of the overlay's current readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSample {
    pub mode: StatsMode,
    pub fps: f32,
    /// Duration of the last begin/end bracket in milliseconds.
    pub ms: f32,
    /// Heap usage in megabytes, when the host reports it.
    pub mb: Option<f32>,
}

impl std::fmt::Display for StatsSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            StatsMode::Fps => write!(f, "{:.0} FPS", self.fps),
            StatsMode::Ms => write!(f, "{:.2} MS", self.ms),
            StatsMode::Mb => match self.mb {
                Some(mb) => write!(f, "{mb:.1} MB"),
                None => f.write_str("-- MB"),
            },
        }
    }
}

/// Performance overlay bracketing each tick with `begin` / `end`.
///
/// FPS is the number of `end` calls in the last full one-second window.
#[derive(Debug)]
pub struct Stats {
    mode: StatsMode,
    frame_start: Option<Instant>,
    window_start: Option<Instant>,
    frames_in_window: u32,
    fps: f32,
    last_ms: f32,
    memory_mb: Option<f32>,
}

impl Stats {
    pub fn new(mode: StatsMode) -> Self {
        tracing::debug!(mode = ?mode, code = mode.code(), "stats overlay enabled");
        Self {
            mode,
            frame_start: None,
            window_start: None,
            frames_in_window: 0,
            fps: 0.0,
            last_ms: 0.0,
            memory_mb: None,
        }
    }

    pub fn mode(&self) -> StatsMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: StatsMode) {
        self.mode = mode;
    }

    pub fn begin(&mut self, now: Instant) {
        self.frame_start = Some(now);
        self.window_start.get_or_insert(now);
    }

    pub fn end(&mut self, now: Instant) -> StatsSample {
        if let Some(start) = self.frame_start.take() {
            let frame = now.saturating_duration_since(start);
            self.last_ms = frame.as_secs_f32() * 1000.0;
        }

        self.frames_in_window += 1;
        if let Some(window_start) = self.window_start {
            let window = now.saturating_duration_since(window_start);
            if window >= Duration::from_secs(1) {
                self.fps = self.frames_in_window as f32 / window.as_secs_f32();
                self.frames_in_window = 0;
                self.window_start = Some(now);
            }
        }
        self.sample()
    }

    /// Feed a memory reading from the host.
    pub fn set_memory_sample(&mut self, mb: f32) {
        self.memory_mb = Some(mb);
    }

    pub fn sample(&self) -> StatsSample {
        StatsSample {
            mode: self.mode,
            fps: self.fps,
            ms: self.last_ms,
            mb: self.memory_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ms_measures_begin_to_end() {
        let mut stats = Stats::new(StatsMode::Ms);
        let t0 = Instant::now();
        stats.begin(t0);
        let sample = stats.end(t0 + Duration::from_millis(4));
        assert!((sample.ms - 4.0).abs() < 1e-3);
        assert_eq!(sample.to_string(), "4.00 MS");
    }

    #[test]
    fn end_without_begin_keeps_last_reading() {
        let mut stats = Stats::new(StatsMode::Ms);
        let t0 = Instant::now();
        stats.begin(t0);
        stats.end(t0 + Duration::from_millis(2));
        let sample = stats.end(t0 + Duration::from_millis(50));
        assert!((sample.ms - 2.0).abs() < 1e-3);
    }

    #[test]
    fn fps_counts_frames_per_window() {
        let mut stats = Stats::new(StatsMode::Fps);
        let t0 = Instant::now();
        let step = Duration::from_millis(10);
        for i in 0..100u32 {
            stats.begin(t0 + step * i);
            stats.end(t0 + step * (i + 1));
        }
        // the window closes at the 100th frame, exactly one second in
        assert!((stats.sample().fps - 100.0).abs() < 1e-3);
    }

    #[test]
    fn memory_panel_without_reading() {
        let mut stats = Stats::new(StatsMode::Mb);
        assert_eq!(stats.sample().to_string(), "-- MB");
        stats.set_memory_sample(12.5);
        assert_eq!(stats.sample().to_string(), "12.5 MB");
    }
}
