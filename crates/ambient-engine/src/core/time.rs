/// Frame interval the field animations are tuned against (60 Hz), in ms.
pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;

/// Fixed timestep accumulator.
/// Integrates stateful motion at a consistent rate regardless of display refresh.
pub struct FixedTimestep {
    /// The fixed delta time per step, in ms.
    dt: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Frame-rate cap. Display callbacks arriving faster than `interval`
/// are skipped; the remainder is carried so the cadence does not drift.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: f64,
    previous: Option<f64>,
}

impl FrameThrottle {
    pub fn new(interval: f64) -> Self {
        Self { interval, previous: None }
    }

    /// A throttle that lets every frame through.
    pub fn unlimited() -> Self {
        Self::new(0.0)
    }

    /// Whether the frame at `now` should be rendered.
    pub fn ready(&mut self, now: f64) -> bool {
        let Some(previous) = self.previous else {
            self.previous = Some(now);
            return true;
        };
        if self.interval <= 0.0 {
            self.previous = Some(now);
            return true;
        }
        let passed = now - previous;
        if passed < self.interval {
            return false;
        }
        self.previous = Some(now - passed % self.interval);
        true
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Converts display timestamps into `elapsed` / `delta` pairs.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start: Option<f64>,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rendered frame at `now`. Returns `(elapsed, delta)` in ms.
    /// Timestamps running backwards are treated as a zero delta.
    pub fn frame(&mut self, now: f64) -> (f64, f64) {
        let start = *self.start.get_or_insert(now);
        let delta = match self.last {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now.max(self.last.unwrap_or(now)));
        ((now - start).max(0.0), delta)
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(TARGET_FRAME_MS);
        let steps = ts.accumulate(TARGET_FRAME_MS);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(TARGET_FRAME_MS);
        let steps = ts.accumulate(8.0);
        assert_eq!(steps, 0);
        let steps = ts.accumulate(10.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(TARGET_FRAME_MS);
        let steps = ts.accumulate(1000.0);
        assert_eq!(steps, 10);
    }

    #[test]
    fn throttle_skips_early_frames() {
        let mut throttle = FrameThrottle::new(TARGET_FRAME_MS);
        assert!(throttle.ready(0.0));
        assert!(!throttle.ready(8.0));
        assert!(throttle.ready(17.0));
    }

    #[test]
    fn throttle_caps_fast_displays_near_sixty() {
        let mut throttle = FrameThrottle::new(TARGET_FRAME_MS);
        // One callback per millisecond for a second.
        let rendered = (0..1000).filter(|ms| throttle.ready(*ms as f64)).count();
        assert!((55..=61).contains(&rendered), "rendered {rendered}");
    }

    #[test]
    fn unlimited_throttle_passes_everything() {
        let mut throttle = FrameThrottle::unlimited();
        assert!(throttle.ready(0.0));
        assert!(throttle.ready(0.5));
        assert!(throttle.ready(1.0));
    }

    #[test]
    fn clock_reports_elapsed_and_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(1000.0), (0.0, 0.0));
        assert_eq!(clock.frame(1016.0), (16.0, 16.0));
        assert_eq!(clock.frame(1050.0), (50.0, 34.0));
    }

    #[test]
    fn clock_ignores_backwards_timestamps() {
        let mut clock = FrameClock::new();
        clock.frame(100.0);
        let (_, delta) = clock.frame(90.0);
        assert_eq!(delta, 0.0);
    }
}
