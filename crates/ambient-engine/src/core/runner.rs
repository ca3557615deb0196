use crate::api::field::{Field, FieldContext, RunnerConfig};
use crate::api::types::{FrameTime, Motion, Theme};
use crate::core::time::{FrameClock, FrameThrottle};
use crate::input::queue::{EventQueue, FieldEvent};
use crate::renderer::surface::Surface;

/// Lifecycle of a mounted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not mounted yet, or mounting failed for lack of a surface.
    Idle,
    /// Animating: the host should request a frame after every callback.
    Running,
    /// A static frame was rendered (reduced motion). Wakes on the next event.
    Parked,
    /// Unmounted. Frame callbacks are ignored until the next `mount`.
    TornDown,
}

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The field ticked and painted.
    Rendered,
    /// Nothing painted (throttled, or empty surface); keep the loop alive.
    Skipped,
    /// Static frame done; do not request another frame until woken.
    Parked,
    /// The runner is not live; stop the loop.
    Stopped,
}

impl FrameOutcome {
    /// Whether the host should request another display frame.
    pub fn wants_next_frame(self) -> bool {
        matches!(self, FrameOutcome::Rendered | FrameOutcome::Skipped)
    }
}

/// Generic field runner that wires up the frame loop.
///
/// The host owns scheduling (`requestAnimationFrame`, a test clock, ...) and
/// calls `frame` with a timestamp and the surface. Event application, batch
/// (re)creation, throttling, reduced motion and teardown are decided here.
pub struct FieldRunner<F: Field> {
    field: F,
    ctx: FieldContext,
    events: EventQueue,
    throttle: FrameThrottle,
    clock: FrameClock,
    config: RunnerConfig,
    state: RunState,
    needs_init: bool,
    frames_rendered: u64,
}

impl<F: Field> FieldRunner<F> {
    pub fn new(field: F) -> Self {
        let config = field.config();
        let throttle = if config.frame_cap_ms > 0.0 {
            FrameThrottle::new(config.frame_cap_ms)
        } else {
            FrameThrottle::unlimited()
        };

        Self {
            field,
            ctx: FieldContext::new(config.seed),
            events: EventQueue::new(),
            throttle,
            clock: FrameClock::new(),
            config,
            state: RunState::Idle,
            needs_init: false,
            frames_rendered: 0,
        }
    }

    /// Initial theme and motion preference, applied before mounting.
    pub fn with_environment(mut self, theme: Theme, reduced_motion: bool) -> Self {
        self.ctx.theme = theme;
        self.ctx.motion = Motion::from_reduced(reduced_motion);
        self
    }

    /// Start animating on `surface`. Without a surface (no drawing context
    /// yet) this is a silent no-op and returns false; call again on the next
    /// mount attempt.
    pub fn mount(&mut self, surface: Option<&dyn Surface>) -> bool {
        let Some(surface) = surface else {
            log::debug!("field: no drawing surface, loop not started");
            return false;
        };
        self.ctx.size = surface.size();
        self.clock.reset();
        self.throttle.reset();
        self.needs_init = true;
        self.state = RunState::Running;
        log::info!(
            "field: mounted at {}x{} (dpr {})",
            self.ctx.size.width,
            self.ctx.size.height,
            self.ctx.size.dpr
        );
        true
    }

    /// Deliver an environment event. Returns true when a parked runner was
    /// woken and the host must request a frame.
    pub fn push_event(&mut self, event: FieldEvent) -> bool {
        match (self.state, event) {
            (RunState::TornDown, _) => false,
            (_, FieldEvent::Teardown) => {
                self.teardown();
                false
            }
            (RunState::Parked, event) => {
                self.events.push(event);
                self.state = RunState::Running;
                true
            }
            (_, event) => {
                self.events.push(event);
                false
            }
        }
    }

    /// Stop immediately: drop the batch and pending events. Any frame
    /// callback that still fires afterwards is ignored.
    pub fn teardown(&mut self) {
        if self.state == RunState::TornDown {
            return;
        }
        self.state = RunState::TornDown;
        self.events.clear();
        self.field.release();
        self.needs_init = false;
        log::info!("field: torn down after {} frames", self.frames_rendered);
    }

    /// Run one display-frame callback at `now` (ms, monotonic).
    pub fn frame(&mut self, now: f64, surface: &mut dyn Surface) -> FrameOutcome {
        match self.state {
            RunState::Idle | RunState::TornDown => return FrameOutcome::Stopped,
            RunState::Parked => return FrameOutcome::Parked,
            RunState::Running => {}
        }

        for event in self.events.drain() {
            self.apply(event);
        }

        // The surface is the source of truth for bounds; re-read every frame.
        let live = surface.size();
        if live != self.ctx.size {
            log::debug!("field: surface resized to {}x{}", live.width, live.height);
            self.ctx.size = live;
            self.needs_init = true;
        }

        if self.needs_init {
            self.needs_init = false;
            if self.ctx.size.is_empty() {
                self.field.release();
            } else {
                self.field.init(&mut self.ctx);
                log::debug!("field: batch of {} built", self.field.len());
            }
        }

        if self.ctx.size.is_empty() {
            return FrameOutcome::Skipped;
        }

        if !self.throttle.ready(now) {
            return FrameOutcome::Skipped;
        }

        let (elapsed, delta) = self.clock.frame(now);
        let time = self.ctx.effective_time(FrameTime::new(elapsed, delta));

        self.field.tick(&self.ctx, time);
        self.field.render(&self.ctx, surface);
        self.frames_rendered += 1;

        if self.ctx.motion.is_reduced() {
            log::debug!("field: reduced motion, parking after static frame");
            self.state = RunState::Parked;
            return FrameOutcome::Parked;
        }
        FrameOutcome::Rendered
    }

    fn apply(&mut self, event: FieldEvent) {
        match event {
            FieldEvent::Resize(size) => {
                if size != self.ctx.size {
                    self.ctx.size = size;
                    self.needs_init = true;
                }
            }
            FieldEvent::ReducedMotion(reduced) => {
                self.ctx.motion = Motion::from_reduced(reduced);
            }
            FieldEvent::Theme(theme) => {
                self.ctx.theme = theme;
            }
            // Handled eagerly in push_event.
            FieldEvent::Teardown => {}
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    pub fn context(&self) -> &FieldContext {
        &self.ctx
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, RunState::Running | RunState::Parked)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SurfaceSize;
    use crate::components::color::Color;
    use crate::renderer::recording::RecordingSurface;
    use glam::Vec2;

    /// Counts lifecycle calls and paints one rect per tick.
    #[derive(Default)]
    struct ProbeField {
        inits: u32,
        ticks: u32,
        releases: u32,
        batch: usize,
        last_time: Option<FrameTime>,
        last_theme: Option<Theme>,
    }

    impl Field for ProbeField {
        fn init(&mut self, ctx: &mut FieldContext) {
            self.inits += 1;
            self.batch = (ctx.size.area() / 100.0) as usize;
        }

        fn tick(&mut self, ctx: &FieldContext, time: FrameTime) {
            self.ticks += 1;
            self.last_time = Some(time);
            self.last_theme = Some(ctx.theme);
        }

        fn render(&self, _ctx: &FieldContext, surface: &mut dyn Surface) {
            let x = self.last_time.map(|t| t.elapsed_ms as f32).unwrap_or(0.0);
            surface.fill_rect(Vec2::new(x, 0.0), Vec2::ONE, Color::WHITE);
        }

        fn release(&mut self) {
            self.releases += 1;
            self.batch = 0;
        }

        fn len(&self) -> usize {
            self.batch
        }
    }

    fn mounted(size: SurfaceSize) -> (FieldRunner<ProbeField>, RecordingSurface) {
        let surface = RecordingSurface::new(size);
        let mut runner = FieldRunner::new(ProbeField::default());
        assert!(runner.mount(Some(&surface)));
        (runner, surface)
    }

    #[test]
    fn missing_surface_does_not_start() {
        let mut runner = FieldRunner::new(ProbeField::default());
        assert!(!runner.mount(None));
        assert_eq!(runner.state(), RunState::Idle);
        let mut surface = RecordingSurface::new(SurfaceSize::new(10.0, 10.0));
        assert_eq!(runner.frame(0.0, &mut surface), FrameOutcome::Stopped);
        assert!(surface.is_empty());
        // A later mount with a surface succeeds.
        assert!(runner.mount(Some(&surface)));
        assert_eq!(runner.frame(0.0, &mut surface), FrameOutcome::Rendered);
    }

    #[test]
    fn events_before_mount_apply_latest_values() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(10.0, 10.0));
        let mut runner = FieldRunner::new(ProbeField::default());
        for i in 0..500 {
            let theme = if i % 2 == 0 { Theme::Dark } else { Theme::Light };
            assert!(!runner.push_event(FieldEvent::Theme(theme)));
        }
        assert_eq!(runner.state(), RunState::Idle);

        assert!(runner.mount(Some(&surface)));
        assert_eq!(runner.frame(0.0, &mut surface), FrameOutcome::Rendered);
        assert_eq!(runner.field().last_theme, Some(Theme::Light));
    }

    #[test]
    fn first_frame_builds_batch() {
        let (mut runner, mut surface) = mounted(SurfaceSize::new(100.0, 100.0));
        assert_eq!(runner.frame(1000.0, &mut surface), FrameOutcome::Rendered);
        assert_eq!(runner.field().inits, 1);
        assert_eq!(runner.field().len(), 100);
        assert_eq!(runner.field().last_time, Some(FrameTime::ZERO));
    }

    #[test]
    fn resize_before_first_frame_is_applied() {
        let (mut runner, mut surface) = mounted(SurfaceSize::new(100.0, 100.0));
        let bigger = SurfaceSize::new(200.0, 100.0);
        surface.resize(bigger);
        runner.push_event(FieldEvent::Resize(bigger));
        assert_eq!(runner.frame(0.0, &mut surface), FrameOutcome::Rendered);
        assert_eq!(runner.field().inits, 1);
        assert_eq!(runner.field().len(), 200);
    }

    #[test]
    fn live_surface_resize_rebuilds_batch() {
        let (mut runner, mut surface) = mounted(SurfaceSize::new(100.0, 100.0));
        runner.frame(0.0, &mut surface);
        surface.resize(SurfaceSize::new(50.0, 20.0));
        runner.frame(16.0, &mut surface);
        assert_eq!(runner.field().inits, 2);
        assert_eq!(runner.field().len(), 10);
    }

    #[test]
    fn zero_sized_surface_skips_frame() {
        let (mut runner, mut surface) = mounted(SurfaceSize::new(0.0, 100.0));
        assert_eq!(runner.frame(0.0, &mut surface), FrameOutcome::Skipped);
        assert_eq!(runner.field().ticks, 0);
        assert!(surface.is_empty());
    }

    #[test]
    fn elapsed_time_follows_clock() {
        let (mut runner, mut surface) = mounted(SurfaceSize::new(10.0, 10.0));
        runner.frame(500.0, &mut surface);
        runner.frame(516.0, &mut surface);
        assert_eq!(runner.field().last_time, Some(FrameTime::new(16.0, 16.0)));
    }

    #[test]
    fn teardown_stops_all_work_even_if_frames_fire() {
        let (mut runner, mut surface) = mounted(SurfaceSize::new(10.0, 10.0));
        runner.frame(0.0, &mut surface);
        surface.reset();
        let ticks = runner.field().ticks;

        runner.push_event(FieldEvent::Teardown);
        assert_eq!(runner.state(), RunState::TornDown);
        assert_eq!(runner.field().len(), 0);

        // Fake clock keeps firing queued callbacks past teardown.
        for i in 1..10 {
            assert_eq!(runner.frame(i as f64 * 16.0, &mut surface), FrameOutcome::Stopped);
        }
        assert_eq!(runner.field().ticks, ticks);
        assert!(surface.is_empty());
        assert!(!runner.push_event(FieldEvent::Theme(Theme::Light)));
    }

    #[test]
    fn reduced_motion_parks_after_one_frame() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(10.0, 10.0));
        let mut runner = FieldRunner::new(ProbeField::default()).with_environment(Theme::Dark, true);
        runner.mount(Some(&surface));

        assert_eq!(runner.frame(100.0, &mut surface), FrameOutcome::Parked);
        assert_eq!(runner.frame(200.0, &mut surface), FrameOutcome::Parked);
        assert_eq!(runner.field().ticks, 1);

        // A theme change wakes the runner for one more static frame.
        assert!(runner.push_event(FieldEvent::Theme(Theme::Light)));
        assert_eq!(runner.frame(300.0, &mut surface), FrameOutcome::Parked);
        assert_eq!(runner.field().ticks, 2);
        assert_eq!(runner.field().last_theme, Some(Theme::Light));
        assert_eq!(runner.field().last_time, Some(FrameTime::ZERO));
    }

    #[test]
    fn leaving_reduced_motion_resumes_loop() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(10.0, 10.0));
        let mut runner = FieldRunner::new(ProbeField::default()).with_environment(Theme::Dark, true);
        runner.mount(Some(&surface));
        runner.frame(0.0, &mut surface);

        assert!(runner.push_event(FieldEvent::ReducedMotion(false)));
        assert_eq!(runner.frame(16.0, &mut surface), FrameOutcome::Rendered);
        assert!(runner.frame(32.0, &mut surface).wants_next_frame());
    }

    #[test]
    fn frame_cap_throttles_rendering() {
        struct Capped(ProbeField);
        impl Field for Capped {
            fn config(&self) -> RunnerConfig {
                RunnerConfig { frame_cap_ms: 1000.0 / 60.0, ..RunnerConfig::default() }
            }
            fn init(&mut self, ctx: &mut FieldContext) { self.0.init(ctx) }
            fn tick(&mut self, ctx: &FieldContext, time: FrameTime) { self.0.tick(ctx, time) }
            fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface) { self.0.render(ctx, surface) }
            fn release(&mut self) { self.0.release() }
            fn len(&self) -> usize { self.0.len() }
        }

        let mut surface = RecordingSurface::new(SurfaceSize::new(10.0, 10.0));
        let mut runner = FieldRunner::new(Capped(ProbeField::default()));
        runner.mount(Some(&surface));
        assert_eq!(runner.frame(0.0, &mut surface), FrameOutcome::Rendered);
        assert_eq!(runner.frame(8.0, &mut surface), FrameOutcome::Skipped);
        assert_eq!(runner.frame(17.0, &mut surface), FrameOutcome::Rendered);
        assert_eq!(runner.frames_rendered(), 2);
    }
}
