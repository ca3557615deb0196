use ambient_engine::{
    AnyField, DrawBuffer, Field, FieldEvent, FieldPreset, FieldRunner, FrameOutcome, RecordingSurface, RunState,
    Surface, SurfaceSize, Theme,
};

/// Field runner for hosts that paint from JavaScript.
///
/// Each frame is recorded into a `RecordingSurface` and flattened into a
/// `DrawBuffer` that JS reads straight out of wasm memory. wasm-bindgen
/// cannot export generic structs, so the `export_field!` macro keeps one of
/// these in a `thread_local!` and forwards free functions to it.
pub struct BufferedRunner {
    runner: FieldRunner<AnyField>,
    surface: RecordingSurface,
    buffer: DrawBuffer,
    kind: &'static str,
}

impl BufferedRunner {
    pub fn new(preset: FieldPreset, size: SurfaceSize, theme: Theme, reduced_motion: bool) -> Self {
        let field = preset.build();
        let kind = field.kind();
        Self {
            runner: FieldRunner::new(field).with_environment(theme, reduced_motion),
            surface: RecordingSurface::new(size),
            buffer: DrawBuffer::new(),
            kind,
        }
    }

    /// Start the loop. False when the surface has no area yet; the next
    /// `resize` with a real size mounts it.
    pub fn mount(&mut self) -> bool {
        if self.surface.size().is_empty() {
            log::debug!("{}: empty surface, waiting for a resize", self.kind);
            return false;
        }
        self.runner.mount(Some(&self.surface))
    }

    /// Run one display frame. When the field painted (a running frame, or the
    /// static frame that parks the loop) the draw buffer holds the new frame;
    /// otherwise it keeps the previous one.
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        let painted_before = self.runner.frames_rendered();
        let outcome = self.runner.frame(now, &mut self.surface);
        if self.runner.frames_rendered() > painted_before {
            self.buffer.encode(&self.surface.take_frame());
        } else {
            self.surface.reset();
        }
        outcome
    }

    /// Returns true when the host must request a frame (runner was woken or
    /// just mounted).
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        self.surface.resize(size);
        if self.runner.state() == RunState::Idle {
            return self.mount();
        }
        self.runner.push_event(FieldEvent::Resize(size))
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) -> bool {
        self.runner.push_event(FieldEvent::ReducedMotion(reduced))
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        self.runner.push_event(FieldEvent::Theme(theme))
    }

    pub fn teardown(&mut self) {
        self.runner.push_event(FieldEvent::Teardown);
        self.buffer.clear();
        self.surface.reset();
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn runner(&self) -> &FieldRunner<AnyField> {
        &self.runner
    }

    // ---- Pointer accessors for reads from wasm memory ----

    pub fn draw_ptr(&self) -> *const f32 {
        self.buffer.instances_ptr()
    }

    pub fn draw_count(&self) -> u32 {
        self.buffer.instance_count()
    }

    pub fn draw_floats(&self) -> &[f32] {
        self.buffer.as_floats()
    }

    /// Image key referenced by `aux` of image instances.
    pub fn image_key(&self, index: u32) -> Option<&str> {
        self.buffer.images.get(index as usize).map(String::as_str)
    }

    pub fn layer_opacity(&self) -> f32 {
        self.runner.field().layer_opacity(self.runner.context())
    }
}

/// Stable numeric code for a frame outcome, as seen by JavaScript.
pub fn outcome_code(outcome: FrameOutcome) -> u32 {
    match outcome {
        FrameOutcome::Rendered => 0,
        FrameOutcome::Skipped => 1,
        FrameOutcome::Parked => 2,
        FrameOutcome::Stopped => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient_engine::renderer::instance::{DrawInstance, KIND_CLEAR, KIND_IMAGE};
    use ambient_engine::{OrbitFieldConfig, PixelGridConfig};

    fn grid(size: SurfaceSize) -> BufferedRunner {
        BufferedRunner::new(FieldPreset::PixelGrid(PixelGridConfig::default()), size, Theme::Dark, false)
    }

    #[test]
    fn frame_fills_draw_buffer() {
        let mut runner = grid(SurfaceSize::new(48.0, 24.0));
        assert!(runner.mount());
        assert_eq!(runner.frame(0.0), FrameOutcome::Rendered);
        // clear + 4 x 2 pixels
        assert_eq!(runner.draw_count(), 1 + 8);
        assert_eq!(runner.draw_floats().len(), 9 * DrawInstance::FLOATS);
        assert_eq!(runner.draw_floats()[0], KIND_CLEAR);
        assert_eq!(runner.layer_opacity(), 0.6);
    }

    #[test]
    fn skipped_frame_keeps_previous_buffer() {
        let mut runner = grid(SurfaceSize::new(48.0, 24.0));
        runner.mount();
        runner.frame(0.0);
        let before = runner.draw_floats().to_vec();
        assert_eq!(runner.frame(1.0), FrameOutcome::Skipped);
        assert_eq!(runner.draw_floats(), &before[..]);
    }

    #[test]
    fn empty_surface_mounts_on_first_real_resize() {
        let mut runner = grid(SurfaceSize::ZERO);
        assert!(!runner.mount());
        assert_eq!(runner.frame(0.0), FrameOutcome::Stopped);
        assert!(runner.resize(SurfaceSize::new(24.0, 24.0)));
        assert_eq!(runner.frame(16.0), FrameOutcome::Rendered);
        assert_eq!(runner.draw_count(), 1 + 4);
    }

    #[test]
    fn reduced_motion_parks_and_resize_wakes() {
        let preset = FieldPreset::Orbit(OrbitFieldConfig::default());
        let mut runner = BufferedRunner::new(preset, SurfaceSize::new(1600.0, 900.0), Theme::Light, true);
        runner.mount();
        assert_eq!(runner.frame(0.0), FrameOutcome::Parked);
        let static_frame = runner.draw_floats().to_vec();
        assert!(runner.draw_count() > 0);

        // Already parked: nothing painted, the static frame stays in the buffer.
        assert_eq!(runner.frame(16.0), FrameOutcome::Parked);
        assert_eq!(runner.draw_floats(), &static_frame[..]);

        assert!(runner.resize(SurfaceSize::new(1200.0, 800.0)));
        assert_eq!(runner.frame(32.0), FrameOutcome::Parked);
        assert!(runner.draw_count() > 0);
        assert_ne!(runner.draw_floats(), &static_frame[..]);
    }

    #[test]
    fn image_keys_resolve() {
        let preset = FieldPreset::Orbit(OrbitFieldConfig::default());
        let mut runner = BufferedRunner::new(preset, SurfaceSize::new(1600.0, 900.0), Theme::Dark, false);
        runner.mount();
        runner.frame(0.0);
        let floats = runner.draw_floats();
        let first_image = floats
            .chunks(DrawInstance::FLOATS)
            .find(|c| c[0] == KIND_IMAGE)
            .map(|c| c[6] as u32);
        assert_eq!(first_image.and_then(|i| runner.image_key(i)), Some("/logo_axiom_a.png"));
        assert_eq!(runner.image_key(99), None);
    }

    #[test]
    fn teardown_stops_and_empties() {
        let mut runner = grid(SurfaceSize::new(48.0, 24.0));
        runner.mount();
        runner.frame(0.0);
        runner.teardown();
        assert_eq!(runner.draw_count(), 0);
        assert_eq!(runner.frame(100.0), FrameOutcome::Stopped);
        assert!(!runner.set_theme(Theme::Light));
        assert_eq!(outcome_code(FrameOutcome::Stopped), 3);
    }
}
