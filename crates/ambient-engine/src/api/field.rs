use serde::{Deserialize, Serialize};

use crate::api::types::{FrameTime, Motion, SurfaceSize, Theme};
use crate::core::rng::Rng;
use crate::renderer::surface::Surface;

/// Runner configuration, provided by the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Seed for the per-field RNG. Reapplied on every `init`.
    pub seed: u64,
    /// Minimum time between rendered frames in ms (0 = every display frame).
    pub frame_cap_ms: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frame_cap_ms: 0.0,
        }
    }
}

/// The contract every decorative field fulfills.
///
/// Lifecycle: `init` (re)builds the batch for `ctx.size`; `tick` advances it;
/// `render` paints it; `release` drops it. The runner guarantees `tick` and
/// `render` are never called on an empty surface or after `release`.
pub trait Field {
    /// Return runner configuration. Called once before the first `init`.
    fn config(&self) -> RunnerConfig {
        RunnerConfig::default()
    }

    /// Build the particle batch for the current surface, discarding any previous one.
    fn init(&mut self, ctx: &mut FieldContext);

    /// Advance every particle to `time`.
    fn tick(&mut self, ctx: &FieldContext, time: FrameTime);

    /// Paint the backdrop then the particles.
    fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface);

    /// Drop the batch.
    fn release(&mut self);

    /// Number of particles (or tokens) in the current batch.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Opacity of the whole drawing layer, applied by the host (CSS opacity).
    fn layer_opacity(&self, _ctx: &FieldContext) -> f32 {
        1.0
    }
}

/// Per-runner environment passed into every `Field` call.
/// Nothing here is shared between runners.
#[derive(Debug, Clone)]
pub struct FieldContext {
    pub size: SurfaceSize,
    pub theme: Theme,
    pub motion: Motion,
    pub rng: Rng,
    seed: u64,
}

impl FieldContext {
    pub fn new(seed: u64) -> Self {
        Self {
            size: SurfaceSize::ZERO,
            theme: Theme::default(),
            motion: Motion::default(),
            rng: Rng::new(seed),
            seed,
        }
    }

    pub fn with_size(mut self, size: SurfaceSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Restart the RNG from the configured seed. Fields call this at the top
    /// of `init` so rebuilding a batch at the same size is reproducible.
    pub fn reseed(&mut self) {
        self.rng.reseed(self.seed);
    }

    pub fn is_light(&self) -> bool {
        self.theme.is_light()
    }

    /// Under reduced motion all time-driven attributes are evaluated at t = 0.
    pub fn effective_time(&self, time: FrameTime) -> FrameTime {
        if self.motion.is_reduced() {
            FrameTime::ZERO
        } else {
            time
        }
    }
}

impl Default for FieldContext {
    fn default() -> Self {
        Self::new(RunnerConfig::default().seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reseed_reproduces_sequence() {
        let mut ctx = FieldContext::new(9);
        let a = ctx.rng.next_int(10_000);
        ctx.reseed();
        assert_eq!(ctx.rng.next_int(10_000), a);
    }

    #[test]
    fn reduced_motion_freezes_time() {
        let ctx = FieldContext::new(1).with_motion(Motion::Reduced);
        assert_eq!(ctx.effective_time(FrameTime::new(500.0, 16.0)), FrameTime::ZERO);
        let ctx = FieldContext::new(1);
        assert_eq!(ctx.effective_time(FrameTime::new(500.0, 16.0)).elapsed_ms, 500.0);
    }

    #[test]
    fn runner_config_fills_missing_fields() {
        let config: RunnerConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.frame_cap_ms, 0.0);
    }
}
