//! Pixel particles: a density-derived field of small squares that pulse
//! between deep and light purple while a slow brightness wave rolls down the
//! surface. Each particle drifts on a bounded loop and wraps at the edges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::field::{Field, FieldContext, RunnerConfig};
use crate::api::types::FrameTime;
use crate::components::color::Color;
use crate::core::time::TARGET_FRAME_MS;
use crate::error::{check_range, ConfigError};
use crate::extensions::wave::{drift, phase_from_unit, snap, wave01, wrap};
use crate::renderer::surface::{paint_backdrop, Backdrop, Glow, Surface};

/// Tunables for [`PixelParticles`]. Defaults reproduce the hero backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelParticlesConfig {
    pub seed: u64,
    /// Surface area (px²) per particle: count = floor(w * h / area_per_particle).
    pub area_per_particle: f32,
    /// Square side, sampled per particle.
    pub size_range: (f32, f32),
    /// Final alpha (before the theme boost) is clamped into this range.
    pub alpha_range: (f32, f32),
    /// Vibration frequency per ms, sampled per particle.
    pub pulse_speed_range: (f32, f32),
    pub hue_center: f32,
    pub hue_swing: f32,
    /// Temporal frequency of the brightness wave.
    pub wave_speed: f32,
    /// Spatial frequency of the wave along y.
    pub wave_row_scale: f32,
    /// Extra phase travel per ms that moves the wave down the surface.
    pub wave_travel: f32,
    /// Per-frame position nudge amplitude on x and y.
    pub drift_amplitude: (f32, f32),
    pub drift_speed: f32,
    /// Particles are drawn on a grid of this pitch.
    pub pixel_snap: f32,
    /// Particles brighter than this get a glow pass.
    pub glow_threshold: f32,
    /// Alpha multiplier in light theme.
    pub light_alpha_boost: f32,
    pub dark_fade: Color,
    pub light_fade: Color,
    /// Canvas layer opacity per theme (dark, light).
    pub layer_opacity: (f32, f32),
}

impl Default for PixelParticlesConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            area_per_particle: 8000.0,
            size_range: (1.0, 4.0),
            alpha_range: (0.1, 0.7),
            pulse_speed_range: (0.01, 0.03),
            hue_center: 270.0,
            hue_swing: 20.0,
            wave_speed: 0.001,
            wave_row_scale: 0.005,
            wave_travel: 0.0005,
            drift_amplitude: (0.3, 0.2),
            drift_speed: 0.002,
            pixel_snap: 2.0,
            glow_threshold: 0.4,
            light_alpha_boost: 1.5,
            dark_fade: Color::rgba(0.0, 0.0, 0.0, 0.15),
            light_fade: Color::rgba(1.0, 1.0, 1.0, 0.15),
            layer_opacity: (0.7, 0.8),
        }
    }
}

impl PixelParticlesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.area_per_particle > 0.0) {
            return Err(ConfigError::NotPositive {
                kind: "pixel particles",
                field: "area_per_particle",
                value: self.area_per_particle,
            });
        }
        check_range("pixel particles", "size_range", self.size_range)?;
        check_range("pixel particles", "alpha_range", self.alpha_range)?;
        check_range("pixel particles", "pulse_speed_range", self.pulse_speed_range)?;
        Ok(())
    }

    /// Batch size for a surface of `area` px².
    pub fn count_for(&self, area: f32) -> usize {
        if !(self.area_per_particle > 0.0) || !(area > 0.0) {
            return 0;
        }
        (area / self.area_per_particle).floor() as usize
    }
}

/// One pulsing square. Constants are fixed at creation; the rest is
/// recomputed from them on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelParticle {
    pub origin: Vec2,
    pub size: f32,
    pub pulse_speed: f32,
    pub phase: f32,
    pub position: Vec2,
    pub hue: f32,
    pub alpha: f32,
}

impl PixelParticle {
    /// Evaluate the particle at `t` ms on a `bounds`-sized surface.
    pub fn update(&mut self, config: &PixelParticlesConfig, t: f64, bounds: Vec2) {
        let dx = drift(t, config.drift_speed as f64, self.phase, config.drift_amplitude.0, TARGET_FRAME_MS);
        // cos nudge on y = sin nudge shifted a quarter turn.
        let dy = drift(
            t,
            config.drift_speed as f64,
            self.phase + std::f32::consts::FRAC_PI_2,
            config.drift_amplitude.1,
            TARGET_FRAME_MS,
        );
        self.position = Vec2::new(wrap(self.origin.x + dx, bounds.x), wrap(self.origin.y + dy, bounds.y));

        let wave_phase = t * (config.wave_speed + config.wave_travel) as f64
            + (self.position.y * config.wave_row_scale) as f64;
        let wave = wave01((wave_phase % std::f64::consts::TAU) as f32);
        let vibration = ((t * self.pulse_speed as f64 + self.phase as f64).sin()) as f32;

        self.hue = config.hue_center + vibration * config.hue_swing;
        let span = config.alpha_range.1 - config.alpha_range.0;
        let alpha = config.alpha_range.0 + wave * span * (0.5 + vibration * 0.5);
        // max/min instead of clamp: a reversed range built in code must not panic.
        self.alpha = alpha.max(config.alpha_range.0).min(config.alpha_range.1).clamp(0.0, 1.0);
    }
}

/// Density-derived pulsing particle field.
pub struct PixelParticles {
    config: PixelParticlesConfig,
    particles: Vec<PixelParticle>,
    bounds: Vec2,
}

impl PixelParticles {
    pub fn new(config: PixelParticlesConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            bounds: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &PixelParticlesConfig {
        &self.config
    }

    pub fn particles(&self) -> &[PixelParticle] {
        &self.particles
    }
}

impl Default for PixelParticles {
    fn default() -> Self {
        Self::new(PixelParticlesConfig::default())
    }
}

impl Field for PixelParticles {
    fn config(&self) -> RunnerConfig {
        RunnerConfig {
            seed: self.config.seed,
            ..RunnerConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut FieldContext) {
        ctx.reseed();
        self.bounds = Vec2::new(ctx.size.width, ctx.size.height);
        let count = self.config.count_for(ctx.size.area());
        let (smin, smax) = self.config.size_range;
        let (pmin, pmax) = self.config.pulse_speed_range;

        self.particles.clear();
        self.particles.reserve_exact(count);
        for _ in 0..count {
            let origin = Vec2::new(ctx.rng.next_f32() * self.bounds.x, ctx.rng.next_f32() * self.bounds.y);
            let mut particle = PixelParticle {
                origin,
                size: ctx.rng.range(smin, smax),
                pulse_speed: ctx.rng.range(pmin, pmax),
                phase: phase_from_unit(ctx.rng.next_f32()),
                position: origin,
                hue: self.config.hue_center,
                alpha: self.config.alpha_range.0,
            };
            particle.update(&self.config, 0.0, self.bounds);
            self.particles.push(particle);
        }
    }

    fn tick(&mut self, ctx: &FieldContext, time: FrameTime) {
        let t = ctx.effective_time(time).elapsed_ms;
        for particle in &mut self.particles {
            particle.update(&self.config, t, self.bounds);
        }
    }

    fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface) {
        if ctx.size.is_empty() {
            return;
        }
        let light = ctx.is_light();
        let fade = if light { self.config.light_fade } else { self.config.dark_fade };
        paint_backdrop(surface, Backdrop::Fade(fade));

        let (lightness, glow_lightness, glow_blur) = if light { (0.5, 0.6, 15.0) } else { (0.6, 0.7, 10.0) };
        for p in &self.particles {
            let alpha = if light { p.alpha * self.config.light_alpha_boost } else { p.alpha };
            let alpha = alpha.clamp(0.0, 1.0);
            let origin = Vec2::new(
                snap(p.position.x, self.config.pixel_snap),
                snap(p.position.y, self.config.pixel_snap),
            );
            let extent = Vec2::splat(p.size);
            surface.fill_rect(origin, extent, Color::hsla(p.hue, 0.7, lightness, alpha));

            if p.alpha > self.config.glow_threshold {
                surface.set_glow(Some(Glow {
                    blur: glow_blur,
                    color: Color::hsla(p.hue, 0.8, glow_lightness, alpha * 0.5),
                }));
                surface.fill_rect(origin, extent, Color::hsla(p.hue, 0.7, lightness, alpha));
                surface.set_glow(None);
            }
        }
    }

    fn release(&mut self) {
        self.particles = Vec::new();
    }

    fn len(&self) -> usize {
        self.particles.len()
    }

    fn layer_opacity(&self, ctx: &FieldContext) -> f32 {
        if ctx.is_light() { self.config.layer_opacity.1 } else { self.config.layer_opacity.0 }
    }
}
