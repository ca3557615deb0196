//! Pixel grid backdrop: one tiny square per `gap` cell, each shimmering
//! between a minimum and maximum size with a positional wave layered on top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::field::{Field, FieldContext, RunnerConfig};
use crate::api::types::FrameTime;
use crate::components::color::Color;
use crate::core::time::TARGET_FRAME_MS;
use crate::error::{check_range, ConfigError};
use crate::renderer::surface::{paint_backdrop, Backdrop, Surface};
use crate::extensions::wave::triangle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelGridConfig {
    pub seed: u64,
    /// Grid pitch in px.
    pub gap: f32,
    /// Shimmer speed multiplier (30 = default pace, 0 = frozen).
    pub speed: f32,
    pub colors: Vec<Color>,
    /// Opacity of the whole canvas layer.
    pub opacity: f32,
    pub min_size: f32,
    pub base_size_range: (f32, f32),
    pub max_size_range: (f32, f32),
    /// Per-pixel fraction of `speed`, sampled.
    pub speed_factor_range: (f32, f32),
    pub wave_speed_range: (f32, f32),
    pub wave_amplitude_range: (f32, f32),
    /// Wave phase per px of `x + y`.
    pub wave_offset_scale: f32,
    /// Displayed size is clamped into this range.
    pub size_bounds: (f32, f32),
}

impl Default for PixelGridConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            gap: 12.0,
            speed: 30.0,
            colors: vec![
                Color::rgb8(0x1a, 0x1a, 0x1a),
                Color::rgb8(0x2d, 0x1f, 0x3d),
                Color::rgb8(0x77, 0x34, 0xb8),
                Color::rgb8(0x5b, 0x26, 0x90),
                Color::rgb8(0x0a, 0x0a, 0x0a),
                Color::rgb8(0x15, 0x15, 0x15),
            ],
            opacity: 0.6,
            min_size: 0.3,
            base_size_range: (0.5, 2.0),
            max_size_range: (1.0, 2.5),
            speed_factor_range: (0.2, 0.8),
            wave_speed_range: (0.02, 0.03),
            wave_amplitude_range: (0.3, 0.7),
            wave_offset_scale: 0.05,
            size_bounds: (0.0, 3.2),
        }
    }
}

impl PixelGridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gap > 0.0) {
            return Err(ConfigError::NotPositive { kind: "pixel grid", field: "gap", value: self.gap });
        }
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette("pixel grid"));
        }
        check_range("pixel grid", "base_size_range", self.base_size_range)?;
        check_range("pixel grid", "max_size_range", self.max_size_range)?;
        check_range("pixel grid", "speed_factor_range", self.speed_factor_range)?;
        check_range("pixel grid", "wave_speed_range", self.wave_speed_range)?;
        check_range("pixel grid", "wave_amplitude_range", self.wave_amplitude_range)?;
        check_range("pixel grid", "size_bounds", self.size_bounds)?;
        Ok(())
    }

    /// Grid dimensions (columns, rows) for a surface.
    pub fn grid_for(&self, width: f32, height: f32) -> (usize, usize) {
        if !(self.gap > 0.0) || !(width > 0.0) || !(height > 0.0) {
            return (0, 0);
        }
        ((width / self.gap).ceil() as usize, (height / self.gap).ceil() as usize)
    }
}

/// One grid cell's square.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPixel {
    pub position: Vec2,
    pub color: Color,
    /// Shimmer travel in px per 60 Hz frame.
    pub speed: f32,
    pub base_size: f32,
    pub max_size: f32,
    pub falling: bool,
    pub wave_offset: f32,
    pub wave_speed: f32,
    pub wave_amplitude: f32,
    pub display_size: f32,
}

impl GridPixel {
    /// Evaluate at `frames` 60 Hz frames since start.
    pub fn update(&mut self, config: &PixelGridConfig, frames: f64) {
        let shimmer = triangle(
            self.base_size,
            config.min_size,
            self.max_size,
            self.falling,
            (self.speed as f64 * frames) as f32,
        );
        let wave = ((frames * self.wave_speed as f64 + self.wave_offset as f64).sin()) as f32 * self.wave_amplitude;
        self.display_size = (shimmer + wave).max(0.0).max(config.size_bounds.0).min(config.size_bounds.1);
    }
}

/// Gap-derived shimmering grid.
pub struct PixelGrid {
    config: PixelGridConfig,
    pixels: Vec<GridPixel>,
}

impl PixelGrid {
    pub fn new(config: PixelGridConfig) -> Self {
        Self { config, pixels: Vec::new() }
    }

    pub fn config(&self) -> &PixelGridConfig {
        &self.config
    }

    pub fn pixels(&self) -> &[GridPixel] {
        &self.pixels
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new(PixelGridConfig::default())
    }
}

impl Field for PixelGrid {
    fn config(&self) -> RunnerConfig {
        RunnerConfig {
            seed: self.config.seed,
            frame_cap_ms: TARGET_FRAME_MS,
            ..RunnerConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut FieldContext) {
        ctx.reseed();
        self.pixels.clear();
        if self.config.colors.is_empty() {
            log::warn!("pixel grid: empty palette, nothing to draw");
            return;
        }
        let (cols, rows) = self.config.grid_for(ctx.size.width, ctx.size.height);
        let pace = self.config.speed.max(0.0) * 0.001;
        let cfg = &self.config;

        self.pixels.reserve_exact(cols * rows);
        for col in 0..cols {
            for row in 0..rows {
                let position = Vec2::new(col as f32 * cfg.gap, row as f32 * cfg.gap);
                let color = ctx.rng.pick(&cfg.colors).copied().unwrap_or_default();
                let mut pixel = GridPixel {
                    position,
                    color,
                    speed: ctx.rng.range(cfg.speed_factor_range.0, cfg.speed_factor_range.1) * pace,
                    base_size: ctx.rng.range(cfg.base_size_range.0, cfg.base_size_range.1),
                    max_size: ctx.rng.range(cfg.max_size_range.0, cfg.max_size_range.1),
                    falling: ctx.rng.next_bool(),
                    wave_offset: (position.x + position.y) * cfg.wave_offset_scale,
                    wave_speed: ctx.rng.range(cfg.wave_speed_range.0, cfg.wave_speed_range.1),
                    wave_amplitude: ctx.rng.range(cfg.wave_amplitude_range.0, cfg.wave_amplitude_range.1),
                    display_size: 0.0,
                };
                pixel.update(cfg, 0.0);
                self.pixels.push(pixel);
            }
        }
    }

    fn tick(&mut self, ctx: &FieldContext, time: FrameTime) {
        let frames = ctx.effective_time(time).elapsed_ms / TARGET_FRAME_MS;
        for pixel in &mut self.pixels {
            pixel.update(&self.config, frames);
        }
    }

    fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface) {
        if ctx.size.is_empty() {
            return;
        }
        paint_backdrop(surface, Backdrop::Clear);
        for pixel in &self.pixels {
            surface.fill_rect(pixel.position, Vec2::splat(pixel.display_size), pixel.color);
        }
    }

    fn release(&mut self) {
        self.pixels = Vec::new();
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn layer_opacity(&self, _ctx: &FieldContext) -> f32 {
        self.config.opacity.clamp(0.0, 1.0)
    }
}
