//! Floating glass bubbles carrying a logo. Motion is a damped velocity pushed
//! around by smooth noise, integrated on a fixed 60 Hz step, with a soft
//! bounce against the surface edges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::field::{Field, FieldContext, RunnerConfig};
use crate::api::types::FrameTime;
use crate::components::color::Color;
use crate::components::token::Token;
use crate::core::time::{FixedTimestep, TARGET_FRAME_MS};
use crate::error::{check_range, ConfigError};
use crate::extensions::wave::smooth_noise;
use crate::renderer::surface::{paint_backdrop, Backdrop, Glow, Surface};

/// A bubble in the configured list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleSpec {
    pub token: Token,
    /// Starting position as a fraction of the free area (0..1 on each axis).
    #[serde(default = "centered")]
    pub start: (f32, f32),
}

fn centered() -> (f32, f32) {
    (0.5, 0.5)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleFieldConfig {
    pub seed: u64,
    pub bubbles: Vec<BubbleSpec>,
    /// Noise → velocity gain per step.
    pub noise_gain: f32,
    /// Velocity multiplier per step.
    pub damping: f32,
    pub max_velocity: f32,
    /// Minimum distance from the top/left edge.
    pub margin: f32,
    /// Extra room kept free on the bottom/right edge, beyond the bubble size.
    pub edge_padding: f32,
    /// Speed kept after hitting an edge.
    pub bounce: f32,
    /// Noise channels for x and y.
    pub noise_channels: (f32, f32),
    pub breathing_amplitude: f32,
    pub breathing_speed: f32,
    /// Rotation swing in degrees.
    pub rotation_amplitude: f32,
    pub rotation_speed: f32,
}

impl Default for BubbleFieldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            bubbles: vec![BubbleSpec {
                token: Token::new("/logo_axiom_a.png", "Axiom IA").with_size(120.0),
                start: centered(),
            }],
            noise_gain: 0.01,
            damping: 0.995,
            max_velocity: 0.8,
            margin: 10.0,
            edge_padding: 20.0,
            bounce: 0.5,
            noise_channels: (1.5, 3.7),
            breathing_amplitude: 0.02,
            breathing_speed: 0.001,
            rotation_amplitude: 2.0,
            rotation_speed: 0.0005,
        }
    }
}

impl BubbleFieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in &self.bubbles {
            if !(spec.token.size > 0.0) {
                return Err(ConfigError::NotPositive { kind: "bubble", field: "size", value: spec.token.size });
            }
        }
        check_range("bubble", "max_velocity", (0.0, self.max_velocity))?;
        Ok(())
    }
}

/// Live state of one bubble. `position` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub token: Token,
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: f32,
    pub rotation_deg: f32,
}

impl Bubble {
    fn spawn(spec: &BubbleSpec, free: Vec2) -> Self {
        let seed = spec.token.seed;
        let vx = if seed % 2 == 0 { 0.3 } else { -0.3 };
        let vy = if seed % 3 == 0 { 0.2 } else { -0.2 };
        Self {
            token: spec.token.clone(),
            position: Vec2::new(free.x * spec.start.0, free.y * spec.start.1),
            velocity: Vec2::new(vx, vy),
            scale: 1.0,
            rotation_deg: 0.0,
        }
    }

    /// Largest top-left coordinate that keeps the bubble inside `bounds`.
    fn free_extent(size: f32, bounds: Vec2, padding: f32) -> Vec2 {
        Vec2::new(bounds.x - size - padding, bounds.y - size - padding)
    }

    /// One fixed step of noise-driven motion at simulation time `t`.
    fn step(&mut self, config: &BubbleFieldConfig, t: f64, bounds: Vec2) {
        let seed = self.token.seed as f32;
        let noise = Vec2::new(
            smooth_noise(t, seed, config.noise_channels.0),
            smooth_noise(t, seed, config.noise_channels.1),
        );

        self.velocity += noise * config.noise_gain;
        self.velocity *= config.damping;
        let limit = Vec2::splat(config.max_velocity.max(0.0));
        self.velocity = self.velocity.max(-limit).min(limit);
        self.position += self.velocity;

        let max = Self::free_extent(self.token.size, bounds, config.edge_padding).max(Vec2::splat(config.margin));
        if self.position.x < config.margin {
            self.position.x = config.margin;
            self.velocity.x = self.velocity.x.abs() * config.bounce;
        } else if self.position.x > max.x {
            self.position.x = max.x;
            self.velocity.x = -self.velocity.x.abs() * config.bounce;
        }
        if self.position.y < config.margin {
            self.position.y = config.margin;
            self.velocity.y = self.velocity.y.abs() * config.bounce;
        } else if self.position.y > max.y {
            self.position.y = max.y;
            self.velocity.y = -self.velocity.y.abs() * config.bounce;
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.token.radius())
    }
}

/// Fixed list of noise-driven bubbles.
pub struct BubbleField {
    config: BubbleFieldConfig,
    bubbles: Vec<Bubble>,
    timestep: FixedTimestep,
    sim_ms: f64,
}

impl BubbleField {
    pub fn new(config: BubbleFieldConfig) -> Self {
        Self {
            config,
            bubbles: Vec::new(),
            timestep: FixedTimestep::new(TARGET_FRAME_MS),
            sim_ms: 0.0,
        }
    }

    pub fn config(&self) -> &BubbleFieldConfig {
        &self.config
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    fn rest_centered(&mut self, bounds: Vec2) {
        for bubble in &mut self.bubbles {
            bubble.position = bounds / 2.0 - Vec2::splat(bubble.token.radius());
            bubble.velocity = Vec2::ZERO;
            bubble.scale = 1.0;
            bubble.rotation_deg = 0.0;
        }
    }
}

impl Default for BubbleField {
    fn default() -> Self {
        Self::new(BubbleFieldConfig::default())
    }
}

impl Field for BubbleField {
    fn config(&self) -> RunnerConfig {
        RunnerConfig {
            seed: self.config.seed,
            ..RunnerConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut FieldContext) {
        ctx.reseed();
        let bounds = Vec2::new(ctx.size.width, ctx.size.height);
        self.timestep.reset();
        self.sim_ms = 0.0;
        self.bubbles = self
            .config
            .bubbles
            .iter()
            .map(|spec| {
                let free = Bubble::free_extent(spec.token.size, bounds, self.config.edge_padding);
                Bubble::spawn(spec, free)
            })
            .collect();
    }

    fn tick(&mut self, ctx: &FieldContext, time: FrameTime) {
        let bounds = Vec2::new(ctx.size.width, ctx.size.height);
        if ctx.motion.is_reduced() {
            self.rest_centered(bounds);
            return;
        }

        let steps = self.timestep.accumulate(time.delta_ms);
        for _ in 0..steps {
            self.sim_ms += self.timestep.dt();
            for bubble in &mut self.bubbles {
                bubble.step(&self.config, self.sim_ms, bounds);
            }
        }

        let t = time.elapsed_ms;
        let scale = 1.0 + (t * self.config.breathing_speed as f64).sin() as f32 * self.config.breathing_amplitude;
        let rotation = (t * self.config.rotation_speed as f64).sin() as f32 * self.config.rotation_amplitude;
        for bubble in &mut self.bubbles {
            bubble.scale = scale;
            bubble.rotation_deg = rotation;
        }
    }

    fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface) {
        if ctx.size.is_empty() {
            return;
        }
        paint_backdrop(surface, Backdrop::Clear);

        let light = ctx.is_light();
        for bubble in &self.bubbles {
            paint_glass(surface, &bubble.token, bubble.center(), bubble.token.radius() * bubble.scale, bubble.rotation_deg, light);
        }
    }

    fn release(&mut self) {
        self.bubbles = Vec::new();
    }

    fn len(&self) -> usize {
        self.bubbles.len()
    }
}

/// Paint one glass bubble: shadowed body, specular highlight, optional tint,
/// rim and the token's logo at half the diameter.
pub(crate) fn paint_glass(surface: &mut dyn Surface, token: &Token, center: Vec2, radius: f32, rotation_deg: f32, light: bool) {
    let body = Color::rgba(1.0, 1.0, 1.0, if light { 0.3 } else { 0.1 });
    let border = Color::rgba(1.0, 1.0, 1.0, if light { 0.9 } else { 0.3 });
    let shadow = if light { Color::rgb8(119, 52, 184).with_alpha(0.35) } else { Color::rgb8(167, 139, 250).with_alpha(0.5) };
    let highlight = Color::rgba(1.0, 1.0, 1.0, if light { 0.6 } else { 0.57 });

    surface.set_glow(Some(Glow { blur: 32.0, color: shadow }));
    surface.fill_circle(center, radius, body);
    surface.set_glow(None);

    surface.fill_circle(center + Vec2::new(-0.2, -0.25) * radius, radius * 0.3, highlight);
    if let Some(tint) = token.tint {
        surface.fill_circle(center, radius, tint);
    }
    surface.stroke_ellipse(center, Vec2::splat(radius), 2.0, border);
    surface.draw_image(&token.image, center, radius, rotation_deg, if light { 1.0 } else { 0.95 });
}
