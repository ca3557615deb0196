use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::field::{Field, FieldContext, RunnerConfig};
use crate::api::types::FrameTime;
use crate::components::color::Color;
use crate::components::token::Token;
use crate::error::ConfigError;
use crate::extensions::wave::normalize_degrees;
use crate::renderer::surface::{paint_backdrop, Backdrop, Surface};
use crate::systems::bubble::paint_glass;

/// A token riding the shared orbit at a fixed angular offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitBody {
    pub token: Token,
    /// Offset from the shared angle, in degrees.
    pub offset_deg: f64,
}

impl OrbitBody {
    pub fn new(token: Token, offset_deg: f64) -> Self {
        Self { token, offset_deg }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitFieldConfig {
    pub seed: u64,
    /// Ellipse half-axes in px.
    pub radii: (f32, f32),
    /// Degrees advanced per reference frame.
    pub speed_deg: f64,
    /// Reference frame length in ms.
    pub frame_ms: f64,
    pub path_color: Color,
    pub path_width: f32,
    pub bodies: Vec<OrbitBody>,
}

impl Default for OrbitFieldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            radii: (620.0, 200.0),
            speed_deg: 0.3,
            frame_ms: 16.67,
            // purple-500 at 20%
            path_color: Color::rgb8(0xa8, 0x55, 0xf7).with_alpha(0.2),
            path_width: 1.0,
            bodies: default_bodies(),
        }
    }
}

fn simple_icon(name: &str) -> String {
    format!("https://cdn.simpleicons.org/{name}/7734b8")
}

/// The eight partner logos, 45° apart.
pub fn default_bodies() -> Vec<OrbitBody> {
    vec![
        OrbitBody::new(Token::new("/logo_axiom_a.png", "Axiom IA").with_size(110.0).with_seed(1), 0.0),
        OrbitBody::new(Token::new(simple_icon("shopify"), "Shopify").with_size(85.0).with_seed(2), 45.0),
        OrbitBody::new(Token::new(simple_icon("prestashop"), "PrestaShop").with_size(75.0).with_seed(3), 90.0),
        OrbitBody::new(Token::new(simple_icon("woocommerce"), "WooCommerce").with_size(80.0).with_seed(4), 135.0),
        OrbitBody::new(
            Token::new("/logo_chatgpt.png", "ChatGPT")
                .with_size(80.0)
                .with_seed(5)
                .with_tint(Color::rgb8(0x77, 0x34, 0xb8).with_alpha(0.25)),
            180.0,
        ),
        OrbitBody::new(Token::new(simple_icon("google"), "Google").with_size(75.0).with_seed(6), 225.0),
        OrbitBody::new(Token::new(simple_icon("googlegemini"), "Gemini").with_size(80.0).with_seed(1), 270.0),
        OrbitBody::new(Token::new(simple_icon("perplexity"), "Perplexity").with_size(75.0).with_seed(2), 315.0),
    ]
}

impl OrbitFieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_ms > 0.0) {
            return Err(ConfigError::NotPositive { kind: "orbit", field: "frame_ms", value: self.frame_ms as f32 });
        }
        if !(self.radii.0 > 0.0) || !(self.radii.1 > 0.0) {
            return Err(ConfigError::NotPositive { kind: "orbit", field: "radii", value: self.radii.0.min(self.radii.1) });
        }
        Ok(())
    }
}

/// Tokens on one shared ellipse, all driven by a single angle.
/// Positions are derived on demand and never stored.
pub struct OrbitField {
    config: OrbitFieldConfig,
    bodies: Vec<OrbitBody>,
    angle: f64,
}

impl OrbitField {
    pub fn new(config: OrbitFieldConfig) -> Self {
        Self { config, bodies: Vec::new(), angle: 0.0 }
    }

    pub fn config(&self) -> &OrbitFieldConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[OrbitBody] {
        &self.bodies
    }

    /// Shared angle in degrees, in [0, 360).
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Back to angle 0 and the configured layout.
    pub fn reset(&mut self) {
        self.angle = 0.0;
        if !self.bodies.is_empty() {
            self.bodies = self.config.bodies.clone();
        }
    }

    /// Angle of body `index` in degrees, in [0, 360).
    pub fn body_angle(&self, index: usize) -> Option<f64> {
        self.bodies.get(index).map(|b| normalize_degrees(self.angle + b.offset_deg))
    }

    /// Position of body `index` relative to `center`.
    pub fn body_position(&self, index: usize, center: Vec2) -> Option<Vec2> {
        self.body_angle(index).map(|deg| {
            let rad = deg.to_radians();
            center + Vec2::new(rad.cos() as f32 * self.config.radii.0, rad.sin() as f32 * self.config.radii.1)
        })
    }
}

impl Default for OrbitField {
    fn default() -> Self {
        Self::new(OrbitFieldConfig::default())
    }
}

impl Field for OrbitField {
    fn config(&self) -> RunnerConfig {
        RunnerConfig {
            seed: self.config.seed,
            ..RunnerConfig::default()
        }
    }

    // Resizing only moves the center, so the angle survives re-init.
    fn init(&mut self, ctx: &mut FieldContext) {
        ctx.reseed();
        self.bodies = self.config.bodies.clone();
    }

    fn tick(&mut self, ctx: &FieldContext, time: FrameTime) {
        if self.config.frame_ms <= 0.0 {
            return;
        }
        let delta = ctx.effective_time(time).delta_ms;
        self.angle = normalize_degrees(self.angle + self.config.speed_deg * delta / self.config.frame_ms);
    }

    fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface) {
        if ctx.size.is_empty() {
            return;
        }
        paint_backdrop(surface, Backdrop::Clear);

        let center = Vec2::new(ctx.size.width, ctx.size.height) / 2.0;
        let radii = Vec2::new(self.config.radii.0, self.config.radii.1);
        surface.stroke_ellipse(center, radii, self.config.path_width, self.config.path_color);

        let light = ctx.is_light();
        for (i, body) in self.bodies.iter().enumerate() {
            if let Some(position) = self.body_position(i, center) {
                paint_glass(surface, &body.token, position, body.token.radius(), 0.0, light);
            }
        }
    }

    fn release(&mut self) {
        self.bodies = Vec::new();
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }
}
