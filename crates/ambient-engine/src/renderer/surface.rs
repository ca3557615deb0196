//! Drawing surface contract.
//!
//! Fields never talk to a canvas directly; they issue calls on a `Surface`
//! trait object. The web bridge implements it over Canvas 2D, the engine
//! implements it as a command recorder for tests and buffer export.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::SurfaceSize;
use crate::components::color::Color;

/// Shadow glow applied to subsequent fills (Canvas `shadowBlur` / `shadowColor`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: Color,
}

/// How the previous frame is removed before particles are painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "color")]
pub enum Backdrop {
    /// Wipe to fully transparent.
    Clear,
    /// Paint a translucent full-surface rect, leaving trails.
    Fade(Color),
}

impl Default for Backdrop {
    fn default() -> Self {
        Backdrop::Clear
    }
}

/// A 2D drawing target with explicit pixel dimensions.
/// Coordinates are surface-local CSS pixels; implementations handle `dpr`.
pub trait Surface {
    /// Current dimensions.
    fn size(&self) -> SurfaceSize;

    /// Clear to transparent.
    fn clear(&mut self);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Color);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Stroke an axis-aligned ellipse outline.
    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, line_width: f32, color: Color);

    /// Set (or with `None`, reset) the glow for subsequent fills.
    fn set_glow(&mut self, glow: Option<Glow>);

    /// Draw a registered image centered at `center`, `size` px square,
    /// rotated by `rotation_deg`. Unknown or not yet loaded images are skipped.
    fn draw_image(&mut self, key: &str, center: Vec2, size: f32, rotation_deg: f32, alpha: f32);
}

/// Paint the backdrop over the whole surface.
pub fn paint_backdrop(surface: &mut dyn Surface, backdrop: Backdrop) {
    match backdrop {
        Backdrop::Clear => surface.clear(),
        Backdrop::Fade(color) => {
            let size = surface.size();
            surface.fill_rect(Vec2::ZERO, Vec2::new(size.width, size.height), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backdrop_parses_from_json() {
        let fade: Backdrop = serde_json::from_str(r##"{ "mode": "fade", "color": "#00000026" }"##).unwrap();
        match fade {
            Backdrop::Fade(c) => assert!((c.a - 0x26 as f32 / 255.0).abs() < 1e-6),
            Backdrop::Clear => panic!("expected fade"),
        }
        let clear: Backdrop = serde_json::from_str(r#"{ "mode": "clear" }"#).unwrap();
        assert_eq!(clear, Backdrop::Clear);
    }
}
