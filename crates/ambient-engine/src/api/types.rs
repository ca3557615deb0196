use serde::{Deserialize, Serialize};

/// Pixel dimensions of a drawing surface, in CSS pixels.
/// `dpr` is the device pixel ratio the backing store is scaled by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_dpr")]
    pub dpr: f32,
}

fn default_dpr() -> f32 {
    1.0
}

impl SurfaceSize {
    pub const ZERO: SurfaceSize = SurfaceSize { width: 0.0, height: 0.0, dpr: 1.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, dpr: 1.0 }
    }

    pub fn with_dpr(mut self, dpr: f32) -> Self {
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self
    }

    /// True when either side is zero (or negative / NaN). Nothing is drawn on an empty surface.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Backing-store size in device pixels.
    pub fn device_pixels(&self) -> (u32, u32) {
        (
            (self.width.max(0.0) * self.dpr).round() as u32,
            (self.height.max(0.0) * self.dpr).round() as u32,
        )
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Light/dark page theme. Only changes color and opacity constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn is_light(self) -> bool {
        self == Theme::Light
    }
}

/// Platform motion preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    #[default]
    Full,
    /// `prefers-reduced-motion: reduce`: fields render one static frame.
    Reduced,
}

impl Motion {
    pub fn from_reduced(reduced: bool) -> Self {
        if reduced { Motion::Reduced } else { Motion::Full }
    }

    pub fn is_reduced(self) -> bool {
        self == Motion::Reduced
    }
}

/// Time handed to `Field::tick`, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Time since the runner started animating.
    pub elapsed_ms: f64,
    /// Time since the previous rendered frame.
    pub delta_ms: f64,
}

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime { elapsed_ms: 0.0, delta_ms: 0.0 };

    pub fn new(elapsed_ms: f64, delta_ms: f64) -> Self {
        Self { elapsed_ms, delta_ms }
    }

    /// Build a time at `elapsed_ms` as if frames arrived at a steady `interval_ms`.
    pub fn at(elapsed_ms: f64, interval_ms: f64) -> Self {
        Self { elapsed_ms, delta_ms: interval_ms.min(elapsed_ms.max(0.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_surface_is_empty() {
        assert!(SurfaceSize::new(0.0, 300.0).is_empty());
        assert!(SurfaceSize::new(300.0, 0.0).is_empty());
        assert!(SurfaceSize::new(f32::NAN, 10.0).is_empty());
        assert!(!SurfaceSize::new(1.0, 1.0).is_empty());
        assert_eq!(SurfaceSize::new(0.0, 300.0).area(), 0.0);
    }

    #[test]
    fn device_pixels_scale_with_dpr() {
        let size = SurfaceSize::new(100.0, 50.0).with_dpr(2.0);
        assert_eq!(size.device_pixels(), (200, 100));
    }

    #[test]
    fn invalid_dpr_falls_back_to_one() {
        let size = SurfaceSize::new(100.0, 50.0).with_dpr(0.0);
        assert_eq!(size.dpr, 1.0);
    }

    #[test]
    fn theme_and_motion_parse_from_json() {
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert!(theme.is_light());
        let motion: Motion = serde_json::from_str("\"reduced\"").unwrap();
        assert!(motion.is_reduced());
    }
}
