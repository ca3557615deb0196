use glam::Vec2;

use super::surface::{Glow, Surface};
use crate::api::types::SurfaceSize;
use crate::components::color::Color;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { origin: Vec2, extent: Vec2, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeEllipse { center: Vec2, radii: Vec2, line_width: f32, color: Color },
    SetGlow(Option<Glow>),
    Image { key: String, center: Vec2, size: f32, rotation_deg: f32, alpha: f32 },
}

/// A `Surface` that records calls instead of rasterizing them.
/// Used by tests as a fake display and by the bridge to build flat draw buffers.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::with_capacity(1024),
        }
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    /// Commands recorded since the last `take_frame`/`reset`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Move the recorded commands out, leaving the recorder empty.
    pub fn take_frame(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of shape fills (rects + circles), ignoring state changes.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. } | DrawCommand::FillCircle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { origin, extent, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, line_width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeEllipse { center, radii, line_width, color });
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.commands.push(DrawCommand::SetGlow(glow));
    }

    fn draw_image(&mut self, key: &str, center: Vec2, size: f32, rotation_deg: f32, alpha: f32) {
        self.commands.push(DrawCommand::Image {
            key: key.to_string(),
            center,
            size,
            rotation_deg,
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{paint_backdrop, Backdrop};

    #[test]
    fn records_calls_in_order() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(100.0, 50.0));
        surface.clear();
        surface.fill_circle(Vec2::new(1.0, 2.0), 3.0, Color::WHITE);
        assert_eq!(surface.len(), 2);
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(surface.fill_count(), 1);
    }

    #[test]
    fn fade_backdrop_covers_whole_surface() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(100.0, 50.0));
        let fade = Color::rgba(0.0, 0.0, 0.0, 0.15);
        paint_backdrop(&mut surface, Backdrop::Fade(fade));
        assert_eq!(
            surface.commands()[0],
            DrawCommand::FillRect { origin: Vec2::ZERO, extent: Vec2::new(100.0, 50.0), color: fade }
        );
    }

    #[test]
    fn take_frame_empties_recorder() {
        let mut surface = RecordingSurface::new(SurfaceSize::new(10.0, 10.0));
        surface.clear();
        let frame = surface.take_frame();
        assert_eq!(frame.len(), 1);
        assert!(surface.is_empty());
    }
}
