pub mod pixel_particles;
pub mod pixel_grid;
pub mod bubble;
pub mod orbit;

use crate::api::field::{Field, FieldContext, RunnerConfig};
use crate::api::types::FrameTime;
use crate::renderer::surface::Surface;

pub use pixel_particles::{PixelParticles, PixelParticlesConfig};
pub use pixel_grid::{PixelGrid, PixelGridConfig};
pub use bubble::{BubbleField, BubbleFieldConfig, BubbleSpec};
pub use orbit::{OrbitField, OrbitFieldConfig, OrbitBody};

/// Any of the shipped fields, chosen at runtime from a preset.
pub enum AnyField {
    PixelParticles(PixelParticles),
    PixelGrid(PixelGrid),
    Bubbles(BubbleField),
    Orbit(OrbitField),
}

macro_rules! dispatch {
    ($self:expr, $f:ident => $body:expr) => {
        match $self {
            AnyField::PixelParticles($f) => $body,
            AnyField::PixelGrid($f) => $body,
            AnyField::Bubbles($f) => $body,
            AnyField::Orbit($f) => $body,
        }
    };
}

impl AnyField {
    pub fn kind(&self) -> &'static str {
        match self {
            AnyField::PixelParticles(_) => "pixel_particles",
            AnyField::PixelGrid(_) => "pixel_grid",
            AnyField::Bubbles(_) => "bubbles",
            AnyField::Orbit(_) => "orbit",
        }
    }
}

impl Field for AnyField {
    fn config(&self) -> RunnerConfig {
        dispatch!(self, f => Field::config(f))
    }

    fn init(&mut self, ctx: &mut FieldContext) {
        dispatch!(self, f => f.init(ctx))
    }

    fn tick(&mut self, ctx: &FieldContext, time: FrameTime) {
        dispatch!(self, f => f.tick(ctx, time))
    }

    fn render(&self, ctx: &FieldContext, surface: &mut dyn Surface) {
        dispatch!(self, f => f.render(ctx, surface))
    }

    fn release(&mut self) {
        dispatch!(self, f => f.release())
    }

    fn len(&self) -> usize {
        dispatch!(self, f => f.len())
    }

    fn layer_opacity(&self, ctx: &FieldContext) -> f32 {
        dispatch!(self, f => f.layer_opacity(ctx))
    }
}
