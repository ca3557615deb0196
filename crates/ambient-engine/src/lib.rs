pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::field::{Field, FieldContext, RunnerConfig};
pub use api::types::{FrameTime, Motion, SurfaceSize, Theme};
pub use components::color::Color;
pub use components::token::Token;
pub use crate::core::rng::Rng;
pub use crate::core::runner::{FieldRunner, FrameOutcome, RunState};
pub use crate::core::time::{FixedTimestep, FrameClock, FrameThrottle, TARGET_FRAME_MS};
pub use renderer::surface::{Surface, Backdrop, Glow, paint_backdrop};
pub use renderer::recording::{RecordingSurface, DrawCommand};
pub use renderer::instance::{DrawInstance, DrawBuffer};
pub use input::queue::{FieldEvent, EventQueue};
pub use assets::preset::FieldPreset;
pub use error::ConfigError;
pub use systems::{
    AnyField,
    PixelParticles, PixelParticlesConfig,
    PixelGrid, PixelGridConfig,
    BubbleField, BubbleFieldConfig, BubbleSpec,
    OrbitField, OrbitFieldConfig, OrbitBody,
};
