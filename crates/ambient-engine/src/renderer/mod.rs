pub mod surface;
pub mod recording;
pub mod instance;

// Re-export key types for convenient access
pub use surface::{Surface, Backdrop, Glow, paint_backdrop};
pub use recording::{RecordingSurface, DrawCommand};
pub use instance::{DrawInstance, DrawBuffer};
