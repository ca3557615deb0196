use bytemuck::{Pod, Zeroable};

use super::recording::DrawCommand;

/// Instance kinds in the flat draw buffer. Must match the JavaScript reader.
pub const KIND_CLEAR: f32 = 0.0;
pub const KIND_RECT: f32 = 1.0;
pub const KIND_CIRCLE: f32 = 2.0;
pub const KIND_ELLIPSE: f32 = 3.0;
pub const KIND_GLOW: f32 = 4.0;
pub const KIND_IMAGE: f32 = 5.0;

/// One draw call in wire format: 12 floats = 48 bytes stride.
///
/// | kind    | x, y          | w, h          | rotation | aux              |
/// |---------|---------------|---------------|----------|------------------|
/// | rect    | origin        | extent        | 0        | 0                |
/// | circle  | center        | radius, radius| 0        | 0                |
/// | ellipse | center        | radii         | 0        | line width       |
/// | glow    | 0             | 0             | 0        | blur (0 = off)   |
/// | image   | center        | size, size    | degrees  | image table index|
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub rotation: f32,
    pub aux: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl DrawInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Flat buffer of draw instances plus the image keys they reference.
/// JavaScript reads `instances_ptr()` × `instance_count()` straight out of wasm memory.
pub struct DrawBuffer {
    pub instances: Vec<DrawInstance>,
    pub images: Vec<String>,
}

impl DrawBuffer {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            images: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.images.clear();
    }

    /// Replace the buffer contents with an encoded frame.
    pub fn encode(&mut self, commands: &[DrawCommand]) {
        self.clear();
        for command in commands {
            let instance = self.encode_one(command);
            self.instances.push(instance);
        }
    }

    fn image_index(&mut self, key: &str) -> usize {
        match self.images.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => {
                self.images.push(key.to_string());
                self.images.len() - 1
            }
        }
    }

    fn encode_one(&mut self, command: &DrawCommand) -> DrawInstance {
        match command {
            DrawCommand::Clear => DrawInstance { kind: KIND_CLEAR, ..Default::default() },
            DrawCommand::FillRect { origin, extent, color } => DrawInstance {
                kind: KIND_RECT,
                x: origin.x,
                y: origin.y,
                w: extent.x,
                h: extent.y,
                color: color.to_array(),
                ..Default::default()
            },
            DrawCommand::FillCircle { center, radius, color } => DrawInstance {
                kind: KIND_CIRCLE,
                x: center.x,
                y: center.y,
                w: *radius,
                h: *radius,
                color: color.to_array(),
                ..Default::default()
            },
            DrawCommand::StrokeEllipse { center, radii, line_width, color } => DrawInstance {
                kind: KIND_ELLIPSE,
                x: center.x,
                y: center.y,
                w: radii.x,
                h: radii.y,
                aux: *line_width,
                color: color.to_array(),
                ..Default::default()
            },
            DrawCommand::SetGlow(glow) => match glow {
                Some(glow) => DrawInstance {
                    kind: KIND_GLOW,
                    aux: glow.blur,
                    color: glow.color.to_array(),
                    ..Default::default()
                },
                None => DrawInstance { kind: KIND_GLOW, ..Default::default() },
            },
            DrawCommand::Image { key, center, size, rotation_deg, alpha } => {
                let idx = self.image_index(key);
                DrawInstance {
                    kind: KIND_IMAGE,
                    x: center.x,
                    y: center.y,
                    w: *size,
                    h: *size,
                    rotation: *rotation_deg,
                    aux: idx as f32,
                    color: [1.0, 1.0, 1.0, *alpha],
                    ..Default::default()
                }
            }
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// The buffer viewed as raw floats.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for DrawBuffer {
    fn default() -> Self {
        Self::new()
    }
}
