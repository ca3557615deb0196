use serde::{Deserialize, Serialize};

use super::color::Color;

/// A labeled visual payload (a logo inside a glass bubble).
/// `image` is the key the surface resolves to a loaded image; `label` is the
/// accessible name and the fallback when no image is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub image: String,
    pub label: String,
    /// Bubble diameter in px.
    #[serde(default = "default_size")]
    pub size: f32,
    /// Per-token variation seed (trajectory, logo spin style).
    #[serde(default = "default_seed")]
    pub seed: u32,
    /// Optional tint painted over the bubble body.
    #[serde(default)]
    pub tint: Option<Color>,
}

fn default_size() -> f32 {
    80.0
}

fn default_seed() -> u32 {
    1
}

impl Token {
    pub fn new(image: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            label: label.into(),
            size: default_size(),
            seed: default_seed(),
            tint: None,
        }
    }

    // -- Builder pattern --

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}
