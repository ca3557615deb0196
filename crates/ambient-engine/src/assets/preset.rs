use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::systems::{
    AnyField, BubbleField, BubbleFieldConfig, OrbitField, OrbitFieldConfig, PixelGrid, PixelGridConfig,
    PixelParticles, PixelParticlesConfig,
};

/// A field and its configuration, as loaded from JSON.
///
/// ```json
/// { "kind": "pixel_grid", "gap": 16, "colors": ["#7734b8", "#0a0a0a"] }
/// ```
///
/// Missing keys take their defaults, so `{ "kind": "orbit" }` is a full preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldPreset {
    PixelParticles(PixelParticlesConfig),
    PixelGrid(PixelGridConfig),
    Bubbles(BubbleFieldConfig),
    Orbit(OrbitFieldConfig),
}

impl FieldPreset {
    /// Parse and validate a preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let preset: Self = serde_json::from_str(json)?;
        preset.validate()?;
        Ok(preset)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FieldPreset::PixelParticles(c) => c.validate(),
            FieldPreset::PixelGrid(c) => c.validate(),
            FieldPreset::Bubbles(c) => c.validate(),
            FieldPreset::Orbit(c) => c.validate(),
        }
    }

    pub fn build(self) -> AnyField {
        match self {
            FieldPreset::PixelParticles(c) => AnyField::PixelParticles(PixelParticles::new(c)),
            FieldPreset::PixelGrid(c) => AnyField::PixelGrid(PixelGrid::new(c)),
            FieldPreset::Bubbles(c) => AnyField::Bubbles(BubbleField::new(c)),
            FieldPreset::Orbit(c) => AnyField::Orbit(OrbitField::new(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::field::Field;
    use crate::components::color::Color;

    #[test]
    fn kind_only_preset_uses_defaults() {
        let preset = FieldPreset::from_json(r#"{ "kind": "orbit" }"#).unwrap();
        assert_eq!(preset, FieldPreset::Orbit(OrbitFieldConfig::default()));
    }

    #[test]
    fn parse_grid_preset() {
        let json = r##"{
            "kind": "pixel_grid",
            "gap": 16,
            "speed": 10,
            "colors": ["#7734b8", "#0a0a0a"]
        }"##;
        let preset = FieldPreset::from_json(json).unwrap();
        match preset {
            FieldPreset::PixelGrid(cfg) => {
                assert_eq!(cfg.gap, 16.0);
                assert_eq!(cfg.speed, 10.0);
                assert_eq!(cfg.colors, vec![Color::rgb8(0x77, 0x34, 0xb8), Color::rgb8(0x0a, 0x0a, 0x0a)]);
                assert_eq!(cfg.opacity, 0.6);
            }
            other => panic!("unexpected preset {other:?}"),
        }
    }

    #[test]
    fn parse_bubbles_preset() {
        let json = r#"{
            "kind": "bubbles",
            "bubbles": [
                { "token": { "image": "/logo.png", "label": "Logo", "size": 120, "seed": 3 }, "start": [0.25, 0.75] }
            ]
        }"#;
        let preset = FieldPreset::from_json(json).unwrap();
        let FieldPreset::Bubbles(cfg) = preset else {
            panic!("expected bubbles");
        };
        assert_eq!(cfg.bubbles.len(), 1);
        assert_eq!(cfg.bubbles[0].start, (0.25, 0.75));
        assert_eq!(cfg.damping, 0.995);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(FieldPreset::from_json("{ kind: "), Err(ConfigError::Json(_))));
        assert!(matches!(FieldPreset::from_json(r#"{ "kind": "fireworks" }"#), Err(ConfigError::Json(_))));
    }

    #[test]
    fn bad_color_is_an_error() {
        let err = FieldPreset::from_json(r#"{ "kind": "pixel_grid", "colors": ["purple"] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = FieldPreset::from_json(r#"{ "kind": "pixel_grid", "gap": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "gap", .. }));
        let err = FieldPreset::from_json(r#"{ "kind": "pixel_grid", "colors": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette(_)));
    }

    #[test]
    fn reversed_ranges_fail_validation() {
        let err = FieldPreset::from_json(r#"{ "kind": "pixel_particles", "alpha_range": [0.7, 0.1] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { field: "alpha_range", .. }));
        let err = FieldPreset::from_json(r#"{ "kind": "pixel_grid", "size_bounds": [3.2, 0.0] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { field: "size_bounds", .. }));
        let err = FieldPreset::from_json(r#"{ "kind": "bubbles", "max_velocity": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { field: "max_velocity", .. }));
    }

    #[test]
    fn json_survives_a_trip() {
        let preset = FieldPreset::PixelGrid(PixelGridConfig::default());
        let json = preset.to_json().unwrap();
        assert!(json.contains(r##""kind":"pixel_grid""##));
        assert!(json.contains(r##""#7734b8""##));
        assert_eq!(FieldPreset::from_json(&json).unwrap(), preset);
    }

    #[test]
    fn build_picks_matching_field() {
        let field = FieldPreset::Orbit(OrbitFieldConfig::default()).build();
        assert_eq!(field.kind(), "orbit");
        assert_eq!(field.config().seed, 42);
        let grid = FieldPreset::PixelGrid(PixelGridConfig::default()).build();
        assert_eq!(grid.kind(), "pixel_grid");
        assert_eq!(grid.config().frame_cap_ms, crate::core::time::TARGET_FRAME_MS);
    }
}
