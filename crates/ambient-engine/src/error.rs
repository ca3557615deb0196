use thiserror::Error;

/// Errors raised while building field configuration from presets.
/// Rendering itself never fails; see `FieldRunner` for the no-op policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Preset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid color {0:?}, expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("The color palette of a {0} field must not be empty")]
    EmptyPalette(&'static str),

    #[error("The {field} of a {kind} field must be positive, got {value}")]
    NotPositive {
        kind: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("The {field} of a {kind} field must be an ordered range, got [{min}, {max}]")]
    InvalidRange {
        kind: &'static str,
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Reject reversed or NaN `(min, max)` pairs.
pub(crate) fn check_range(kind: &'static str, field: &'static str, range: (f32, f32)) -> Result<(), ConfigError> {
    let (min, max) = range;
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { kind, field, min, max })
    }
}
