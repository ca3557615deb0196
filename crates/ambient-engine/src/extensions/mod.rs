// extensions/mod.rs
//
// Pure math shared by the fields. Nothing here knows about fields or surfaces.

pub mod wave;

pub use wave::{wave01, smooth_noise, triangle, wrap, snap, drift, normalize_degrees, phase_from_unit};
