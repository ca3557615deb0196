pub mod preset;

pub use preset::FieldPreset;
