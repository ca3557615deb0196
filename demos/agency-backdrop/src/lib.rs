use wasm_bindgen::prelude::*;
use ambient_engine::*;

mod presets;

ambient_web::export_field!(presets::section_particles(), "agency-backdrop");

/// JSON preset for one of the site's named backdrops, to pass to
/// `field_init` or `canvas_mount`.
#[wasm_bindgen]
pub fn site_preset(name: &str) -> Option<String> {
    let preset: FieldPreset = presets::by_name(name)?;
    match preset.to_json() {
        Ok(json) => Some(json),
        Err(err) => {
            log::warn!("agency-backdrop: cannot encode preset {}: {}", name, err);
            None
        }
    }
}
