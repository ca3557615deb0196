pub mod canvas;
pub mod driver;
pub mod runner;

pub use ambient_engine;
pub use canvas::CanvasSurface;
pub use driver::CanvasDriver;
pub use runner::{outcome_code, BufferedRunner};

use ambient_engine::{FieldPreset, Theme};

/// Resolve the preset passed from JavaScript, falling back to `default` when
/// it is missing or invalid.
pub fn resolve_preset(name: &str, json: Option<String>, default: FieldPreset) -> FieldPreset {
    let Some(json) = json else {
        return default;
    };
    match FieldPreset::from_json(&json) {
        Ok(preset) => preset,
        Err(err) => {
            log::warn!("{}: bad preset ({}), using defaults", name, err);
            default
        }
    }
}

pub fn theme_from_flag(light: bool) -> Theme {
    if light {
        Theme::Light
    } else {
        Theme::Dark
    }
}

/// Generate all `#[wasm_bindgen]` exports for a field.
///
/// Two hosting modes are generated side by side:
/// - `field_*`: JavaScript owns the loop and the canvas, calls `field_frame`
///   from its own `requestAnimationFrame` and paints the flat draw buffer.
///   One runner per module.
/// - `canvas_*`: Rust owns the loop and paints canvas elements directly,
///   one driver per handle.
///
/// Both take an optional preset JSON; a missing or invalid one falls back
/// to `$preset`.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use ambient_engine::*;
///
/// ambient_web::export_field!(FieldPreset::PixelGrid(PixelGridConfig::default()), "pixel-grid");
/// ```
///
/// # Arguments
///
/// - `$preset`: expression producing the default `FieldPreset`
/// - `$field_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_field {
    ($preset:expr, $field_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::BufferedRunner>> = RefCell::new(None);
            static DRIVERS: RefCell<std::collections::HashMap<u32, $crate::CanvasDriver>> =
                RefCell::new(std::collections::HashMap::new());
            static NEXT_HANDLE: std::cell::Cell<u32> = std::cell::Cell::new(1);
        }

        fn with_runner<R>(fallback: R, f: impl FnOnce(&mut $crate::BufferedRunner) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::debug!("{}: not initialized, call field_init() first", $field_name);
                    fallback
                }
            })
        }

        fn init_logging() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        fn default_preset() -> $crate::ambient_engine::FieldPreset {
            $preset
        }

        /// Create the runner. Returns true when the loop is live and the host
        /// should start requesting frames.
        #[wasm_bindgen]
        pub fn field_init(
            width: f32,
            height: f32,
            dpr: f32,
            theme_light: bool,
            reduced_motion: bool,
            preset_json: Option<String>,
        ) -> bool {
            init_logging();

            let preset = $crate::resolve_preset($field_name, preset_json, default_preset());
            let size = $crate::ambient_engine::SurfaceSize::new(width, height).with_dpr(dpr);
            let theme = $crate::theme_from_flag(theme_light);
            let runner = $crate::BufferedRunner::new(preset, size, theme, reduced_motion);

            RUNNER.with(|cell| {
                if let Some(previous) = cell.borrow_mut().as_mut() {
                    previous.teardown();
                }
                *cell.borrow_mut() = Some(runner);
            });

            let live = with_runner(false, |r| r.mount());
            log::info!("{}: initialized", $field_name);
            live
        }

        /// Run one frame. 0 rendered, 1 skipped, 2 parked, 3 stopped.
        /// Keep requesting frames while the code is below 2.
        #[wasm_bindgen]
        pub fn field_frame(now: f64) -> u32 {
            with_runner(3, |r| $crate::outcome_code(r.frame(now)))
        }

        #[wasm_bindgen]
        pub fn field_resize(width: f32, height: f32, dpr: f32) -> bool {
            let size = $crate::ambient_engine::SurfaceSize::new(width, height).with_dpr(dpr);
            with_runner(false, |r| r.resize(size))
        }

        #[wasm_bindgen]
        pub fn field_set_reduced_motion(reduced: bool) -> bool {
            with_runner(false, |r| r.set_reduced_motion(reduced))
        }

        #[wasm_bindgen]
        pub fn field_set_theme(light: bool) -> bool {
            with_runner(false, |r| r.set_theme($crate::theme_from_flag(light)))
        }

        #[wasm_bindgen]
        pub fn field_teardown() {
            RUNNER.with(|cell| {
                if let Some(mut runner) = cell.borrow_mut().take() {
                    runner.teardown();
                }
            });
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_draw_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.draw_ptr())
        }

        #[wasm_bindgen]
        pub fn get_draw_count() -> u32 {
            with_runner(0, |r| r.draw_count())
        }

        #[wasm_bindgen]
        pub fn get_draw_floats_per_instance() -> u32 {
            $crate::ambient_engine::DrawInstance::FLOATS as u32
        }

        #[wasm_bindgen]
        pub fn get_image_key(index: u32) -> Option<String> {
            with_runner(None, |r| r.image_key(index).map(str::to_string))
        }

        #[wasm_bindgen]
        pub fn get_layer_opacity() -> f32 {
            with_runner(1.0, |r| r.layer_opacity())
        }

        // ---- Canvas-driven mode ----
        // Any number of canvases can run at once; each mount returns a handle.

        /// Mount on `canvas` and start the loop. Returns the handle to pass
        /// to `canvas_unmount`, or `None` when the canvas has no 2d context.
        #[wasm_bindgen]
        pub fn canvas_mount(
            canvas: web_sys::HtmlCanvasElement,
            theme_light: bool,
            preset_json: Option<String>,
        ) -> Result<Option<u32>, JsValue> {
            init_logging();

            let preset = $crate::resolve_preset($field_name, preset_json, default_preset());
            let Some(driver) = $crate::CanvasDriver::mount(canvas, preset, $crate::theme_from_flag(theme_light))? else {
                return Ok(None);
            };
            let handle = NEXT_HANDLE.with(|next| {
                let handle = next.get();
                next.set(handle.wrapping_add(1));
                handle
            });
            DRIVERS.with(|cell| cell.borrow_mut().insert(handle, driver));
            Ok(Some(handle))
        }

        #[wasm_bindgen]
        pub fn canvas_set_theme(handle: u32, light: bool) {
            DRIVERS.with(|cell| {
                if let Some(driver) = cell.borrow().get(&handle) {
                    driver.set_theme($crate::theme_from_flag(light));
                }
            });
        }

        #[wasm_bindgen]
        pub fn canvas_unmount(handle: u32) {
            let driver = DRIVERS.with(|cell| cell.borrow_mut().remove(&handle));
            if let Some(mut driver) = driver {
                driver.teardown();
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient_engine::PixelGridConfig;

    #[test]
    fn missing_preset_uses_default() {
        let default = FieldPreset::PixelGrid(PixelGridConfig::default());
        assert_eq!(resolve_preset("grid", None, default.clone()), default);
    }

    #[test]
    fn bad_preset_falls_back() {
        let default = FieldPreset::PixelGrid(PixelGridConfig::default());
        let resolved = resolve_preset("grid", Some("{ not json".into()), default.clone());
        assert_eq!(resolved, default);
    }

    #[test]
    fn reversed_range_preset_falls_back() {
        let default = FieldPreset::PixelGrid(PixelGridConfig::default());
        let json = r#"{ "kind": "pixel_particles", "alpha_range": [0.7, 0.1] }"#;
        assert_eq!(resolve_preset("particles", Some(json.into()), default.clone()), default);
    }

    #[test]
    fn good_preset_wins() {
        let default = FieldPreset::PixelGrid(PixelGridConfig::default());
        let resolved = resolve_preset("grid", Some(r#"{ "kind": "orbit" }"#.into()), default);
        assert!(matches!(resolved, FieldPreset::Orbit(_)));
    }

    #[test]
    fn theme_flag_maps() {
        assert_eq!(theme_from_flag(true), Theme::Light);
        assert_eq!(theme_from_flag(false), Theme::Dark);
    }
}
